//! 日志初始化模块
//!
//! 所有调用方通过单一入口点配置 tracing 订阅器，确保一致的日志格式和过滤规则。

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::ObservabilityConfig;

/// 构建环境过滤器
///
/// RUST_LOG 优先，其次是配置中的 log_level，两者都无效时回退到 info
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化 tracing 订阅器
///
/// 重复初始化会返回错误而不是 panic，测试中可以忽略该错误。
///
/// # Example
///
/// ```ignore
/// use memorizer_shared::{config::AppConfig, observability};
///
/// let config = AppConfig::load("memorizer-storage")?;
/// let obs = config.observability.clone().with_service_name(&config.service_name);
/// observability::init(&obs)?;
/// ```
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    let fmt_layer = if config.json_logs() {
        fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt_layer)
        .try_init()?;

    info!(
        service = %config.service_name,
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Observability initialized"
    );

    Ok(())
}
