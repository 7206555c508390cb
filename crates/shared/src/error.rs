//! 基础设施错误类型
//!
//! 覆盖连接池创建、迁移执行、配置加载等启动阶段的失败，使用 thiserror 提供良好的错误信息。

use thiserror::Error;

/// 基础设施错误
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("数据库迁移失败: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, InfraError>;

impl InfraError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Database(_) => "DATABASE_ERROR",
            Self::Migration(_) => "MIGRATION_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// 是否为可重试错误
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_))
        )
    }
}
