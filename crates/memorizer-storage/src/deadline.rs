//! 调用方截止时间与取消信号
//!
//! 存储层不自行设置超时，也不重试。调用方提供截止时间或取消信号时，
//! 进行中的存储 future 会被直接丢弃（连接随之归还连接池），并返回 `MemorizerError::Cancelled`。

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{MemorizerError, Result};

/// 在截止时间内执行存储操作
///
/// # Example
///
/// ```ignore
/// let exercise = with_deadline("random_exercise", Duration::from_secs(2), reader.random_exercise()).await?;
/// ```
pub async fn with_deadline<T, F>(operation: &'static str, timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation,
                ?timeout,
                "Store operation exceeded caller deadline"
            );
            Err(MemorizerError::Cancelled { operation })
        }
    }
}

/// 在取消信号到达前执行存储操作
///
/// `signal` 完成即视为调用方放弃（例如客户端断开连接）
pub async fn with_cancellation<T, F, S>(operation: &'static str, signal: S, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
    S: Future<Output = ()>,
{
    tokio::select! {
        biased;
        result = fut => result,
        _ = signal => {
            warn!(operation, "Store operation cancelled by caller");
            Err(MemorizerError::Cancelled { operation })
        }
    }
}
