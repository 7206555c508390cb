//! 练习存储错误类型
//!
//! 只有两类错误：没有可选的练习（NotFound），以及来自持久层的一切失败（Store）。
//! 错误原样向上传递并附带操作名，HTTP 状态码映射由调用方负责。

use thiserror::Error;

/// 练习存储错误类型
#[derive(Debug, Error)]
pub enum MemorizerError {
    // === NotFound ===
    #[error("没有可供选择的练习")]
    NoExercises,

    // === Store ===
    #[error("数据库错误 [{operation}]: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("存储错误 [{operation}]: {message}")]
    Store {
        operation: &'static str,
        message: String,
    },

    #[error("操作已取消 [{operation}]")]
    Cancelled { operation: &'static str },

    // === 调用方输入 ===
    #[error("参数校验失败: {0}")]
    Validation(String),
}

/// 练习存储 Result 类型别名
pub type Result<T> = std::result::Result<T, MemorizerError>;

impl MemorizerError {
    /// 包装 sqlx 错误并记录失败的操作
    pub fn database(operation: &'static str, source: sqlx::Error) -> Self {
        Self::Database { operation, source }
    }

    pub fn store(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Store {
            operation,
            message: message.into(),
        }
    }

    /// 失败的操作名（校验错误与空集合没有关联操作）
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Database { operation, .. }
            | Self::Store { operation, .. }
            | Self::Cancelled { operation } => Some(operation),
            Self::NoExercises | Self::Validation(_) => None,
        }
    }

    /// 是否为 NotFound 类错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoExercises)
    }

    /// 是否为持久层错误（包括取消）
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            Self::Database { .. } | Self::Store { .. } | Self::Cancelled { .. }
        )
    }

    /// 是否违反了外键约束（引用了不存在的练习）
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            Self::Database {
                source: sqlx::Error::Database(db),
                ..
            } => db.is_foreign_key_violation(),
            _ => false,
        }
    }

    /// 检查是否为可重试的错误
    ///
    /// 存储层本身从不重试，这里只给调用方提供判断依据
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Database { source, .. } => matches!(
                source,
                sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::WorkerCrashed
            ),
            Self::Cancelled { .. } => true,
            _ => false,
        }
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoExercises => "NO_EXERCISES",
            Self::Database { .. } => "DATABASE_ERROR",
            Self::Store { .. } => "STORE_ERROR",
            Self::Cancelled { .. } => "CANCELLED",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}
