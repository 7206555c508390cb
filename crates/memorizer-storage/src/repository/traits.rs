//! 仓储 Trait 定义
//!
//! Reader/Writer 是 HTTP 路由层唯一可以调用的接口，存储技术（PostgreSQL、内存）可在其后替换

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Exercise;

/// 练习读取接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExerciseReaderTrait: Send + Sync {
    /// 全部练习，按 id 倒序（最新创建的在前），没有结果行的练习计数为 0
    async fn all_exercises(&self) -> Result<Vec<Exercise>>;

    /// 等概率随机抽取一个练习，与答题计数无关
    ///
    /// 没有任何练习时返回 `MemorizerError::NoExercises`
    async fn random_exercise(&self) -> Result<Exercise>;
}

/// 答题结果写入接口
///
/// 首次作答时创建结果行，之后原地加一；同一练习的并发调用不会丢失更新
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExerciseWriterTrait: Send + Sync {
    async fn increment_good_answers(&self, exercise_id: i64) -> Result<()>;
    async fn increment_bad_answers(&self, exercise_id: i64) -> Result<()>;
}
