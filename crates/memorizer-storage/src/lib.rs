//! 练习存储核心
//!
//! 间隔重复记忆卡片系统的数据访问层：随机出题、列出练习，以及原子地累加答对/答错次数。
//!
//! ## 模块结构
//!
//! - `models`: 练习与答题结果实体
//! - `error`: 错误类型定义
//! - `repository`: Reader/Writer 接口及 PostgreSQL、内存实现
//! - `deadline`: 调用方截止时间与取消信号的透传

pub mod deadline;
pub mod error;
pub mod models;
pub mod repository;

pub use deadline::{with_cancellation, with_deadline};
pub use error::{MemorizerError, Result};
pub use models::*;
pub use repository::{
    ExerciseReader, ExerciseReaderTrait, ExerciseWriter, ExerciseWriterTrait,
    InMemoryExerciseStore,
};
