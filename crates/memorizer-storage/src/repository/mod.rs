//! 练习仓储层
//!
//! 提供 Reader/Writer 接口及其 PostgreSQL、内存两种实现。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不缓存、不重试
//! - 每次调用只借用一条连接执行一条语句，不保留跨调用的会话状态
//! - 计数器的“首次创建，否则加一”由单条 upsert 语句完成，不做先查后写
//! - 定义 trait 接口以支持 mock 测试

mod exercise_reader;
mod exercise_writer;
mod memory_store;
mod traits;

pub use exercise_reader::ExerciseReader;
pub use exercise_writer::ExerciseWriter;
pub use memory_store::InMemoryExerciseStore;
pub use traits::*;
