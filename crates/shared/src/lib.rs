//! 共享库
//!
//! 包含配置加载、错误处理、数据库连接池、日志初始化和测试工具等基础设施代码。

pub mod config;
pub mod database;
pub mod error;
pub mod observability;
pub mod test_utils;
