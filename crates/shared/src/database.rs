//! 数据库连接管理模块
//!
//! 提供 PostgreSQL 连接池管理，支持健康检查和 schema 迁移。
//! 连接池在所有 Reader/Writer 实例之间共享，每次调用只在自身执行期间占用连接。

use crate::config::DatabaseConfig;
use crate::error::{InfraError, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

/// 练习表结构迁移（位于工作区根目录 migrations/）
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// 数据库连接池包装
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 创建数据库连接池
    #[instrument(skip(config))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await?;

        info!("Database connection pool created");

        Ok(Self { pool })
    }

    /// 使用已有连接池构建（测试场景）
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 获取连接池引用
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 健康检查
    ///
    /// 供就绪探针使用，只验证能否完成一次往返
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(InfraError::from)
    }

    /// 关闭连接池
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }

    /// 应用 exercise / exercise_result 表结构
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");
        MIGRATOR.run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }
}
