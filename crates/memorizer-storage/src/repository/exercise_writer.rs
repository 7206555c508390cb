//! 答题结果写入仓储
//!
//! 计数器更新使用单条 INSERT ... ON CONFLICT 语句完成，
//! 冲突目标是 exercise_id 唯一约束，加一在数据库中以算术更新表达

use async_trait::async_trait;
use memorizer_shared::database::Database;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use super::traits::ExerciseWriterTrait;
use crate::error::{MemorizerError, Result};
use crate::models::AnswerKind;

const INCREMENT_GOOD_ANSWERS: &str = r#"
    INSERT INTO exercise_result (exercise_id, good_answers, bad_answers)
    VALUES ($1, 1, 0)
    ON CONFLICT (exercise_id)
    DO UPDATE SET good_answers = exercise_result.good_answers + 1
"#;

const INCREMENT_BAD_ANSWERS: &str = r#"
    INSERT INTO exercise_result (exercise_id, good_answers, bad_answers)
    VALUES ($1, 0, 1)
    ON CONFLICT (exercise_id)
    DO UPDATE SET bad_answers = exercise_result.bad_answers + 1
"#;

fn increment_sql(kind: AnswerKind) -> &'static str {
    match kind {
        AnswerKind::Good => INCREMENT_GOOD_ANSWERS,
        AnswerKind::Bad => INCREMENT_BAD_ANSWERS,
    }
}

/// 答题结果写入仓储（PostgreSQL）
#[derive(Clone)]
pub struct ExerciseWriter {
    pool: PgPool,
}

impl ExerciseWriter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 共享已建立的连接池
    pub fn from_database(db: &Database) -> Self {
        Self::new(db.pool().clone())
    }

    /// 答对次数加一
    pub async fn increment_good_answers(&self, exercise_id: i64) -> Result<()> {
        self.increment(exercise_id, AnswerKind::Good).await
    }

    /// 答错次数加一
    pub async fn increment_bad_answers(&self, exercise_id: i64) -> Result<()> {
        self.increment(exercise_id, AnswerKind::Bad).await
    }

    /// 创建或递增结果行
    ///
    /// 引用不存在的练习时由外键约束拒绝，错误原样返回
    #[instrument(skip(self), fields(operation = kind.operation()))]
    async fn increment(&self, exercise_id: i64, kind: AnswerKind) -> Result<()> {
        sqlx::query(increment_sql(kind))
            .bind(exercise_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                let err = MemorizerError::database(kind.operation(), e);
                if err.is_foreign_key_violation() {
                    warn!(exercise_id, "Increment rejected: exercise does not exist");
                }
                err
            })?;

        debug!(exercise_id, column = kind.column(), "Answer counter incremented");

        Ok(())
    }
}

#[async_trait]
impl ExerciseWriterTrait for ExerciseWriter {
    async fn increment_good_answers(&self, exercise_id: i64) -> Result<()> {
        self.increment_good_answers(exercise_id).await
    }

    async fn increment_bad_answers(&self, exercise_id: i64) -> Result<()> {
        self.increment_bad_answers(exercise_id).await
    }
}
