//! 练习读取仓储
//!
//! 每次调用都直接查询数据库，不在进程内缓存任何结果

use async_trait::async_trait;
use memorizer_shared::database::Database;
use sqlx::PgPool;
use tracing::{debug, instrument};

use super::traits::ExerciseReaderTrait;
use crate::error::{MemorizerError, Result};
use crate::models::Exercise;

/// 练习读取仓储（PostgreSQL）
#[derive(Clone)]
pub struct ExerciseReader {
    pool: PgPool,
}

impl ExerciseReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 共享已建立的连接池
    pub fn from_database(db: &Database) -> Self {
        Self::new(db.pool().clone())
    }

    /// 列出全部练习
    ///
    /// LEFT JOIN 保证尚未作答的练习也会返回，计数 COALESCE 为 0
    #[instrument(skip(self))]
    pub async fn all_exercises(&self) -> Result<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT e.id, e.question, e.answer,
                   COALESCE(er.bad_answers, 0) AS bad_answers,
                   COALESCE(er.good_answers, 0) AS good_answers
            FROM exercise e
            LEFT JOIN exercise_result er ON e.id = er.exercise_id
            ORDER BY e.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MemorizerError::database("all_exercises", e))?;

        debug!(count = exercises.len(), "Exercises loaded");

        Ok(exercises)
    }

    /// 随机抽取一个练习
    ///
    /// 由数据库的 random() 排序，每个练习被选中的概率相同
    #[instrument(skip(self))]
    pub async fn random_exercise(&self) -> Result<Exercise> {
        let exercise = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT e.id, e.question, e.answer,
                   COALESCE(er.bad_answers, 0) AS bad_answers,
                   COALESCE(er.good_answers, 0) AS good_answers
            FROM exercise e
            LEFT JOIN exercise_result er ON e.id = er.exercise_id
            ORDER BY random()
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| MemorizerError::database("random_exercise", e))?
        .ok_or(MemorizerError::NoExercises)?;

        debug!(exercise_id = exercise.id, "Random exercise selected");

        Ok(exercise)
    }
}

#[async_trait]
impl ExerciseReaderTrait for ExerciseReader {
    async fn all_exercises(&self) -> Result<Vec<Exercise>> {
        self.all_exercises().await
    }

    async fn random_exercise(&self) -> Result<Exercise> {
        self.random_exercise().await
    }
}
