//! PostgreSQL 仓储集成测试
//!
//! 每个测试在独立 schema 中执行迁移，互不干扰。
//! 需要可用的 PostgreSQL（TEST_DATABASE_URL），默认忽略：
//!
//! ```text
//! TEST_DATABASE_URL=postgres://... cargo test -p memorizer-storage -- --ignored
//! ```

use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;

use futures::future::join_all;
use memorizer::{
    ExerciseReader, ExerciseResult, ExerciseWriter, MemorizerError, NewExercise, with_deadline,
};
use memorizer_shared::database::Database;
use memorizer_shared::test_utils::{TestDataGenerator, test_database_config};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Row};
use uuid::Uuid;

// ==================== 测试环境 ====================

struct TestSchema {
    admin: PgPool,
    pool: PgPool,
    db: Database,
    name: String,
}

impl TestSchema {
    async fn setup() -> anyhow::Result<Self> {
        let config = test_database_config();
        let admin = PgPoolOptions::new()
            .max_connections(1)
            .connect(&config.url)
            .await?;

        let name = format!("memorizer_test_{}", Uuid::new_v4().simple());
        sqlx::query(&format!("CREATE SCHEMA {}", name))
            .execute(&admin)
            .await?;

        let options = PgConnectOptions::from_str(&config.url)?
            .options([("search_path", name.as_str())]);
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let db = Database::from_pool(pool.clone());
        db.run_migrations().await?;
        db.health_check().await?;

        Ok(Self {
            admin,
            pool,
            db,
            name,
        })
    }

    fn reader(&self) -> ExerciseReader {
        ExerciseReader::from_database(&self.db)
    }

    fn writer(&self) -> ExerciseWriter {
        ExerciseWriter::from_database(&self.db)
    }

    async fn teardown(self) {
        self.db.close().await;
        let _ = sqlx::query(&format!("DROP SCHEMA {} CASCADE", self.name))
            .execute(&self.admin)
            .await;
    }
}

// ==================== 辅助查询 ====================

async fn store_exercise(pool: &PgPool, exercise: &NewExercise) -> i64 {
    sqlx::query("INSERT INTO exercise (question, answer) VALUES ($1, $2) RETURNING id")
        .bind(&exercise.question)
        .bind(&exercise.answer)
        .fetch_one(pool)
        .await
        .unwrap()
        .get("id")
}

async fn fetch_latest_exercise_id(pool: &PgPool) -> i64 {
    sqlx::query("SELECT e.id FROM exercise e ORDER BY id DESC LIMIT 1")
        .fetch_one(pool)
        .await
        .unwrap()
        .get("id")
}

async fn find_exercise_result(pool: &PgPool, exercise_id: i64) -> Option<ExerciseResult> {
    sqlx::query_as::<_, ExerciseResult>(
        r#"
        SELECT er.id, er.exercise_id, er.bad_answers, er.good_answers
        FROM exercise_result er
        WHERE er.exercise_id = $1
        "#,
    )
    .bind(exercise_id)
    .fetch_optional(pool)
    .await
    .unwrap()
}

async fn seed(pool: &PgPool, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for data in TestDataGenerator::exercises(count) {
        ids.push(store_exercise(pool, &NewExercise::new(data.question, data.answer)).await);
    }
    ids
}

// ==================== Reader ====================

#[tokio::test]
#[ignore = "需要 PostgreSQL 数据库连接"]
async fn test_all_exercises_includes_unanswered() {
    let env = TestSchema::setup().await.unwrap();
    let id = store_exercise(&env.pool, &NewExercise::new("2+2", "4")).await;
    assert_eq!(fetch_latest_exercise_id(&env.pool).await, id);

    let exercises = env.reader().all_exercises().await.unwrap();

    assert_eq!(exercises.len(), 1);
    assert_eq!(exercises[0].id, id);
    assert_eq!(exercises[0].question, "2+2");
    assert_eq!(exercises[0].answer, "4");
    assert_eq!(exercises[0].good_answers, 0);
    assert_eq!(exercises[0].bad_answers, 0);
    assert!(find_exercise_result(&env.pool, id).await.is_none());

    env.teardown().await;
}

#[tokio::test]
#[ignore = "需要 PostgreSQL 数据库连接"]
async fn test_all_exercises_ordering_and_idempotence() {
    let env = TestSchema::setup().await.unwrap();
    let reader = env.reader();
    assert!(reader.all_exercises().await.unwrap().is_empty());

    let ids = seed(&env.pool, 5).await;
    env.writer().increment_good_answers(ids[2]).await.unwrap();

    let first = reader.all_exercises().await.unwrap();
    let listed: Vec<i64> = first.iter().map(|e| e.id).collect();
    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(listed, expected);
    assert_eq!(reader.all_exercises().await.unwrap(), first);

    env.teardown().await;
}

#[tokio::test]
#[ignore = "需要 PostgreSQL 数据库连接"]
async fn test_random_exercise() {
    let env = TestSchema::setup().await.unwrap();
    let reader = env.reader();

    let err = reader.random_exercise().await.unwrap_err();
    assert!(matches!(err, MemorizerError::NoExercises));

    let ids: HashSet<i64> = seed(&env.pool, 3).await.into_iter().collect();
    let mut seen = HashSet::new();
    for _ in 0..200 {
        let exercise = reader.random_exercise().await.unwrap();
        assert!(ids.contains(&exercise.id));
        seen.insert(exercise.id);
    }
    assert_eq!(seen, ids);

    env.teardown().await;
}

// ==================== Writer ====================

#[tokio::test]
#[ignore = "需要 PostgreSQL 数据库连接"]
async fn test_increment_creates_then_updates_row() {
    let env = TestSchema::setup().await.unwrap();
    let writer = env.writer();
    let id = store_exercise(&env.pool, &NewExercise::new("2+2", "4")).await;

    writer.increment_good_answers(id).await.unwrap();
    let result = find_exercise_result(&env.pool, id).await.unwrap();
    assert_eq!((result.good_answers, result.bad_answers), (1, 0));

    writer.increment_bad_answers(id).await.unwrap();
    let updated = find_exercise_result(&env.pool, id).await.unwrap();
    assert_eq!(updated.id, result.id);
    assert_eq!((updated.good_answers, updated.bad_answers), (1, 1));

    let exercise = env.reader().all_exercises().await.unwrap().remove(0);
    assert_eq!((exercise.good_answers, exercise.bad_answers), (1, 1));

    env.teardown().await;
}

#[tokio::test]
#[ignore = "需要 PostgreSQL 数据库连接"]
async fn test_increment_unknown_exercise_is_store_error() {
    let env = TestSchema::setup().await.unwrap();

    let err = env.writer().increment_good_answers(123_456).await.unwrap_err();
    assert!(err.is_store_error());
    assert!(err.is_foreign_key_violation());
    assert_eq!(err.operation(), Some("increment_good_answers"));

    env.teardown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore = "需要 PostgreSQL 数据库连接"]
async fn test_concurrent_increments_are_not_lost() {
    const GOOD: usize = 60;
    const BAD: usize = 40;

    let env = TestSchema::setup().await.unwrap();
    let id = store_exercise(&env.pool, &NewExercise::new("2+2", "4")).await;
    let writer = env.writer();

    let tasks = (0..GOOD + BAD).map(|i| {
        let writer = writer.clone();
        tokio::spawn(async move {
            if i < GOOD {
                writer.increment_good_answers(id).await
            } else {
                writer.increment_bad_answers(id).await
            }
        })
    });
    for result in join_all(tasks).await {
        result.unwrap().unwrap();
    }

    let result = find_exercise_result(&env.pool, id).await.unwrap();
    assert_eq!(result.good_answers, GOOD as i32);
    assert_eq!(result.bad_answers, BAD as i32);

    env.teardown().await;
}

#[tokio::test]
#[ignore = "需要 PostgreSQL 数据库连接"]
async fn test_deadline_wraps_store_call() {
    let env = TestSchema::setup().await.unwrap();
    seed(&env.pool, 1).await;
    let reader = env.reader();

    let exercises = with_deadline(
        "all_exercises",
        Duration::from_secs(5),
        reader.all_exercises(),
    )
    .await
    .unwrap();
    assert_eq!(exercises.len(), 1);

    env.teardown().await;
}

#[tokio::test]
#[ignore = "需要 PostgreSQL 数据库连接"]
async fn test_deadline_cancels_blocked_increment() {
    let env = TestSchema::setup().await.unwrap();
    let id = store_exercise(&env.pool, &NewExercise::new("2+2", "4")).await;
    let writer = env.writer();

    // 另一个事务持有排他锁，写入会一直阻塞到截止时间
    let mut lock = env.admin.begin().await.unwrap();
    sqlx::query(&format!(
        "LOCK TABLE {}.exercise_result IN ACCESS EXCLUSIVE MODE",
        env.name
    ))
    .execute(&mut *lock)
    .await
    .unwrap();

    let err = with_deadline(
        "increment_good_answers",
        Duration::from_millis(200),
        writer.increment_good_answers(id),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        MemorizerError::Cancelled {
            operation: "increment_good_answers"
        }
    ));
    assert!(err.is_store_error());

    lock.rollback().await.unwrap();

    // 取消后连接池仍可继续使用
    writer.increment_good_answers(id).await.unwrap();
    let result = find_exercise_result(&env.pool, id).await.unwrap();
    assert_eq!((result.good_answers, result.bad_answers), (1, 0));

    env.teardown().await;
}
