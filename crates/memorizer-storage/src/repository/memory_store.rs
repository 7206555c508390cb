//! 内存练习存储
//!
//! 与 PostgreSQL 仓储满足同一组 Reader/Writer 契约，适用于单元测试和本地开发。
//! 结果行保存在 DashMap 中，创建或递增在同一个 entry 锁内完成，并发递增不会丢失。

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use rand::seq::IteratorRandom;
use tracing::debug;

use super::traits::{ExerciseReaderTrait, ExerciseWriterTrait};
use crate::error::{MemorizerError, Result};
use crate::models::{AnswerKind, Exercise, ExerciseResult, NewExercise};

#[derive(Debug, Clone)]
struct StoredExercise {
    question: String,
    answer: String,
}

/// 内存练习存储
///
/// Clone 后共享同一份数据，可同时作为 Reader 和 Writer 注入
#[derive(Debug, Clone, Default)]
pub struct InMemoryExerciseStore {
    exercises: Arc<RwLock<BTreeMap<i64, StoredExercise>>>,
    results: Arc<DashMap<i64, ExerciseResult>>,
    next_exercise_id: Arc<AtomicI64>,
    next_result_id: Arc<AtomicI64>,
}

impl InMemoryExerciseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增练习，返回分配的 id（单调递增）
    pub fn add_exercise(&self, exercise: &NewExercise) -> Result<i64> {
        exercise.validate()?;

        let mut exercises = self.exercises.write();
        let id = self.next_exercise_id.fetch_add(1, Ordering::SeqCst) + 1;
        exercises.insert(
            id,
            StoredExercise {
                question: exercise.question.clone(),
                answer: exercise.answer.clone(),
            },
        );

        Ok(id)
    }

    /// 按 id 查找练习（含计数）
    pub fn find_exercise(&self, id: i64) -> Option<Exercise> {
        let exercises = self.exercises.read();
        exercises.get(&id).map(|stored| self.merge(id, stored))
    }

    /// 最新创建的练习
    pub fn latest_exercise(&self) -> Option<Exercise> {
        let exercises = self.exercises.read();
        exercises
            .iter()
            .next_back()
            .map(|(id, stored)| self.merge(*id, stored))
    }

    /// 按练习 id 查找结果行，尚未作答时为 None
    pub fn find_result(&self, exercise_id: i64) -> Option<ExerciseResult> {
        self.results.get(&exercise_id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.exercises.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.read().is_empty()
    }

    fn merge(&self, id: i64, stored: &StoredExercise) -> Exercise {
        let (good_answers, bad_answers) = self
            .results
            .get(&id)
            .map(|r| (r.good_answers, r.bad_answers))
            .unwrap_or((0, 0));

        Exercise {
            id,
            question: stored.question.clone(),
            answer: stored.answer.clone(),
            bad_answers,
            good_answers,
        }
    }

    fn list(&self) -> Vec<Exercise> {
        let exercises = self.exercises.read();
        exercises
            .iter()
            .rev()
            .map(|(id, stored)| self.merge(*id, stored))
            .collect()
    }

    fn pick_random(&self) -> Result<Exercise> {
        let exercises = self.exercises.read();
        exercises
            .iter()
            .choose(&mut rand::rng())
            .map(|(id, stored)| self.merge(*id, stored))
            .ok_or(MemorizerError::NoExercises)
    }

    fn increment(&self, exercise_id: i64, kind: AnswerKind) -> Result<()> {
        // 练习不会被删除，检查通过后无需继续持有读锁
        if !self.exercises.read().contains_key(&exercise_id) {
            return Err(MemorizerError::store(
                kind.operation(),
                format!("exercise {} does not exist", exercise_id),
            ));
        }

        let mut entry = self.results.entry(exercise_id).or_insert_with(|| ExerciseResult {
            id: self.next_result_id.fetch_add(1, Ordering::SeqCst) + 1,
            exercise_id,
            bad_answers: 0,
            good_answers: 0,
        });

        let counter = match kind {
            AnswerKind::Good => &mut entry.good_answers,
            AnswerKind::Bad => &mut entry.bad_answers,
        };
        *counter = counter.checked_add(1).ok_or_else(|| {
            MemorizerError::store(kind.operation(), "answer counter overflow")
        })?;

        debug!(exercise_id, column = kind.column(), "Answer counter incremented");

        Ok(())
    }
}

#[async_trait]
impl ExerciseReaderTrait for InMemoryExerciseStore {
    async fn all_exercises(&self) -> Result<Vec<Exercise>> {
        Ok(self.list())
    }

    async fn random_exercise(&self) -> Result<Exercise> {
        self.pick_random()
    }
}

#[async_trait]
impl ExerciseWriterTrait for InMemoryExerciseStore {
    async fn increment_good_answers(&self, exercise_id: i64) -> Result<()> {
        self.increment(exercise_id, AnswerKind::Good)
    }

    async fn increment_bad_answers(&self, exercise_id: i64) -> Result<()> {
        self.increment(exercise_id, AnswerKind::Bad)
    }
}
