//! 练习与答题结果实体定义

use serde::{Deserialize, Serialize};

use crate::error::{MemorizerError, Result};

/// 练习（附带答题计数）
///
/// 读取时与 exercise_result 左连接，没有结果行的练习计数为 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub bad_answers: i32,
    pub good_answers: i32,
}

impl Exercise {
    /// 累计答题次数
    pub fn total_answers(&self) -> i64 {
        i64::from(self.good_answers) + i64::from(self.bad_answers)
    }

    /// 正确率，尚未作答时为 None
    ///
    /// 随机抽题不使用该值；按正确率加权抽题时从这里读取
    pub fn accuracy(&self) -> Option<f64> {
        match self.total_answers() {
            0 => None,
            total => Some(f64::from(self.good_answers) / total as f64),
        }
    }
}

/// 答题结果行
///
/// 每个练习至多一行，首次作答时创建
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResult {
    pub id: i64,
    pub exercise_id: i64,
    pub bad_answers: i32,
    pub good_answers: i32,
}

/// 新建练习
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExercise {
    pub question: String,
    pub answer: String,
}

impl NewExercise {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// 问题和答案都不能为空白
    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(MemorizerError::Validation("question 不能为空".to_string()));
        }
        if self.answer.trim().is_empty() {
            return Err(MemorizerError::Validation("answer 不能为空".to_string()));
        }
        Ok(())
    }
}

/// 递增的计数器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnswerKind {
    Good,
    Bad,
}

impl AnswerKind {
    /// exercise_result 中对应的列名
    pub fn column(self) -> &'static str {
        match self {
            Self::Good => "good_answers",
            Self::Bad => "bad_answers",
        }
    }

    /// 日志与错误上下文中使用的操作名
    pub fn operation(self) -> &'static str {
        match self {
            Self::Good => "increment_good_answers",
            Self::Bad => "increment_bad_answers",
        }
    }
}
