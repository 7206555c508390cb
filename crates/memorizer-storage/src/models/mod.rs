//! 练习领域模型

pub mod exercise;

pub use exercise::{AnswerKind, Exercise, ExerciseResult, NewExercise};
