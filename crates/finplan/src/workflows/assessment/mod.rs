//! Risk-profile questionnaire: the question bank, per-question input
//! validation, and the weighted scoring engine.

mod bank;
pub mod domain;
pub(crate) mod numbers;
pub mod scoring;
pub mod validators;

pub use bank::{Question, QuestionBank};
pub use domain::{AnswerRecord, Answers, RiskCategory, ValidatedAnswer};
pub use scoring::{QuestionScore, RiskAssessment, ScoringEngine};
pub use validators::{AnswerKind, AnswerRejection, NumericField};
