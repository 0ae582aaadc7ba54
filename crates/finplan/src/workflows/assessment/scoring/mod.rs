pub(crate) mod rules;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bank::QuestionBank;
use super::domain::{Answers, RiskCategory};

/// Score used when no question contributed.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Per-question contribution kept for the completion record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub question_id: String,
    pub score: f64,
    pub weight: f64,
}

/// Weighted aggregate of the answered questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub category: RiskCategory,
    pub components: Vec<QuestionScore>,
}

impl RiskAssessment {
    pub fn label(&self) -> &'static str {
        self.category.label()
    }

    pub fn description(&self) -> &'static str {
        self.category.description()
    }
}

/// Stateless evaluator combining question scorers and weights.
pub struct ScoringEngine;

impl ScoringEngine {
    /// `round(Σ(score × weight) / Σ(weight), 2)` over enabled, answered questions.
    pub fn assess(bank: &QuestionBank, answers: &Answers) -> RiskAssessment {
        let mut components = Vec::new();
        let mut weighted_total = 0.0;
        let mut weight_total = 0.0;

        for question in bank.enabled() {
            let Some(answer) = answers.get(question.id) else {
                continue;
            };
            let Some(points) = question.score(&answer.value) else {
                debug!(question = question.id, "answer produced no score");
                continue;
            };
            weighted_total += points * question.weight;
            weight_total += question.weight;
            components.push(QuestionScore {
                question_id: question.id.to_string(),
                score: points,
                weight: question.weight,
            });
        }

        let score = if weight_total > 0.0 {
            round2(weighted_total / weight_total)
        } else {
            NEUTRAL_SCORE
        };

        RiskAssessment {
            score,
            category: RiskCategory::from_score(score),
            components,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
