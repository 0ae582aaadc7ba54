//! Completion record handed to the persistence collaborator.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::SessionState;
use crate::workflows::assessment::{
    AnswerRecord, QuestionBank, QuestionScore, RiskCategory, ScoringEngine,
};
use crate::workflows::goals::{DeletedGoal, SelectedGoal};

const REVIEW_INTERVAL_DAYS: u64 = 30;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("could not write session record: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode session record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("record sink rejected the session: {0}")]
    Rejected(String),
}

/// Stores a completed session and returns a reference to where it went.
pub trait RecordSink {
    fn persist(&self, record: &SessionRecord) -> Result<String, PersistError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub score: f64,
    pub category: RiskCategory,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalEntry {
    /// `goal_<n>`, matching the number shown to the user.
    pub id: String,
    #[serde(flatten)]
    pub goal: SelectedGoal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub questions_answered: usize,
    pub clarifications: u32,
    pub goals_explained: u32,
    pub duration_minutes: i64,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: String,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub risk_profile: RiskProfile,
    pub answers: Vec<AnswerRecord>,
    /// Score and weight for every answered, enabled question.
    pub scores: Vec<QuestionScore>,
    pub goals: Vec<GoalEntry>,
    pub deleted_goals: Vec<DeletedGoal>,
    pub total_goals_considered: usize,
    pub suggestion_pages_viewed: usize,
    pub metadata: SessionMetadata,
    pub next_review_date: NaiveDate,
}

impl SessionRecord {
    pub fn from_session(state: &SessionState, bank: &QuestionBank, completed_at: DateTime<Utc>) -> Self {
        let assessment = state
            .risk
            .clone()
            .unwrap_or_else(|| ScoringEngine::assess(bank, &state.answers));

        let goals = state
            .goals
            .iter()
            .enumerate()
            .map(|(index, goal)| GoalEntry {
                id: format!("goal_{}", index + 1),
                goal: goal.clone(),
            })
            .collect();

        let today = completed_at.date_naive();
        let next_review_date = today
            .checked_add_days(Days::new(REVIEW_INTERVAL_DAYS))
            .unwrap_or(today);

        Self {
            user_id: state.user_id.clone(),
            session_id: state.session_id.clone(),
            created_at: state.created_at,
            completed_at,
            risk_profile: RiskProfile {
                score: assessment.score,
                category: assessment.category,
                label: assessment.label().to_string(),
                description: assessment.description().to_string(),
            },
            answers: state.answers.iter().cloned().collect(),
            scores: assessment.components,
            goals,
            deleted_goals: state.deleted_goals.clone(),
            total_goals_considered: state.suggestions.len(),
            suggestion_pages_viewed: state.suggestions.pages(),
            metadata: SessionMetadata {
                questions_answered: state.answers.len(),
                clarifications: state.clarifications,
                goals_explained: state.goals_explained,
                duration_minutes: (completed_at - state.created_at).num_minutes(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            next_review_date,
        }
    }
}
