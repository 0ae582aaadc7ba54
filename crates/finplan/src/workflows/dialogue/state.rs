use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clock::Clock;
use crate::workflows::assessment::{Answers, RiskAssessment};
use crate::workflows::goals::{DeletedGoal, GoalValidation, SelectedGoal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    Assessment,
    GoalSetting,
    Complete,
}

/// The single goal awaiting a missing amount or date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingValidation {
    pub text: String,
    pub validation: GoalValidation,
}

/// Every suggestion shown so far, numbered continuously across pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionPool {
    entries: Vec<String>,
    page_start: usize,
    pages: usize,
}

impl SuggestionPool {
    /// Appends a page and returns the 1-based number of its first entry.
    pub fn push_page(&mut self, page: Vec<String>) -> usize {
        self.page_start = self.entries.len();
        self.pages += 1;
        self.entries.extend(page);
        self.page_start + 1
    }

    /// 1-based lookup.
    pub fn get(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
            .map(String::as_str)
    }

    /// `(number, text)` pairs of the most recent page.
    pub fn current_page(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries[self.page_start..]
            .iter()
            .enumerate()
            .map(move |(offset, text)| (self.page_start + offset + 1, text.as_str()))
    }

    pub fn position(&self, text: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry == text)
            .map(|index| index + 1)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pages(&self) -> usize {
        self.pages
    }
}

/// Whole conversation state. Each turn takes one value and returns the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub user_id: String,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub step: Step,
    /// Index into the question bank of the next question to ask.
    pub question_index: usize,
    pub answers: Answers,
    /// Last question prompt rendered, replayed on "ok" or "continue".
    pub last_prompt: Option<String>,
    pub risk: Option<RiskAssessment>,
    pub goals: Vec<SelectedGoal>,
    pub deleted_goals: Vec<DeletedGoal>,
    pub suggestions: SuggestionPool,
    pub pending: Option<PendingValidation>,
    pub clarifications: u32,
    pub goals_explained: u32,
    /// Utterance of the last turn that failed on a collaborator; `retry` resends it.
    pub last_failed_utterance: Option<String>,
    pub record_location: Option<String>,
}

fn short_id(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &id[..8])
}

impl SessionState {
    pub fn new(clock: &dyn Clock) -> Self {
        Self::for_user(short_id("user"), clock)
    }

    pub fn for_user(user_id: String, clock: &dyn Clock) -> Self {
        Self {
            user_id,
            session_id: short_id("session"),
            created_at: clock.now(),
            completed_at: None,
            step: Step::Assessment,
            question_index: 0,
            answers: Answers::default(),
            last_prompt: None,
            risk: None,
            goals: Vec::new(),
            deleted_goals: Vec::new(),
            suggestions: SuggestionPool::default(),
            pending: None,
            clarifications: 0,
            goals_explained: 0,
            last_failed_utterance: None,
            record_location: None,
        }
    }

    /// Fresh session for the same user.
    pub fn restarted(&self, clock: &dyn Clock) -> Self {
        Self::for_user(self.user_id.clone(), clock)
    }

    pub fn has_goal(&self, text: &str) -> bool {
        self.goals.iter().any(|goal| goal.text == text)
    }
}
