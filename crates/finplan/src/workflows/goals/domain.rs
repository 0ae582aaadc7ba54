use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Field a goal candidate still lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    TargetAmount,
    TargetDate,
}

impl MissingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingField::TargetAmount => "target_amount",
            MissingField::TargetDate => "target_date",
        }
    }
}

/// Outcome of validating one goal text. Malformed input is never an error;
/// an absent match shows up as a missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalValidation {
    pub is_valid: bool,
    pub target_amount: Option<f64>,
    pub target_date: Option<NaiveDate>,
    pub missing_fields: Vec<MissingField>,
    pub errors: Vec<String>,
}

impl GoalValidation {
    /// Amount is always asked for before the date.
    pub fn first_missing(&self) -> Option<MissingField> {
        self.missing_fields.iter().min().copied()
    }

    pub fn is_missing(&self, field: MissingField) -> bool {
        self.missing_fields.contains(&field)
    }

    /// True when a field missing from `previous` is present here.
    pub fn improves_on(&self, previous: &GoalValidation) -> bool {
        (previous.target_amount.is_none() && self.target_amount.is_some())
            || (previous.target_date.is_none() && self.target_date.is_some())
    }
}

/// Where an accepted goal came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum GoalSource {
    /// 1-based position in the cumulative suggestion pool.
    Suggestion { suggestion_number: usize },
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedGoal {
    pub text: String,
    #[serde(flatten)]
    pub source: GoalSource,
    pub target_amount: Option<f64>,
    pub target_date: Option<NaiveDate>,
    pub added_at: DateTime<Utc>,
}

/// Audit entry for a goal removed from the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedGoal {
    pub id: String,
    pub text: String,
    pub deleted_at: DateTime<Utc>,
}
