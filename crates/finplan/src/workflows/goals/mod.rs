//! Goal candidates: amount and date extraction, reasonableness checks and
//! the prompts used to repair an incomplete goal.

pub mod domain;
mod extract;
mod validator;

pub use domain::{DeletedGoal, GoalSource, GoalValidation, MissingField, SelectedGoal};
pub use validator::{format_currency, GoalPolicy, GoalValidator};
