use chrono::NaiveDate;
use tracing::debug;

use super::domain::{GoalValidation, MissingField};
use super::extract::{extract_amount, extract_date};

/// Bounds a goal must satisfy to be accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalPolicy {
    pub min_amount: f64,
    pub max_amount: f64,
    /// Shortest horizon in years (0.1 is roughly 1.2 months).
    pub min_years: f64,
    pub max_years: f64,
    /// Largest required saving per year before a goal is flagged unrealistic.
    pub max_annual_saving: f64,
}

impl Default for GoalPolicy {
    fn default() -> Self {
        Self {
            min_amount: 100.0,
            max_amount: 10_000_000.0,
            min_years: 0.1,
            max_years: 50.0,
            max_annual_saving: 200_000.0,
        }
    }
}

/// Extracts and checks the target amount and date of a goal text.
#[derive(Debug, Clone, Default)]
pub struct GoalValidator {
    policy: GoalPolicy,
}

impl GoalValidator {
    pub fn new(policy: GoalPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &GoalPolicy {
        &self.policy
    }

    pub fn validate(&self, text: &str, today: NaiveDate) -> GoalValidation {
        let target_amount = extract_amount(text);
        let target_date = extract_date(text, today);
        let mut missing_fields = Vec::new();
        let mut errors = Vec::new();

        match target_amount {
            None => missing_fields.push(MissingField::TargetAmount),
            Some(amount) if !self.reasonable_amount(amount) => errors.push(format!(
                "Target amount {} is not reasonable (should be between {} and {})",
                format_currency(amount),
                format_currency(self.policy.min_amount),
                format_currency(self.policy.max_amount),
            )),
            Some(_) => {}
        }

        let horizon = target_date.map(|date| years_between(today, date));
        match (target_date, horizon) {
            (Some(date), Some(years)) if !self.reasonable_horizon(years) => errors.push(format!(
                "Target date {date} is not reasonable (should be between 1 month and {} years from now)",
                self.policy.max_years
            )),
            (None, _) => missing_fields.push(MissingField::TargetDate),
            _ => {}
        }

        if let (Some(amount), Some(years)) = (target_amount, horizon) {
            if years > 0.0 && amount / years > self.policy.max_annual_saving {
                errors.push(
                    "Target amount and date combination seems unrealistic (very high amount in very short time)"
                        .to_string(),
                );
            }
        }

        let validation = GoalValidation {
            is_valid: missing_fields.is_empty() && errors.is_empty(),
            target_amount,
            target_date,
            missing_fields,
            errors,
        };
        debug!(
            is_valid = validation.is_valid,
            missing = validation.missing_fields.len(),
            errors = validation.errors.len(),
            "goal validated"
        );
        validation
    }

    /// Validation results in input order.
    pub fn validate_batch<S: AsRef<str>>(
        &self,
        goals: &[S],
        today: NaiveDate,
    ) -> Vec<(String, GoalValidation)> {
        goals
            .iter()
            .map(|goal| {
                let text = goal.as_ref().to_string();
                let validation = self.validate(&text, today);
                (text, validation)
            })
            .collect()
    }

    /// Asks only for the first missing field; the amount comes first.
    pub fn single_field_prompt(&self, text: &str, validation: &GoalValidation) -> String {
        if validation.is_valid {
            return validated_line(text, validation);
        }
        match validation.first_missing() {
            Some(MissingField::TargetAmount) => format!(
                "Your goal '{text}' needs a target amount.\n\n\
                 Please specify how much you want to save (e.g., $4,000, 5k, 1 million, 2500$).\n\
                 Examples: $20,000, 50k, 1.5 million, 5000$, 10,000 dollars"
            ),
            Some(MissingField::TargetDate) => format!(
                "Your goal '{text}' needs a target date.\n\n\
                 Please specify when you want to achieve this goal (e.g., Dec 2026, June 2027, in 2 years).\n\
                 Examples: December 2026, June 2027, in 3 years, by 2027, next year"
            ),
            None => issues_prompt(text, validation),
        }
    }

    /// Lists every missing field and every reasonableness error at once.
    pub fn full_prompt(&self, text: &str, validation: &GoalValidation) -> String {
        if validation.is_valid {
            return validated_line(text, validation);
        }
        let mut parts = vec![format!("Your goal '{text}' is missing required information:")];
        if validation.is_missing(MissingField::TargetAmount) {
            parts.push("• Please specify the target amount (e.g., $20,000, 50k, 1 million)".to_string());
        }
        if validation.is_missing(MissingField::TargetDate) {
            parts.push("• Please specify the target date (e.g., June 2027, in 2 years, by 2027)".to_string());
        }
        if !validation.errors.is_empty() {
            parts.push("\nAdditional issues:".to_string());
            parts.extend(validation.errors.iter().map(|error| format!("• {error}")));
        }
        parts.push("\nPlease provide the missing information to complete your goal.".to_string());
        parts.join("\n")
    }

    fn reasonable_amount(&self, amount: f64) -> bool {
        (self.policy.min_amount..=self.policy.max_amount).contains(&amount)
    }

    fn reasonable_horizon(&self, years: f64) -> bool {
        (self.policy.min_years..=self.policy.max_years).contains(&years)
    }
}

/// Shown when a goal has both fields but fails a bound.
fn issues_prompt(text: &str, validation: &GoalValidation) -> String {
    let issues = validation
        .errors
        .iter()
        .map(|error| format!("• {error}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Your goal '{text}' has some issues:\n\n{issues}\n\nPlease provide a valid goal.")
}

fn validated_line(text: &str, validation: &GoalValidation) -> String {
    let amount = validation
        .target_amount
        .map(format_currency)
        .unwrap_or_default();
    let date = validation
        .target_date
        .map(|date| date.to_string())
        .unwrap_or_default();
    format!("Goal validated: '{text}' with target amount {amount} and target date {date}")
}

fn years_between(today: NaiveDate, target: NaiveDate) -> f64 {
    target.signed_duration_since(today).num_days() as f64 / 365.25
}

/// `$12,345.67`
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date")
    }

    fn validator() -> GoalValidator {
        GoalValidator::default()
    }

    #[test]
    fn complete_goal_validates() {
        let result = validator().validate("Save $20,000 by December 2026", today());
        assert!(result.is_valid);
        assert_eq!(result.target_amount, Some(20_000.0));
        assert_eq!(result.target_date, NaiveDate::from_ymd_opt(2026, 12, 1));
        assert!(result.missing_fields.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn repair_sequence_fills_one_field_at_a_time() {
        let validator = validator();

        let bare = validator.validate("Buy a car", today());
        assert_eq!(
            bare.missing_fields,
            vec![MissingField::TargetAmount, MissingField::TargetDate]
        );
        let prompt = validator.single_field_prompt("Buy a car", &bare);
        assert!(prompt.contains("needs a target amount"));
        assert!(!prompt.contains("target date"));

        let with_amount = validator.validate("Buy a car 15000", today());
        assert_eq!(with_amount.missing_fields, vec![MissingField::TargetDate]);
        assert!(with_amount.improves_on(&bare));
        assert!(validator
            .single_field_prompt("Buy a car 15000", &with_amount)
            .contains("needs a target date"));

        let complete = validator.validate("Buy a car 15000 by 2027", today());
        assert!(complete.is_valid);
    }

    #[test]
    fn unreasonable_values_are_reported_not_missing() {
        let validator = validator();

        let tiny = validator.validate("Save $50 in 2 months", today());
        assert!(!tiny.is_valid);
        assert!(tiny.missing_fields.is_empty());
        assert!(tiny.errors[0].contains("$50.00 is not reasonable"));

        let distant = validator.validate("Save $5,000 by 2090", today());
        assert_eq!(distant.errors.len(), 1);
        assert!(distant.errors[0].starts_with("Target date 2090-01-15"));

        let rushed = validator.validate("Retire with 5 million in 20 years", today());
        assert_eq!(rushed.target_amount, Some(5_000_000.0));
        assert!(rushed.errors[0].contains("unrealistic"));

        let prompt = validator.single_field_prompt("Save $50 in 2 months", &tiny);
        assert!(prompt.contains("has some issues"));
    }

    #[test]
    fn full_prompt_lists_everything() {
        let validator = validator();
        let result = validator.validate("Save $50 someday", today());
        let prompt = validator.full_prompt("Save $50 someday", &result);
        assert!(!prompt.contains("target amount (e.g."));
        assert!(prompt.contains("target date (e.g."));
        assert!(prompt.contains("Additional issues:"));
    }

    #[test]
    fn batch_keeps_input_order() {
        let results = validator().validate_batch(
            &["Trip to Japan 3000 in 2027", "Learn to paint"],
            today(),
        );
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "Trip to Japan 3000 in 2027");
        assert!(results[0].1.is_valid);
        assert!(!results[1].1.is_valid);
    }

    #[test]
    fn currency_formatting_groups_thousands() {
        assert_eq!(format_currency(20_000.0), "$20,000.00");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(100.0), "$100.00");
    }
}
