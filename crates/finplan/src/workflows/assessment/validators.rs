use super::domain::ValidatedAnswer;
use super::numbers::{extract_decimal, extract_integer};

/// Human-readable reason an answer was not accepted. Always includes an example.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct AnswerRejection(pub String);

/// Whether a numeric field accepts only whole numbers or decimals too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Whole,
    Decimal,
}

/// Range-checked numeric question. The lower bound is always zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericField {
    pub kind: NumberKind,
    pub max: f64,
    /// Sentence used when the text is not a number at all.
    pub ask: String,
    /// Sentence restating the accepted range.
    pub range: String,
    pub example: &'static str,
}

impl NumericField {
    pub fn age() -> Self {
        Self {
            kind: NumberKind::Whole,
            max: 120.0,
            ask: "Please enter your age in whole years (0–120).".to_string(),
            range: "Age must be 0–120.".to_string(),
            example: "34",
        }
    }

    pub fn years() -> Self {
        Self {
            kind: NumberKind::Whole,
            max: 80.0,
            ask: "Enter your time horizon in whole years (0–80).".to_string(),
            range: "Enter 0–80 years.".to_string(),
            example: "7",
        }
    }

    pub fn months() -> Self {
        Self {
            kind: NumberKind::Whole,
            max: 120.0,
            ask: "Enter months (0–120).".to_string(),
            range: "Enter months 0–120.".to_string(),
            example: "6",
        }
    }

    pub fn percentage() -> Self {
        Self {
            kind: NumberKind::Decimal,
            max: 100.0,
            ask: "Enter a percentage between 0 and 100 (no % sign needed).".to_string(),
            range: "Enter 0–100.".to_string(),
            example: "15",
        }
    }

    pub fn count(upper: u32) -> Self {
        Self {
            kind: NumberKind::Whole,
            max: f64::from(upper),
            ask: format!("Enter a whole number between 0 and {upper}."),
            range: format!("Enter 0–{upper}."),
            example: "2",
        }
    }

    pub fn validate(&self, raw: &str) -> Result<ValidatedAnswer, AnswerRejection> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AnswerRejection(format!(
                "Please type an answer. {} Example: {}",
                self.ask, self.example
            )));
        }

        let parsed = match self.kind {
            NumberKind::Whole => extract_integer(trimmed).map(|value| value as f64),
            NumberKind::Decimal => extract_decimal(trimmed),
        };
        let Some(value) = parsed else {
            return Err(AnswerRejection(format!(
                "\"{trimmed}\" isn't a number. {} Example: {}",
                self.ask, self.example
            )));
        };

        let shown = format_number(value);
        if value < 0.0 {
            return Err(AnswerRejection(format!(
                "You entered {shown}, which is negative. {} Example: {}",
                self.range, self.example
            )));
        }
        if value > self.max {
            return Err(AnswerRejection(format!(
                "You entered {shown}, which exceeds {}. {} Example: {}",
                format_number(self.max),
                self.range,
                self.example
            )));
        }

        Ok(ValidatedAnswer {
            value: shown.clone(),
            display: shown,
        })
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Accept a 1-based option index or, failing that, the trimmed text verbatim.
pub fn validate_choice(raw: &str, choices: &[&str]) -> Result<ValidatedAnswer, AnswerRejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnswerRejection(format!(
            "Please choose 1–{} or type a clear answer.",
            choices.len()
        )));
    }

    if let Ok(index) = trimmed.parse::<usize>() {
        if (1..=choices.len()).contains(&index) {
            return Ok(ValidatedAnswer {
                value: format!("choice_{index}"),
                display: choices[index - 1].to_string(),
            });
        }
    }

    Ok(ValidatedAnswer {
        value: trimmed.to_string(),
        display: trimmed.to_string(),
    })
}

/// Validator attached to a question.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerKind {
    Numeric(NumericField),
    Choice,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_accepts_digits_and_words() {
        let field = NumericField::age();
        assert_eq!(field.validate(" 34 ").expect("digits").value, "34");
        assert_eq!(field.validate("twenty eight").expect("words").value, "28");
    }

    #[test]
    fn age_rejects_with_specific_messages() {
        let field = NumericField::age();

        let err = field.validate("old enough").expect_err("not a number");
        assert!(err.0.starts_with("\"old enough\" isn't a number."));
        assert!(err.0.contains("Example: 34"));

        let err = field.validate("-3").expect_err("negative");
        assert!(err.0.contains("You entered -3, which is negative."));

        let err = field.validate("130").expect_err("too large");
        assert!(err.0.contains("which exceeds 120"));

        assert!(field.validate("   ").is_err());
    }

    #[test]
    fn overlong_digit_runs_report_the_range() {
        let err = NumericField::age()
            .validate("99999999999999999999")
            .expect_err("too large");
        assert!(err.0.contains("which exceeds 120"), "{}", err.0);

        let err = NumericField::percentage()
            .validate("99999999999999999999")
            .expect_err("too large");
        assert!(err.0.contains("which exceeds 100"), "{}", err.0);

        let err = NumericField::age()
            .validate("-99999999999999999999")
            .expect_err("negative");
        assert!(err.0.contains("which is negative"), "{}", err.0);
    }

    #[test]
    fn never_clamps_out_of_range_values() {
        assert!(NumericField::years().validate("81").is_err());
        assert!(NumericField::months().validate("121").is_err());
        assert!(NumericField::count(20).validate("21").is_err());
        assert_eq!(
            NumericField::count(20).validate("20").expect("upper bound").value,
            "20"
        );
    }

    #[test]
    fn percentage_keeps_decimals() {
        let field = NumericField::percentage();
        assert_eq!(field.validate("12.5").expect("decimal").value, "12.5");
        assert_eq!(field.validate("15%").expect("percent sign").value, "15");
        assert!(field.validate("100.5").is_err());
    }

    #[test]
    fn choice_normalizes_index_and_keeps_display_text() {
        let choices = ["Beginner", "Some experience", "Experienced", "Advanced/Pro"];
        let answer = validate_choice("2", &choices).expect("index accepted");
        assert_eq!(answer.value, "choice_2");
        assert_eq!(answer.display, "Some experience");
    }

    #[test]
    fn choice_accepts_free_text_verbatim() {
        let choices = ["Sell", "Wait", "Hold", "Buy more"];
        let answer = validate_choice("  I'd probably hold tight ", &choices).expect("free text");
        assert_eq!(answer.value, "I'd probably hold tight");
        assert_eq!(answer.display, answer.value);

        let out_of_range = validate_choice("7", &choices).expect("kept as text");
        assert_eq!(out_of_range.value, "7");

        assert!(validate_choice("", &choices).is_err());
    }
}
