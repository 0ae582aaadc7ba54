use std::collections::BTreeMap;

use super::domain::ValidatedAnswer;
use super::scoring::rules;
use super::validators::{validate_choice, AnswerKind, AnswerRejection, NumericField};

/// Scorer mapping a normalized answer to points in `0..=100`.
pub type Scorer = fn(&str) -> Option<f64>;

/// A single weighted assessment question.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: &'static str,
    pub prompt: &'static str,
    pub choices: Vec<&'static str>,
    pub kind: AnswerKind,
    pub scorer: Scorer,
    pub weight: f64,
    pub enabled: bool,
}

impl Question {
    pub fn validate(&self, raw: &str) -> Result<ValidatedAnswer, AnswerRejection> {
        match &self.kind {
            AnswerKind::Numeric(field) => field.validate(raw),
            AnswerKind::Choice => validate_choice(raw, &self.choices),
        }
    }

    pub fn score(&self, value: &str) -> Option<f64> {
        (self.scorer)(value).map(|points| points.clamp(0.0, 100.0))
    }

    pub fn render_prompt(&self) -> String {
        let mut lines = vec![self.prompt.trim().to_string(), String::new()];
        if self.choices.is_empty() {
            lines.push("Please type your answer directly.".to_string());
        } else {
            for (index, choice) in self.choices.iter().enumerate() {
                lines.push(format!("{}) {}", index + 1, choice));
            }
            lines.push(format!(
                "{}) Other (type your own answer; any clear format is fine)",
                self.choices.len() + 1
            ));
            lines.push(String::new());
            lines.push(format!(
                "Reply with 1–{} or write your own answer.",
                self.choices.len()
            ));
        }
        lines.join("\n")
    }
}

/// Ordered, toggle-able list of assessment questions.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

const QUESTION_IDS: [&str; 12] = [
    "age",
    "horizon",
    "emergency_fund_months",
    "dependents",
    "income_stability",
    "experience",
    "loss_tolerance",
    "savings_rate",
    "debt_load",
    "liquidity_need",
    "reaction_scenario",
    "investment_objective",
];

impl QuestionBank {
    pub fn standard() -> Self {
        Self {
            questions: standard_questions(),
        }
    }

    /// Standard bank with questions switched on or off by id.
    pub fn with_toggles(toggles: &BTreeMap<String, bool>) -> Self {
        let mut bank = Self::standard();
        for question in &mut bank.questions {
            if let Some(enabled) = toggles.get(question.id) {
                question.enabled = *enabled;
            }
        }
        bank
    }

    pub fn known_ids() -> &'static [&'static str] {
        &QUESTION_IDS
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// First enabled question at or after `from`, with its index.
    pub fn next_enabled(&self, from: usize) -> Option<(usize, &Question)> {
        self.questions
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, question)| question.enabled)
    }

    pub fn enabled(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|question| question.enabled)
    }
}

fn numeric(
    id: &'static str,
    prompt: &'static str,
    field: NumericField,
    scorer: Scorer,
    weight: f64,
) -> Question {
    Question {
        id,
        prompt,
        choices: Vec::new(),
        kind: AnswerKind::Numeric(field),
        scorer,
        weight,
        enabled: true,
    }
}

fn choice(
    id: &'static str,
    prompt: &'static str,
    choices: [&'static str; 4],
    scorer: Scorer,
    weight: f64,
) -> Question {
    Question {
        id,
        prompt,
        choices: choices.to_vec(),
        kind: AnswerKind::Choice,
        scorer,
        weight,
        enabled: true,
    }
}

fn standard_questions() -> Vec<Question> {
    vec![
        numeric(
            "age",
            "How old are you? (whole years)",
            NumericField::age(),
            rules::score_age,
            1.0,
        ),
        numeric(
            "horizon",
            "What is your investment time horizon in YEARS? (0–80)",
            NumericField::years(),
            rules::score_horizon,
            1.2,
        ),
        numeric(
            "emergency_fund_months",
            "Emergency fund size in MONTHS of essential expenses? (0–120)",
            NumericField::months(),
            rules::score_emergency_months,
            0.8,
        ),
        numeric(
            "dependents",
            "How many people rely on your income (dependents)? (0–20)",
            NumericField::count(20),
            rules::score_dependents,
            0.6,
        ),
        choice(
            "income_stability",
            "How stable is your income?",
            ["Very unstable", "Somewhat stable", "Stable", "Very stable"],
            rules::score_income_stability,
            0.8,
        ),
        choice(
            "experience",
            "What is your investing experience level?",
            ["Beginner", "Some experience", "Experienced", "Advanced/Pro"],
            rules::score_experience,
            0.9,
        ),
        choice(
            "loss_tolerance",
            "How do you feel about temporary losses (drawdowns)?",
            [
                "I can't tolerate losses",
                "Small dips are okay",
                "Volatility is fine if returns are higher",
                "I'm comfortable with big swings",
            ],
            rules::score_loss_tolerance,
            1.2,
        ),
        numeric(
            "savings_rate",
            "Roughly what percent of your income do you save/invest monthly? (0–100%)",
            NumericField::percentage(),
            rules::score_savings_rate,
            0.7,
        ),
        choice(
            "debt_load",
            "How would you describe your current debt load (relative to income)?",
            [
                "No/low debt (<20%)",
                "Manageable (20-35%)",
                "Moderate (35-50%)",
                "High (>50%)",
            ],
            rules::score_debt_load,
            0.8,
        ),
        choice(
            "liquidity_need",
            "When might you need to withdraw a significant portion of this money?",
            ["< 1 year", "1–3 years", "> 3 years", "Not sure"],
            rules::score_liquidity_need,
            1.0,
        ),
        choice(
            "reaction_scenario",
            "Your portfolio drops 20% in a month. What do you do?",
            ["Sell immediately", "Wait a bit", "Hold", "Buy more"],
            rules::score_reaction_scenario,
            1.3,
        ),
        choice(
            "investment_objective",
            "What is your primary investment objective?",
            [
                "Capital preservation",
                "Income",
                "Balanced (growth + income)",
                "Growth",
            ],
            rules::score_objective,
            0.9,
        ),
    ]
}
