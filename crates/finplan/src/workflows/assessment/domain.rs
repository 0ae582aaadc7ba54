use serde::{Deserialize, Serialize};

/// Canonical form of an accepted answer plus the text shown back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedAnswer {
    pub value: String,
    pub display: String,
}

/// Stored answer keyed by the question it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub value: String,
    pub display: String,
}

/// Answers in the order their questions were asked. Question ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers {
    entries: Vec<AnswerRecord>,
}

impl Answers {
    /// Insert or replace the answer for `question_id`, keeping its original position.
    pub fn upsert(&mut self, question_id: &str, answer: ValidatedAnswer) {
        let ValidatedAnswer { value, display } = answer;
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.question_id == question_id)
        {
            Some(existing) => {
                existing.value = value;
                existing.display = display;
            }
            None => self.entries.push(AnswerRecord {
                question_id: question_id.to_string(),
                value,
                display,
            }),
        }
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerRecord> {
        self.entries
            .iter()
            .find(|entry| entry.question_id == question_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnswerRecord> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered risk buckets derived from the weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Conservative,
    ModeratelyConservative,
    Balanced,
    ModeratelyAggressive,
    Aggressive,
}

impl RiskCategory {
    /// Bucket lower bounds are inclusive: 35.0 is already moderately conservative.
    pub fn from_score(score: f64) -> Self {
        if score < 35.0 {
            Self::Conservative
        } else if score < 55.0 {
            Self::ModeratelyConservative
        } else if score < 70.0 {
            Self::Balanced
        } else if score < 85.0 {
            Self::ModeratelyAggressive
        } else {
            Self::Aggressive
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::ModeratelyConservative => "Moderately Conservative",
            Self::Balanced => "Balanced",
            Self::ModeratelyAggressive => "Moderately Aggressive",
            Self::Aggressive => "Aggressive",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Conservative => {
                "Prefers capital preservation and lower volatility; accepts lower expected returns."
            }
            Self::ModeratelyConservative => {
                "Comfortable with some volatility; leans toward income and balanced strategies."
            }
            Self::Balanced => "Accepts meaningful ups and downs for moderate growth potential.",
            Self::ModeratelyAggressive => {
                "Comfortable with higher volatility for higher long-term growth potential."
            }
            Self::Aggressive => {
                "Seeks maximum growth; comfortable with substantial volatility and drawdowns."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries_belong_to_the_upper_bucket() {
        assert_eq!(RiskCategory::from_score(34.99), RiskCategory::Conservative);
        assert_eq!(
            RiskCategory::from_score(35.0),
            RiskCategory::ModeratelyConservative
        );
        assert_eq!(RiskCategory::from_score(55.0), RiskCategory::Balanced);
        assert_eq!(
            RiskCategory::from_score(70.0),
            RiskCategory::ModeratelyAggressive
        );
        assert_eq!(RiskCategory::from_score(85.0), RiskCategory::Aggressive);
        assert_eq!(RiskCategory::from_score(100.0), RiskCategory::Aggressive);
        assert_eq!(RiskCategory::from_score(0.0), RiskCategory::Conservative);
    }

    #[test]
    fn upsert_keeps_position_and_unique_keys() {
        let mut answers = Answers::default();
        let answer = |value: &str| ValidatedAnswer {
            value: value.to_string(),
            display: value.to_string(),
        };
        answers.upsert("age", answer("34"));
        answers.upsert("horizon", answer("10"));
        answers.upsert("age", answer("34"));

        assert_eq!(answers.len(), 2);
        let ids: Vec<_> = answers.iter().map(|a| a.question_id.as_str()).collect();
        assert_eq!(ids, vec!["age", "horizon"]);
        assert_eq!(answers.get("age").map(|a| a.value.as_str()), Some("34"));
    }
}
