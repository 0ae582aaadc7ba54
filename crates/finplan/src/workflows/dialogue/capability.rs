//! Text-generation seam. The engine talks to a [`GoalAssistant`]; the
//! [`CompletionAssistant`] adapts any raw chat-completion capability to it.
//! Calls are instrumented with sizes and counts, never contents.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::workflows::assessment::{Answers, RiskCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("text generation unavailable: {0}")]
    Unavailable(String),
    #[error("only {received} distinct suggestions after {attempts} attempts, needed {needed}")]
    InsufficientSuggestions {
        received: usize,
        needed: usize,
        attempts: usize,
    },
    #[error("text generation returned an empty response")]
    EmptyResponse,
}

/// Raw `complete(messages) -> text` capability supplied by the host.
pub trait ChatCompletion {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, CapabilityError>;
}

impl<T: ChatCompletion + ?Sized> ChatCompletion for &T {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, CapabilityError> {
        (**self).complete(messages)
    }
}

/// Profile context for a batch of goal suggestions.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionRequest<'a> {
    pub category: RiskCategory,
    pub score: f64,
    pub answers: &'a Answers,
    /// Suggestions already in the pool; none of these may be returned.
    pub exclude: &'a [String],
    pub count: usize,
    pub as_of: NaiveDate,
}

/// Operations the dialogue needs from text generation.
pub trait GoalAssistant {
    /// Exactly `request.count` distinct, non-empty suggestions or an error.
    fn suggest(&self, request: &SuggestionRequest<'_>) -> Result<Vec<String>, CapabilityError>;
    /// Whether `phrase` describes a concrete financial goal.
    fn classify(&self, phrase: &str) -> Result<bool, CapabilityError>;
    fn elaborate(&self, goal: &str) -> Result<String, CapabilityError>;
    /// Answer a clarification question, optionally about the question being asked.
    fn clarify(&self, question: &str, context: Option<&str>) -> Result<String, CapabilityError>;
}

/// System prompts used by [`CompletionAssistant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub suggestion_system: String,
    pub classification_system: String,
    pub elaboration_system: String,
    pub clarification_system: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            suggestion_system: "You are a financial planning assistant. Suggest concise, specific, \
time-aware goal options suitable for the user. Be concrete: include amounts, durations or a \
month/year where relevant. Do NOT guarantee returns; use cautious phrasing. Output one goal per \
line; no numbering, no explanations."
                .to_string(),
            classification_system: "You are a validator. Decide if the user's phrase describes a \
concrete financial goal (e.g., saving/investing/debt payoff/retirement/home/education/purchase \
fund). Answer strictly with 'YES' or 'NO' and no other text."
                .to_string(),
            elaboration_system: "You are a financial advisor explaining investment goals. Explain \
what the goal involves and why it matters, strategies to achieve it, timeline considerations, \
risk factors and relevant planning tips. Be specific and educational, concise but thorough."
                .to_string(),
            clarification_system: "You are a helpful financial advisor explaining terms clearly. \
Answer the user's question about the financial term or concept. Be concise but thorough. If \
they are asking about a specific question from the assessment, reference that context. Avoid \
personalized advice."
                .to_string(),
        }
    }
}

static AFFIRMATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^YES\b").expect("affirmative pattern compiles"));
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-•*\s]+|\d+[.)]\s*)+").expect("list marker pattern compiles")
});

/// Suggestion line without bullets or numbering.
fn clean_line(line: &str) -> &str {
    let trimmed = line.trim();
    match LIST_MARKER.find(trimmed) {
        Some(marker) => trimmed[marker.end()..].trim(),
        None => trimmed,
    }
}

/// [`GoalAssistant`] built on a raw chat-completion capability.
pub struct CompletionAssistant<C> {
    client: C,
    prompts: Prompts,
    attempts: usize,
}

impl<C: ChatCompletion> CompletionAssistant<C> {
    /// `attempts` caps how many completions one suggestion batch may use.
    pub fn new(client: C, attempts: usize) -> Self {
        Self {
            client,
            prompts: Prompts::default(),
            attempts: attempts.max(1),
        }
    }

    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn chat_plain(&self, system: &str, user: String) -> Result<String, CapabilityError> {
        let reply = self
            .client
            .complete(&[ChatMessage::system(system), ChatMessage::user(user)])?;
        let reply = reply.trim().to_string();
        if reply.is_empty() {
            return Err(CapabilityError::EmptyResponse);
        }
        Ok(reply)
    }

    fn suggestion_prompt(request: &SuggestionRequest<'_>, missing: usize, seen: &[String]) -> String {
        let answers = request
            .answers
            .iter()
            .map(|answer| format!("{}: {}", answer.question_id, answer.display))
            .collect::<Vec<_>>()
            .join("; ");
        let mut prompt = format!(
            "As of {}, propose {} goal options for a user with profile: {} (risk score {}%).\n\
             Context from assessment: {}\n\
             Only list the goal titles, one per line.",
            request.as_of.format("%B %Y"),
            missing,
            request.category.label(),
            request.score,
            answers,
        );
        if !seen.is_empty() {
            prompt.push_str("\nDo not repeat any of these:\n");
            prompt.push_str(&seen.join("\n"));
        }
        prompt
    }
}

impl<C: ChatCompletion> GoalAssistant for CompletionAssistant<C> {
    #[instrument(level = "debug", skip_all, fields(count = request.count, excluded = request.exclude.len()))]
    fn suggest(&self, request: &SuggestionRequest<'_>) -> Result<Vec<String>, CapabilityError> {
        let mut collected: Vec<String> = Vec::with_capacity(request.count);

        for attempt in 1..=self.attempts {
            let seen: Vec<String> = request
                .exclude
                .iter()
                .chain(collected.iter())
                .cloned()
                .collect();
            let prompt = Self::suggestion_prompt(request, request.count - collected.len(), &seen);
            let reply = self.chat_plain(&self.prompts.suggestion_system, prompt)?;

            for line in reply.lines().map(clean_line) {
                if collected.len() == request.count {
                    break;
                }
                if line.is_empty() || seen.iter().chain(collected.iter()).any(|known| known == line) {
                    continue;
                }
                collected.push(line.to_string());
            }

            debug!(attempt, collected = collected.len(), "suggestion batch received");
            if collected.len() == request.count {
                return Ok(collected);
            }
        }

        warn!(
            received = collected.len(),
            needed = request.count,
            "not enough distinct suggestions"
        );
        Err(CapabilityError::InsufficientSuggestions {
            received: collected.len(),
            needed: request.count,
            attempts: self.attempts,
        })
    }

    #[instrument(level = "debug", skip_all, fields(phrase_len = phrase.len()))]
    fn classify(&self, phrase: &str) -> Result<bool, CapabilityError> {
        let reply = self.chat_plain(
            &self.prompts.classification_system,
            format!("Phrase: {phrase}"),
        )?;
        Ok(AFFIRMATIVE.is_match(&reply.to_uppercase()))
    }

    #[instrument(level = "debug", skip_all, fields(goal_len = goal.len()))]
    fn elaborate(&self, goal: &str) -> Result<String, CapabilityError> {
        self.chat_plain(
            &self.prompts.elaboration_system,
            format!("Please explain this financial goal: {goal}"),
        )
    }

    #[instrument(level = "debug", skip_all, fields(question_len = question.len(), has_context = context.is_some()))]
    fn clarify(&self, question: &str, context: Option<&str>) -> Result<String, CapabilityError> {
        let user = match context {
            Some(asked) => {
                format!("{question}\n\nContext: The user is currently being asked: '{asked}'")
            }
            None => question.to_string(),
        };
        self.chat_plain(&self.prompts.clarification_system, user)
    }
}
