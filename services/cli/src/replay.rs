use crate::infra::{midday, parse_date, read_lines, FileRecordSink};
use chrono::NaiveDate;
use clap::Args;
use finplan::config::AppConfig;
use finplan::error::AppError;
use finplan::workflows::assessment::QuestionBank;
use finplan::workflows::dialogue::{
    CapabilityError, Clock, Conversation, DialogueContext, FixedClock, GoalAssistant,
    SuggestionRequest, SystemClock,
};
use finplan::workflows::goals::GoalValidator;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ReplayArgs {
    /// Utterances, one per line. Blank lines and lines starting with '#' are skipped.
    #[arg(long)]
    pub(crate) transcript: PathBuf,
    /// JSON fixture scripting the text-generation responses
    #[arg(long)]
    pub(crate) script: PathBuf,
    /// Directory for the completion record (defaults to FINPLAN_RECORD_DIR)
    #[arg(long)]
    pub(crate) record_dir: Option<PathBuf>,
    /// Pin the session clock to this date (YYYY-MM-DD) instead of now
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

/// Canned text-generation behavior loaded from a fixture file.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ReplayScript {
    /// Served in order, skipping entries already in the pool.
    pub(crate) suggestions: Vec<String>,
    /// Phrases containing any of these fragments are not goals.
    #[serde(default)]
    pub(crate) not_goals: Vec<String>,
    #[serde(default)]
    pub(crate) explanation: Option<String>,
    #[serde(default)]
    pub(crate) clarification: Option<String>,
    /// Every call fails, as if the service were down.
    #[serde(default)]
    pub(crate) offline: bool,
}

impl ReplayScript {
    fn check(&self) -> Result<(), CapabilityError> {
        if self.offline {
            return Err(CapabilityError::Unavailable(
                "scripted outage".to_string(),
            ));
        }
        Ok(())
    }
}

impl GoalAssistant for ReplayScript {
    fn suggest(&self, request: &SuggestionRequest<'_>) -> Result<Vec<String>, CapabilityError> {
        self.check()?;
        let batch: Vec<String> = self
            .suggestions
            .iter()
            .filter(|suggestion| !request.exclude.contains(suggestion))
            .take(request.count)
            .cloned()
            .collect();
        if batch.len() < request.count {
            return Err(CapabilityError::InsufficientSuggestions {
                received: batch.len(),
                needed: request.count,
                attempts: 1,
            });
        }
        Ok(batch)
    }

    fn classify(&self, phrase: &str) -> Result<bool, CapabilityError> {
        self.check()?;
        let lowered = phrase.to_lowercase();
        Ok(!self
            .not_goals
            .iter()
            .any(|fragment| lowered.contains(&fragment.to_lowercase())))
    }

    fn elaborate(&self, goal: &str) -> Result<String, CapabilityError> {
        self.check()?;
        Ok(self
            .explanation
            .clone()
            .unwrap_or_else(|| format!("'{goal}' is a scripted goal.")))
    }

    fn clarify(&self, question: &str, _context: Option<&str>) -> Result<String, CapabilityError> {
        self.check()?;
        Ok(self
            .clarification
            .clone()
            .unwrap_or_else(|| format!("No scripted answer for '{question}'.")))
    }
}

/// Opens a conversation and feeds it every utterance, returning the opening
/// prompt followed by each utterance and its response.
pub(crate) fn replay(
    ctx: DialogueContext<'_>,
    utterances: &[String],
) -> (String, Vec<(String, String)>) {
    let mut conversation = Conversation::new(ctx);
    let opening = conversation.start();
    let exchanges = utterances
        .iter()
        .map(|utterance| (utterance.clone(), conversation.receive(utterance)))
        .collect();
    (opening, exchanges)
}

pub(crate) fn run_replay(args: ReplayArgs, config: &AppConfig) -> Result<(), AppError> {
    let ReplayArgs {
        transcript,
        script,
        record_dir,
        today,
    } = args;

    let utterances = read_lines(&transcript)?;
    let script: ReplayScript = serde_json::from_str(&fs::read_to_string(&script)?)?;
    let sink = FileRecordSink::new(record_dir.unwrap_or_else(|| config.storage.record_dir.clone()));
    let bank = QuestionBank::with_toggles(&config.dialogue.question_toggles);
    let validator = GoalValidator::default();
    let fixed = today.map(|date| FixedClock(midday(date)));
    let clock: &dyn Clock = match &fixed {
        Some(fixed) => fixed,
        None => &SystemClock,
    };

    let ctx = DialogueContext {
        bank: &bank,
        assistant: &script,
        sink: &sink,
        clock,
        validator: &validator,
        config: &config.dialogue,
    };

    info!(utterances = utterances.len(), "replaying transcript");
    let (opening, exchanges) = replay(ctx, &utterances);
    println!("{opening}");
    for (utterance, response) in exchanges {
        println!("\n> {utterance}\n{response}");
    }
    Ok(())
}

pub(crate) fn run_questions(config: &AppConfig) {
    let bank = QuestionBank::with_toggles(&config.dialogue.question_toggles);
    println!("Question bank ({} enabled)", bank.enabled().count());
    for (index, question) in bank.questions().iter().enumerate() {
        let status = if question.enabled { "enabled" } else { "disabled" };
        println!(
            "{:>2}. {} (weight {:.1}, {status})\n    {}",
            index + 1,
            question.id,
            question.weight,
            question.prompt
        );
    }
}
