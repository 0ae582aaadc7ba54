use std::cell::{Cell, RefCell};

use chrono::{TimeZone, Utc};

use crate::config::DialogueConfig;
use crate::workflows::assessment::QuestionBank;
use crate::workflows::dialogue::capability::{CapabilityError, GoalAssistant, SuggestionRequest};
use crate::workflows::dialogue::record::{PersistError, RecordSink, SessionRecord};
use crate::workflows::dialogue::{Conversation, DialogueContext, FixedClock};
use crate::workflows::goals::GoalValidator;

/// Most conservative answer to each of the twelve standard questions.
pub(super) const CONSERVATIVE_ANSWERS: [&str; 12] =
    ["65", "1", "0", "5", "1", "1", "1", "0", "1", "1", "1", "1"];

pub(super) fn fixed_clock() -> FixedClock {
    FixedClock(
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0)
            .single()
            .expect("valid timestamp"),
    )
}

/// Deterministic assistant. Suggestion `n` (1-based across the pool) is
/// "Save $n,000 for goal n by 2030".
#[derive(Default)]
pub(super) struct ScriptedAssistant {
    pub(super) offline: Cell<bool>,
    /// Phrases containing any of these are not financial goals.
    pub(super) rejects: RefCell<Vec<String>>,
    /// Shortens every suggestion batch by this many entries.
    pub(super) shortfall: Cell<usize>,
    pub(super) calls: RefCell<Vec<String>>,
    pub(super) clarify_contexts: RefCell<Vec<Option<String>>>,
}

impl ScriptedAssistant {
    fn check(&self, call: &str) -> Result<(), CapabilityError> {
        self.calls.borrow_mut().push(call.to_string());
        if self.offline.get() {
            return Err(CapabilityError::Unavailable("scripted outage".to_string()));
        }
        Ok(())
    }

    pub(super) fn reject(&self, fragment: &str) {
        self.rejects.borrow_mut().push(fragment.to_string());
    }

    pub(super) fn calls_to(&self, name: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.as_str() == name)
            .count()
    }
}

impl GoalAssistant for ScriptedAssistant {
    fn suggest(&self, request: &SuggestionRequest<'_>) -> Result<Vec<String>, CapabilityError> {
        self.check("suggest")?;
        let start = request.exclude.len() + 1;
        let count = request.count.saturating_sub(self.shortfall.get());
        Ok((start..start + count)
            .map(|n| format!("Save ${n},000 for goal {n} by 2030"))
            .collect())
    }

    fn classify(&self, phrase: &str) -> Result<bool, CapabilityError> {
        self.check("classify")?;
        let lowered = phrase.to_lowercase();
        Ok(!self
            .rejects
            .borrow()
            .iter()
            .any(|fragment| lowered.contains(fragment.as_str())))
    }

    fn elaborate(&self, goal: &str) -> Result<String, CapabilityError> {
        self.check("elaborate")?;
        Ok(format!("Details for {goal}"))
    }

    fn clarify(&self, question: &str, context: Option<&str>) -> Result<String, CapabilityError> {
        self.check("clarify")?;
        self.clarify_contexts
            .borrow_mut()
            .push(context.map(str::to_string));
        Ok(format!("Clarified: {question}"))
    }
}

#[derive(Default)]
pub(super) struct MemorySink {
    pub(super) records: RefCell<Vec<SessionRecord>>,
    pub(super) failing: Cell<bool>,
}

impl RecordSink for MemorySink {
    fn persist(&self, record: &SessionRecord) -> Result<String, PersistError> {
        if self.failing.get() {
            return Err(PersistError::Rejected("disk full".to_string()));
        }
        self.records.borrow_mut().push(record.clone());
        Ok(format!("memory://{}", record.session_id))
    }
}

pub(super) struct Harness {
    pub(super) bank: QuestionBank,
    pub(super) assistant: ScriptedAssistant,
    pub(super) sink: MemorySink,
    pub(super) clock: FixedClock,
    pub(super) validator: GoalValidator,
    pub(super) config: DialogueConfig,
}

impl Harness {
    pub(super) fn new() -> Self {
        Self::with_bank(QuestionBank::standard())
    }

    pub(super) fn with_bank(bank: QuestionBank) -> Self {
        Self {
            bank,
            assistant: ScriptedAssistant::default(),
            sink: MemorySink::default(),
            clock: fixed_clock(),
            validator: GoalValidator::default(),
            config: DialogueConfig::default(),
        }
    }

    pub(super) fn context(&self) -> DialogueContext<'_> {
        DialogueContext {
            bank: &self.bank,
            assistant: &self.assistant,
            sink: &self.sink,
            clock: &self.clock,
            validator: &self.validator,
            config: &self.config,
        }
    }

    /// Conversation that has answered every question and is setting goals.
    pub(super) fn in_goal_setting(&self) -> Conversation<'_> {
        let mut conversation = Conversation::new(self.context());
        conversation.start();
        for answer in CONSERVATIVE_ANSWERS {
            conversation.receive(answer);
        }
        conversation
    }

    /// Goal-setting conversation with suggestions 1..=count selected.
    pub(super) fn with_goals(&self, count: usize) -> Conversation<'_> {
        let mut conversation = self.in_goal_setting();
        let picks = (1..=count)
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",");
        conversation.receive(&picks);
        conversation
    }
}
