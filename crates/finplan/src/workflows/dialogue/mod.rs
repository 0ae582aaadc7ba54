//! Conversation layer: intent resolution, the assessment and goal-setting
//! state machine, and the collaborator seams it is driven through.

pub mod capability;
mod clock;
pub mod engine;
pub mod intent;
pub mod record;
mod render;
pub mod state;

#[cfg(test)]
mod tests;

pub use capability::{
    ChatCompletion, ChatMessage, CapabilityError, CompletionAssistant, GoalAssistant, Prompts,
    Role, SuggestionRequest,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{begin, step, Conversation, DialogueContext, Turn};
pub use record::{GoalEntry, PersistError, RecordSink, RiskProfile, SessionMetadata, SessionRecord};
pub use state::{PendingValidation, SessionState, Step, SuggestionPool};
