//! The assessment and goal-setting state machine.
//!
//! [`step`] is a function of the current [`SessionState`] and one utterance:
//! every turn works on a copy, and a turn that fails on a collaborator hands
//! back the state it was given.

use thiserror::Error;
use tracing::{debug, info, warn};

use super::capability::{CapabilityError, GoalAssistant, SuggestionRequest};
use super::clock::Clock;
use super::intent::{
    classify_goal_command, is_continuation, is_question, parse_explanation, reset_keyword,
    GoalCommand, Reset,
};
use super::record::{PersistError, RecordSink, SessionRecord};
use super::render;
use super::state::{PendingValidation, SessionState, Step};
use crate::config::DialogueConfig;
use crate::workflows::assessment::{QuestionBank, RiskAssessment, ScoringEngine};
use crate::workflows::goals::{
    DeletedGoal, GoalSource, GoalValidation, GoalValidator, SelectedGoal,
};

/// Collaborators and settings shared by every turn of a conversation.
#[derive(Clone, Copy)]
pub struct DialogueContext<'a> {
    pub bank: &'a QuestionBank,
    pub assistant: &'a dyn GoalAssistant,
    pub sink: &'a dyn RecordSink,
    pub clock: &'a dyn Clock,
    pub validator: &'a GoalValidator,
    pub config: &'a DialogueConfig,
}

/// Result of one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub state: SessionState,
    pub response: String,
}

#[derive(Debug, Error)]
enum TurnFailure {
    #[error(transparent)]
    Capability(#[from] CapabilityError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl TurnFailure {
    fn message(&self) -> &'static str {
        match self {
            TurnFailure::Capability(_) => render::CAPABILITY_UNAVAILABLE,
            TurnFailure::Persist(_) => render::RECORD_UNAVAILABLE,
        }
    }
}

type TurnResult = Result<String, TurnFailure>;

/// Opens a new session and renders its first prompt.
pub fn begin(ctx: &DialogueContext<'_>) -> Turn {
    open(SessionState::new(ctx.clock), ctx)
}

fn open(fresh: SessionState, ctx: &DialogueContext<'_>) -> Turn {
    let mut working = fresh.clone();
    match prompt_next_question(&mut working, ctx) {
        Ok(response) => Turn {
            state: working,
            response,
        },
        Err(failure) => {
            warn!(error = %failure, "session could not be opened");
            Turn {
                state: fresh,
                response: failure.message().to_string(),
            }
        }
    }
}

/// Applies one utterance to `state`.
pub fn step(state: &SessionState, utterance: &str, ctx: &DialogueContext<'_>) -> Turn {
    let text = utterance.trim();
    debug!(step = ?state.step, utterance_len = text.len(), "utterance received");

    match reset_keyword(text) {
        Some(Reset::Restart) => {
            info!(session = %state.session_id, "session restarted");
            return open(state.restarted(ctx.clock), ctx);
        }
        Some(Reset::Retry) => {
            if let Some(failed) = &state.last_failed_utterance {
                debug!("replaying last failed utterance");
                let mut replay = state.clone();
                replay.last_failed_utterance = None;
                return step(&replay, failed, ctx);
            }
            info!(session = %state.session_id, "session restarted");
            return open(state.restarted(ctx.clock), ctx);
        }
        None => {}
    }

    let mut working = state.clone();
    match dispatch(&mut working, text, ctx) {
        Ok(response) => {
            working.last_failed_utterance = None;
            Turn {
                state: working,
                response,
            }
        }
        Err(failure) => {
            warn!(error = %failure, step = ?state.step, "turn failed, state left unchanged");
            let mut unchanged = state.clone();
            unchanged.last_failed_utterance = Some(text.to_string());
            Turn {
                state: unchanged,
                response: failure.message().to_string(),
            }
        }
    }
}

fn dispatch(state: &mut SessionState, text: &str, ctx: &DialogueContext<'_>) -> TurnResult {
    if state.step == Step::Complete {
        return Ok(render::SESSION_COMPLETE.to_string());
    }

    if is_continuation(text) {
        match (state.step, &state.pending) {
            (Step::Assessment, _) => {
                if let Some(prompt) = &state.last_prompt {
                    return Ok(prompt.clone());
                }
            }
            (Step::GoalSetting, Some(pending)) => {
                return Ok(ctx
                    .validator
                    .single_field_prompt(&pending.text, &pending.validation));
            }
            (Step::GoalSetting, None)
                if classify_goal_command(text) == GoalCommand::Text
                    && !state.suggestions.is_empty() =>
            {
                return Ok(render::current_suggestions(&state.suggestions));
            }
            _ => {}
        }
    }

    let explanation_command = state.step == Step::GoalSetting && parse_explanation(text).is_some();
    if is_question(text) && !explanation_command {
        return clarify(state, text, ctx);
    }

    match state.step {
        Step::Assessment => answer_question(state, text, ctx),
        Step::GoalSetting => set_goals(state, text, ctx),
        Step::Complete => Ok(render::SESSION_COMPLETE.to_string()),
    }
}

fn clarify(state: &mut SessionState, text: &str, ctx: &DialogueContext<'_>) -> TurnResult {
    let in_assessment = state.step == Step::Assessment;
    let asked = if in_assessment {
        ctx.bank
            .next_enabled(state.question_index)
            .map(|(_, question)| question.prompt)
    } else {
        None
    };
    let answer = ctx.assistant.clarify(text, asked)?;
    state.clarifications += 1;
    debug!(clarifications = state.clarifications, "clarification answered");
    Ok(render::clarification(&answer, in_assessment))
}

fn prompt_next_question(state: &mut SessionState, ctx: &DialogueContext<'_>) -> TurnResult {
    match ctx.bank.next_enabled(state.question_index) {
        Some((index, question)) => {
            state.question_index = index;
            let prompt = question.render_prompt();
            state.last_prompt = Some(prompt.clone());
            Ok(prompt)
        }
        None => finish_assessment(state, ctx),
    }
}

fn answer_question(state: &mut SessionState, text: &str, ctx: &DialogueContext<'_>) -> TurnResult {
    let Some((index, question)) = ctx.bank.next_enabled(state.question_index) else {
        return finish_assessment(state, ctx);
    };

    match question.validate(text) {
        Err(rejection) => {
            debug!(question = question.id, "answer rejected");
            Ok(render::answer_rejected(question, &rejection.0))
        }
        Ok(answer) => {
            debug!(question = question.id, "answer accepted");
            state.answers.upsert(question.id, answer);
            state.question_index = index + 1;
            prompt_next_question(state, ctx)
        }
    }
}

fn finish_assessment(state: &mut SessionState, ctx: &DialogueContext<'_>) -> TurnResult {
    let risk = ScoringEngine::assess(ctx.bank, &state.answers);
    let page = fetch_suggestions(state, &risk, ctx)?;

    info!(
        score = risk.score,
        category = risk.label(),
        answered = state.answers.len(),
        "assessment complete"
    );
    state.suggestions.push_page(page);
    state.step = Step::GoalSetting;
    state.last_prompt = None;
    let response = format!(
        "{}\n\n{}",
        render::risk_result(&risk),
        render::goal_intro(&risk, &state.suggestions)
    );
    state.risk = Some(risk);
    Ok(response)
}

/// One page of suggestions, distinct from each other and from the pool.
fn fetch_suggestions(
    state: &SessionState,
    risk: &RiskAssessment,
    ctx: &DialogueContext<'_>,
) -> Result<Vec<String>, CapabilityError> {
    let count = ctx.config.suggestion_batch;
    let request = SuggestionRequest {
        category: risk.category,
        score: risk.score,
        answers: &state.answers,
        exclude: state.suggestions.entries(),
        count,
        as_of: ctx.clock.today(),
    };
    let returned = ctx.assistant.suggest(&request)?;

    let mut page: Vec<String> = Vec::with_capacity(count);
    for suggestion in returned {
        let suggestion = suggestion.trim().to_string();
        if suggestion.is_empty()
            || page.contains(&suggestion)
            || state.suggestions.position(&suggestion).is_some()
        {
            continue;
        }
        page.push(suggestion);
    }
    if page.len() < count {
        return Err(CapabilityError::InsufficientSuggestions {
            received: page.len(),
            needed: count,
            attempts: ctx.config.suggestion_attempts,
        });
    }
    page.truncate(count);
    Ok(page)
}

fn current_risk(state: &SessionState, ctx: &DialogueContext<'_>) -> RiskAssessment {
    state
        .risk
        .clone()
        .unwrap_or_else(|| ScoringEngine::assess(ctx.bank, &state.answers))
}

fn set_goals(state: &mut SessionState, text: &str, ctx: &DialogueContext<'_>) -> TurnResult {
    if let Some(pending) = state.pending.clone() {
        return repair(state, pending, text, ctx);
    }

    let command = classify_goal_command(text);
    debug!(?command, "goal command");
    match command {
        GoalCommand::Done => {
            if state.goals.is_empty() {
                return Ok(render::ADD_GOAL_FIRST.to_string());
            }
            complete(state, ctx)
        }
        GoalCommand::Explain(None) => Ok(render::EXPLAIN_WHICH.to_string()),
        GoalCommand::Explain(Some(number)) => explain(state, number, ctx),
        GoalCommand::Delete(numbers) => delete(state, numbers, ctx),
        GoalCommand::MoreSuggestions => {
            let risk = current_risk(state, ctx);
            let page = fetch_suggestions(state, &risk, ctx)?;
            let first = state.suggestions.push_page(page);
            debug!(first, pages = state.suggestions.pages(), "suggestion page added");
            Ok(render::more_suggestions(&state.suggestions))
        }
        GoalCommand::ShowOptions => {
            if state.suggestions.is_empty() {
                let risk = current_risk(state, ctx);
                let page = fetch_suggestions(state, &risk, ctx)?;
                state.suggestions.push_page(page);
                return Ok(render::goal_intro(&risk, &state.suggestions));
            }
            Ok(render::current_suggestions(&state.suggestions))
        }
        GoalCommand::Decline => Ok(render::DECLINED.to_string()),
        GoalCommand::Select(numbers) => select(state, numbers, ctx),
        GoalCommand::Text => propose_goal(state, text, ctx),
    }
}

fn explain(state: &mut SessionState, number: usize, ctx: &DialogueContext<'_>) -> TurnResult {
    if state.goals.is_empty() {
        return Ok(render::NO_GOALS_YET.to_string());
    }
    let Some(goal) = number.checked_sub(1).and_then(|index| state.goals.get(index)) else {
        return Ok(render::goal_out_of_range(number, &state.goals));
    };
    let goal = goal.text.clone();
    let elaboration = ctx.assistant.elaborate(&goal)?;
    state.goals_explained += 1;
    Ok(render::explanation(number, &goal, &elaboration, &state.goals))
}

/// All-or-nothing: one out-of-range number aborts the whole command.
fn delete(state: &mut SessionState, numbers: Vec<usize>, ctx: &DialogueContext<'_>) -> TurnResult {
    if numbers.is_empty() {
        return Ok(render::DELETE_WHICH.to_string());
    }
    if state.goals.is_empty() {
        return Ok(render::NO_GOALS_YET.to_string());
    }

    let mut targets = numbers;
    targets.sort_unstable();
    targets.dedup();
    if let Some(&invalid) = targets
        .iter()
        .find(|&&number| number == 0 || number > state.goals.len())
    {
        return Ok(render::goal_out_of_range(invalid, &state.goals));
    }

    // highest first so earlier positions stay put
    let mut removed: Vec<String> = targets
        .iter()
        .rev()
        .map(|number| state.goals.remove(number - 1).text)
        .collect();
    removed.reverse();

    let now = ctx.clock.now();
    for text in &removed {
        let id = format!("goal_deleted_{}", state.deleted_goals.len() + 1);
        state.deleted_goals.push(DeletedGoal {
            id,
            text: text.clone(),
            deleted_at: now,
        });
    }
    info!(
        deleted = removed.len(),
        remaining = state.goals.len(),
        "goals deleted"
    );
    Ok(render::deleted(&removed, &state.goals))
}

/// Duplicates and suggestions that do not classify as goals are skipped.
fn select(state: &mut SessionState, numbers: Vec<usize>, ctx: &DialogueContext<'_>) -> TurnResult {
    if let Some(&missing) = numbers
        .iter()
        .find(|&&number| state.suggestions.get(number).is_none())
    {
        return Ok(render::suggestion_out_of_range(missing, &state.suggestions));
    }

    let today = ctx.clock.today();
    let now = ctx.clock.now();
    let mut added = Vec::new();
    let mut visited = Vec::new();

    for number in numbers {
        if visited.contains(&number) {
            continue;
        }
        visited.push(number);

        let Some(text) = state.suggestions.get(number).map(str::to_string) else {
            continue;
        };
        if state.has_goal(&text) {
            continue;
        }
        if !ctx.assistant.classify(&text)? {
            debug!(number, "suggestion not classified as a goal");
            continue;
        }

        let validation = ctx.validator.validate(&text, today);
        state.goals.push(SelectedGoal {
            text: text.clone(),
            source: GoalSource::Suggestion {
                suggestion_number: number,
            },
            target_amount: validation.target_amount,
            target_date: validation.target_date,
            added_at: now,
        });
        added.push(text);
    }

    if added.is_empty() {
        return Ok(render::nothing_added());
    }
    info!(
        added = added.len(),
        total = state.goals.len(),
        "suggestions selected"
    );
    Ok(render::goals_added(&added, &state.goals))
}

fn propose_goal(state: &mut SessionState, text: &str, ctx: &DialogueContext<'_>) -> TurnResult {
    if state.has_goal(text) {
        return Ok(render::already_selected(text));
    }
    if !ctx.assistant.classify(text)? {
        return Ok(render::NOT_A_GOAL.to_string());
    }

    let validation = ctx.validator.validate(text, ctx.clock.today());
    if validation.is_valid {
        accept_custom(state, text, &validation, ctx);
        return Ok(render::goals_added(&[text.to_string()], &state.goals));
    }

    let prompt = ctx.validator.single_field_prompt(text, &validation);
    if !validation.missing_fields.is_empty() {
        debug!(missing = validation.missing_fields.len(), "goal awaiting repair");
        state.pending = Some(PendingValidation {
            text: text.to_string(),
            validation,
        });
    }
    Ok(prompt)
}

/// Merges the reply onto the original goal text. Only a reply that fills a
/// missing field replaces the pending text.
fn repair(
    state: &mut SessionState,
    pending: PendingValidation,
    text: &str,
    ctx: &DialogueContext<'_>,
) -> TurnResult {
    let merged = format!("{} {}", pending.text, text);
    let validation = ctx.validator.validate(&merged, ctx.clock.today());

    if validation.is_valid {
        state.pending = None;
        if state.has_goal(&merged) {
            return Ok(render::already_selected(&merged));
        }
        accept_custom(state, &merged, &validation, ctx);
        return Ok(render::goals_added(&[merged], &state.goals));
    }

    if validation.missing_fields.is_empty() {
        state.pending = None;
        return Ok(ctx.validator.single_field_prompt(&merged, &validation));
    }

    if validation.improves_on(&pending.validation) {
        let prompt = ctx.validator.single_field_prompt(&merged, &validation);
        state.pending = Some(PendingValidation {
            text: merged,
            validation,
        });
        return Ok(prompt);
    }

    Ok(ctx
        .validator
        .single_field_prompt(&pending.text, &pending.validation))
}

fn accept_custom(
    state: &mut SessionState,
    text: &str,
    validation: &GoalValidation,
    ctx: &DialogueContext<'_>,
) {
    state.goals.push(SelectedGoal {
        text: text.to_string(),
        source: GoalSource::Custom,
        target_amount: validation.target_amount,
        target_date: validation.target_date,
        added_at: ctx.clock.now(),
    });
    info!(total = state.goals.len(), "custom goal accepted");
}

fn complete(state: &mut SessionState, ctx: &DialogueContext<'_>) -> TurnResult {
    let now = ctx.clock.now();
    state.step = Step::Complete;
    state.completed_at = Some(now);

    let record = SessionRecord::from_session(state, ctx.bank, now);
    let location = ctx.sink.persist(&record)?;
    info!(
        session = %state.session_id,
        goals = state.goals.len(),
        "session complete"
    );

    let response = render::summary(&record.risk_profile, &state.goals, &location);
    state.record_location = Some(location);
    Ok(response)
}

/// Owns the state of one conversation and exposes `start`/`receive`.
pub struct Conversation<'a> {
    context: DialogueContext<'a>,
    state: SessionState,
}

impl<'a> Conversation<'a> {
    pub fn new(context: DialogueContext<'a>) -> Self {
        let state = SessionState::new(context.clock);
        Self { context, state }
    }

    pub fn start(&mut self) -> String {
        let turn = open(self.state.restarted(self.context.clock), &self.context);
        self.state = turn.state;
        turn.response
    }

    pub fn receive(&mut self, utterance: &str) -> String {
        let turn = step(&self.state, utterance, &self.context);
        self.state = turn.state;
        turn.response
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }
}
