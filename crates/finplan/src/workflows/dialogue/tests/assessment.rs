use std::collections::BTreeMap;

use super::common::*;
use crate::workflows::assessment::{QuestionBank, RiskCategory};
use crate::workflows::dialogue::{begin, step, Conversation, Step};

#[test]
fn start_renders_the_first_question() {
    let harness = Harness::new();
    let turn = begin(&harness.context());

    assert_eq!(turn.state.step, Step::Assessment);
    assert_eq!(turn.state.question_index, 0);
    assert!(turn.response.starts_with("How old are you?"));
    assert_eq!(turn.state.last_prompt.as_deref(), Some(turn.response.as_str()));
}

#[test]
fn invalid_answer_repeats_the_question_with_an_example() {
    let harness = Harness::new();
    let mut conversation = Conversation::new(harness.context());
    conversation.start();

    let reply = conversation.receive("banana");
    assert!(reply.contains("isn't a number"));
    assert!(reply.contains("Example: 34"));
    assert!(reply.contains("Try again: How old are you?"));
    assert_eq!(conversation.state().question_index, 0);

    let reply = conversation.receive("130");
    assert!(reply.contains("exceeds 120"));
    assert!(conversation.state().answers.is_empty());
}

#[test]
fn number_words_and_choice_display_are_stored() {
    let harness = Harness::new();
    let mut conversation = Conversation::new(harness.context());
    conversation.start();

    conversation.receive("twenty eight");
    let age = conversation.state().answers.get("age").expect("age stored");
    assert_eq!(age.value, "28");

    for answer in ["10", "6", "0"] {
        conversation.receive(answer);
    }
    let reply = conversation.receive("3");
    assert!(reply.starts_with("What is your investing experience level?"));
    let stability = conversation
        .state()
        .answers
        .get("income_stability")
        .expect("stability stored");
    assert_eq!(stability.value, "choice_3");
    assert_eq!(stability.display, "Stable");

    conversation.receive("I trade options on weekends");
    let experience = conversation
        .state()
        .answers
        .get("experience")
        .expect("experience stored");
    assert_eq!(experience.value, "I trade options on weekends");
    assert_eq!(experience.display, experience.value);
}

#[test]
fn continuation_replays_the_pending_question() {
    let harness = Harness::new();
    let mut conversation = Conversation::new(harness.context());
    let first = conversation.start();

    assert_eq!(conversation.receive("ok"), first);
    assert_eq!(conversation.receive("Got it, continue"), first);
    assert_eq!(conversation.state().question_index, 0);
    assert!(conversation.state().answers.is_empty());
}

#[test]
fn clarification_does_not_consume_the_question() {
    let harness = Harness::new();
    let mut conversation = Conversation::new(harness.context());
    conversation.start();
    conversation.receive("40");

    let reply = conversation.receive("what is a time horizon?");
    assert!(reply.starts_with("Clarified: what is a time horizon?"));
    assert!(reply.ends_with("Type 'continue' or just answer the question.)"));
    assert_eq!(conversation.state().question_index, 1);
    assert_eq!(conversation.state().clarifications, 1);
    assert_eq!(
        harness.assistant.clarify_contexts.borrow().last().cloned().flatten().as_deref(),
        Some("What is your investment time horizon in YEARS? (0–80)")
    );

    let reply = conversation.receive("12");
    assert!(reply.starts_with("Emergency fund size"));
}

#[test]
fn disabled_questions_are_skipped_and_unscored() {
    let mut toggles = BTreeMap::new();
    for id in QuestionBank::known_ids().iter().skip(1) {
        toggles.insert(id.to_string(), false);
    }
    let harness = Harness::with_bank(QuestionBank::with_toggles(&toggles));
    let mut conversation = Conversation::new(harness.context());
    conversation.start();

    let reply = conversation.receive("25");
    let state = conversation.state();
    assert_eq!(state.step, Step::GoalSetting);
    assert_eq!(state.answers.len(), 1);
    let risk = state.risk.as_ref().expect("risk computed");
    assert_eq!(risk.score, 85.0);
    assert_eq!(risk.category, RiskCategory::Aggressive);
    assert!(reply.contains("Your risk score: 85% (Aggressive)"));
}

#[test]
fn conservative_scenario_scores_conservative_and_opens_goal_setting() {
    let harness = Harness::new();
    let conversation = harness.in_goal_setting();
    let state = conversation.state();

    assert_eq!(state.step, Step::GoalSetting);
    assert_eq!(state.answers.len(), 12);
    let risk = state.risk.as_ref().expect("risk computed");
    assert!(risk.score < 35.0);
    assert!((0.0..=100.0).contains(&risk.score));
    assert_eq!(risk.category, RiskCategory::Conservative);
    assert_eq!(state.suggestions.len(), 10);
    assert_eq!(harness.assistant.calls_to("suggest"), 1);
}

#[test]
fn outage_at_the_last_answer_leaves_state_intact_until_retry() {
    let harness = Harness::new();
    let mut conversation = Conversation::new(harness.context());
    conversation.start();
    for answer in &CONSERVATIVE_ANSWERS[..11] {
        conversation.receive(answer);
    }
    let before = conversation.state().clone();

    harness.assistant.offline.set(true);
    let reply = conversation.receive("1");
    assert!(reply.contains("currently unavailable"));
    assert_eq!(conversation.state().step, Step::Assessment);
    assert_eq!(conversation.state().answers, before.answers);
    assert_eq!(conversation.state().last_failed_utterance.as_deref(), Some("1"));

    harness.assistant.offline.set(false);
    let reply = conversation.receive("retry");
    assert!(reply.starts_with("Risk Profile Assessment Complete!"));
    assert_eq!(conversation.state().step, Step::GoalSetting);
    assert_eq!(conversation.state().last_failed_utterance, None);
}

#[test]
fn short_suggestion_batch_is_a_failure() {
    let harness = Harness::new();
    harness.assistant.shortfall.set(1);
    let conversation = harness.in_goal_setting();

    assert_eq!(conversation.state().step, Step::Assessment);
    assert!(conversation.state().suggestions.is_empty());
}

#[test]
fn restart_resets_while_retry_without_failure_restarts() {
    let harness = Harness::new();
    let ctx = harness.context();
    let opened = begin(&ctx);
    let answered = step(&opened.state, "40", &ctx);
    assert_eq!(answered.state.answers.len(), 1);

    let restarted = step(&answered.state, "restart", &ctx);
    assert!(restarted.state.answers.is_empty());
    assert_eq!(restarted.state.user_id, answered.state.user_id);
    assert_ne!(restarted.state.session_id, answered.state.session_id);
    assert!(restarted.response.starts_with("How old are you?"));

    let retried = step(&answered.state, "retry", &ctx);
    assert!(retried.state.answers.is_empty());
}

#[test]
fn step_does_not_touch_the_input_state() {
    let harness = Harness::new();
    let ctx = harness.context();
    let opened = begin(&ctx);
    let snapshot = opened.state.clone();

    let first = step(&opened.state, "40", &ctx);
    let second = step(&opened.state, "40", &ctx);

    assert_eq!(opened.state, snapshot);
    assert_eq!(first.response, second.response);
    assert_eq!(first.state.answers, second.state.answers);
}

#[test]
fn free_text_answer_opening_with_ok_is_stored() {
    let harness = Harness::new();
    let mut conversation = Conversation::new(harness.context());
    conversation.start();
    for answer in ["30", "10", "6", "0", "3", "2"] {
        conversation.receive(answer);
    }

    let reply = conversation.receive("ok with big swings");
    assert!(reply.starts_with("Roughly what percent of your income"));
    let stored = conversation
        .state()
        .answers
        .get("loss_tolerance")
        .expect("loss tolerance answered");
    assert_eq!(stored.value, "ok with big swings");
}
