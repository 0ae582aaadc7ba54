use chrono::NaiveDate;

use super::common::*;
use crate::workflows::dialogue::Step;
use crate::workflows::goals::{GoalSource, MissingField};

#[test]
fn incomplete_goal_is_repaired_one_field_at_a_time() {
    let harness = Harness::new();
    let mut conversation = harness.with_goals(1);

    let reply = conversation.receive("Buy a car");
    assert!(reply.starts_with("Your goal 'Buy a car' needs a target amount."));
    let pending = conversation.state().pending.as_ref().expect("pending");
    assert_eq!(
        pending.validation.missing_fields,
        vec![MissingField::TargetAmount, MissingField::TargetDate]
    );

    let reply = conversation.receive("15000");
    assert!(reply.starts_with("Your goal 'Buy a car 15000' needs a target date."));
    let pending = conversation.state().pending.as_ref().expect("pending");
    assert_eq!(pending.text, "Buy a car 15000");
    assert_eq!(pending.validation.target_amount, Some(15_000.0));

    let reply = conversation.receive("by 2027");
    assert!(reply.starts_with("Added goal: Buy a car 15000 by 2027"));
    let state = conversation.state();
    assert!(state.pending.is_none());
    assert_eq!(state.goals.len(), 2);
    let goal = &state.goals[1];
    assert_eq!(goal.source, GoalSource::Custom);
    assert_eq!(goal.target_amount, Some(15_000.0));
    assert_eq!(goal.target_date, NaiveDate::from_ymd_opt(2027, 1, 15));
}

#[test]
fn counted_nouns_do_not_fill_the_amount() {
    let harness = Harness::new();
    let mut conversation = harness.in_goal_setting();

    let reply = conversation.receive("Send 2 kids to college");
    assert!(reply.starts_with("Your goal 'Send 2 kids to college' needs a target amount."));
    let pending = conversation.state().pending.as_ref().expect("pending");
    assert_eq!(pending.validation.target_amount, None);
    assert!(pending.validation.errors.is_empty());

    let reply = conversation.receive("by 2035");
    assert!(reply.starts_with("Your goal 'Send 2 kids to college by 2035' needs a target amount."));
    assert!(conversation.state().pending.is_some());

    let reply = conversation.receive("$80,000");
    assert!(reply.starts_with("Added goal: Send 2 kids to college by 2035 $80,000"));
    let goal = &conversation.state().goals[0];
    assert_eq!(goal.target_amount, Some(80_000.0));
    assert_eq!(goal.target_date, NaiveDate::from_ymd_opt(2035, 1, 15));
}

#[test]
fn reply_that_fills_nothing_keeps_the_original_text() {
    let harness = Harness::new();
    let mut conversation = harness.in_goal_setting();
    let first = conversation.receive("Buy a car");

    let reply = conversation.receive("hmm not sure");
    assert_eq!(reply, first);
    let pending = conversation.state().pending.as_ref().expect("pending");
    assert_eq!(pending.text, "Buy a car");
}

#[test]
fn pending_goal_takes_precedence_over_commands() {
    let harness = Harness::new();
    let mut conversation = harness.with_goals(1);
    let first = conversation.receive("Buy a car");

    assert_eq!(conversation.receive("done"), first);
    assert_eq!(conversation.state().step, Step::GoalSetting);
    assert!(harness.sink.records.borrow().is_empty());

    assert_eq!(conversation.receive("ok"), first);
    assert!(conversation.state().pending.is_some());

    conversation.receive("$15,000");
    conversation.receive("in 2 years");
    assert_eq!(conversation.state().goals.len(), 2);

    let reply = conversation.receive("done");
    assert!(reply.starts_with("Summary"));
}

#[test]
fn goal_with_only_bound_errors_is_not_pending() {
    let harness = Harness::new();
    let mut conversation = harness.in_goal_setting();

    let reply = conversation.receive("Save $50 for a gift by 2026");
    assert!(reply.starts_with("Your goal 'Save $50 for a gift by 2026' has some issues:"));
    assert!(reply.contains("Target amount $50.00 is not reasonable"));
    assert!(conversation.state().pending.is_none());
    assert!(conversation.state().goals.is_empty());
}

#[test]
fn repair_that_ends_in_bound_errors_clears_pending() {
    let harness = Harness::new();
    let mut conversation = harness.in_goal_setting();
    conversation.receive("Buy a boat by 2027");

    let reply = conversation.receive("$20");
    assert!(reply.contains("has some issues"));
    assert!(conversation.state().pending.is_none());
    assert!(conversation.state().goals.is_empty());
}

#[test]
fn complete_goal_is_accepted_immediately() {
    let harness = Harness::new();
    let mut conversation = harness.in_goal_setting();

    let reply = conversation.receive("Save $20,000 for a house deposit by June 2028");
    assert!(reply.starts_with("Added goal: Save $20,000 for a house deposit by June 2028"));
    let goal = &conversation.state().goals[0];
    assert_eq!(goal.target_date, NaiveDate::from_ymd_opt(2028, 6, 1));
    assert!(conversation.state().pending.is_none());
}

#[test]
fn restart_abandons_a_pending_goal() {
    let harness = Harness::new();
    let mut conversation = harness.in_goal_setting();
    conversation.receive("Buy a car");

    conversation.receive("start over");
    let state = conversation.state();
    assert_eq!(state.step, Step::Assessment);
    assert!(state.pending.is_none());
    assert!(state.suggestions.is_empty());
}
