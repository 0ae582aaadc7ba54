
#[test]
fn goal_text_containing_a_done_word_is_kept_as_a_goal() {
    let harness = Harness::new();
    let mut conversation = harness.in_goal_setting();

    let reply = conversation.receive("Save enough for a house with $50,000 by 2030");
    assert!(reply.starts_with("Added goal: Save enough for a house"));
    assert_eq!(conversation.state().step, Step::GoalSetting);
    assert!(harness.sink.records.borrow().is_empty());
}
