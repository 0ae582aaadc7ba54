
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
    let tolerance = conversation
        .state()
        .answers
        .get("loss_tolerance")
        .expect("tolerance stored");
    assert_eq!(tolerance.value, "ok with big swings");
}
