//! Response text. Plain text only; numbering always follows the selected-goal
//! order or the cumulative suggestion pool.

use crate::workflows::assessment::{Question, RiskAssessment};
use crate::workflows::goals::SelectedGoal;

use super::record::RiskProfile;
use super::state::SuggestionPool;

pub const CAPABILITY_UNAVAILABLE: &str = "The text-generation service is currently unavailable. \
The assessment is paused. Please resend your message, or send 'retry', once it is back.";

pub const RECORD_UNAVAILABLE: &str = "Your results could not be saved right now. \
The session is paused. Please send 'retry' to finish again.";

pub const SESSION_COMPLETE: &str = "All done! Type 'restart' to do another assessment.";

pub const ADD_GOAL_FIRST: &str = "You haven't selected any goals yet. Add a goal first \
(type it in your own words or pick a suggestion number), or type 'restart' to begin again.";

pub const NOT_A_GOAL: &str = "I didn't catch a valid financial goal. Choose by number(s), \
type a clear goal, or type 'more suggestions' for additional options. You can also type a \
done phrase to finish.";

pub const DECLINED: &str =
    "Okay, please type your goal in your own words, or type 'suggest' to see ideas.";

pub const EXPLAIN_WHICH: &str =
    "Please specify which goal to explain by number (e.g., 'explain goal 1' or 'elaborate on 3').";

pub const DELETE_WHICH: &str =
    "Please specify which goal(s) to delete by number (e.g., 'delete 1' or 'remove 1,3').";

pub const NO_GOALS_YET: &str = "No goals selected yet.";

pub fn answer_rejected(question: &Question, message: &str) -> String {
    if question.choices.is_empty() {
        return format!(
            "{message}\n\nTry again: {}\n(You can also type numbers as words like 'twenty eight' or ask for clarification.)",
            question.prompt
        );
    }
    let options = question
        .choices
        .iter()
        .enumerate()
        .map(|(index, choice)| format!("{}) {choice}", index + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{message}\n\nOptions:\n{options}\n(Or type a clear alternative in your own words.)\n\
         If you need clarification about any term, just ask!"
    )
}

pub fn clarification(answer: &str, in_assessment: bool) -> String {
    let invitation = if in_assessment {
        "(You can now continue with your assessment. Type 'continue' or just answer the question.)"
    } else {
        "(You can now continue setting your goals.)"
    };
    format!("{answer}\n\n{invitation}")
}

pub fn risk_result(risk: &RiskAssessment) -> String {
    format!(
        "Risk Profile Assessment Complete!\nYour risk score: {}% ({})\n{}",
        risk.score,
        risk.label(),
        risk.description()
    )
}

fn numbered<'a>(entries: impl Iterator<Item = (usize, &'a str)>) -> String {
    entries
        .map(|(number, text)| format!("{number}) {text}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn goal_intro(risk: &RiskAssessment, pool: &SuggestionPool) -> String {
    format!(
        "Goal Setting\n\
         Do you have a specific goal in mind, or would you like suggestions based on your profile?\n\
         - Type your goal (free text), OR\n\
         - Type numbers to pick from the suggestions below (e.g., 1,3), OR\n\
         - Type 'more suggestions' to get additional options, OR\n\
         - Type 'explain goal 1' or 'elaborate on 3' to get more details, OR\n\
         - Type 'delete 1,3' or 'remove 2' to delete selected goals, OR\n\
         - Type any 'done' phrase when finished (e.g., done / finished / I'm done).\n\n\
         Suggested goals for {}:\n{}",
        risk.label(),
        numbered(pool.current_page())
    )
}

pub fn more_suggestions(pool: &SuggestionPool) -> String {
    format!(
        "Here are more goal suggestions (page {}):\n\n{}\n\n\
         Choose by number(s), add your own goal, type 'delete X' to remove goals, or type 'more suggestions' for additional options.",
        pool.pages(),
        numbered(pool.current_page())
    )
}

pub fn current_suggestions(pool: &SuggestionPool) -> String {
    format!(
        "Current goal suggestions (page {}):\n\n{}\n\n\
         Choose by number(s), add your own goal, or type 'more suggestions' for additional options.",
        pool.pages(),
        numbered(pool.current_page())
    )
}

pub fn selected_goals(goals: &[SelectedGoal]) -> String {
    if goals.is_empty() {
        return NO_GOALS_YET.to_string();
    }
    numbered(
        goals
            .iter()
            .enumerate()
            .map(|(index, goal)| (index + 1, goal.text.as_str())),
    )
}

pub fn goals_added(added: &[String], goals: &[SelectedGoal]) -> String {
    let heading = if added.len() == 1 { "Added goal" } else { "Added goals" };
    format!(
        "{heading}: {}\n\nYour current goals:\n{}\n\nAdd more goals, type numbers, or any done phrase to finish.",
        added.join(", "),
        selected_goals(goals)
    )
}

pub fn nothing_added() -> String {
    "None of those suggestions were added (already selected or not a financial goal). \
     Choose other numbers or type your own goal."
        .to_string()
}

pub fn already_selected(text: &str) -> String {
    format!(
        "'{text}' is already one of your goals. Add a different goal, type numbers, or any done phrase to finish."
    )
}

pub fn suggestion_out_of_range(number: usize, pool: &SuggestionPool) -> String {
    format!(
        "Goal #{number} is not available. Choose from 1-{} or type 'more suggestions' for additional goals.",
        pool.len()
    )
}

pub fn goal_out_of_range(number: usize, goals: &[SelectedGoal]) -> String {
    format!(
        "Goal #{number} is not available. You have {count} goals. Use numbers 1-{count}.",
        count = goals.len()
    )
}

pub fn explanation(number: usize, goal: &str, explanation: &str, goals: &[SelectedGoal]) -> String {
    format!(
        "Goal #{number}: {goal}\n\nExplanation:\n{explanation}\n\nYour current goals:\n{}\n\n\
         Continue selecting goals, type 'delete X' to remove goals, or type 'done' when finished.",
        selected_goals(goals)
    )
}

pub fn deleted(removed: &[String], goals: &[SelectedGoal]) -> String {
    let list = removed
        .iter()
        .enumerate()
        .map(|(index, text)| format!("{}) {text}", index + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Deleted goal(s):\n{list}\n\nYour current goals:\n{}\n\n\
         Continue selecting goals, type 'more suggestions' for additional options, or type 'done' when finished.",
        selected_goals(goals)
    )
}

pub fn summary(risk: &RiskProfile, goals: &[SelectedGoal], location: &str) -> String {
    let listed = if goals.is_empty() {
        "None".to_string()
    } else {
        goals
            .iter()
            .map(|goal| format!("• {}", goal.text))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "Summary\n- Risk Score: {}% ({})\n- Selected Goals:\n{listed}\n\n\
         Your data has been saved to: {location}\n\
         Thank you! Type 'restart' to run the assessment again.",
        risk.score, risk.label
    )
}
