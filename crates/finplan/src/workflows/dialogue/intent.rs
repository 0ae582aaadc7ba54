//! Stateless predicates over a raw utterance. The engine applies them in a
//! fixed precedence order; nothing here looks at session state.

use std::sync::LazyLock;

use regex::Regex;

/// Session-level reset keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reset {
    Restart,
    /// Re-issue the last failed utterance, or restart when there is none.
    Retry,
}

/// Goal-setting command, in the order the engine checks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalCommand {
    Done,
    /// Goal number to explain; `None` when the user did not give one.
    Explain(Option<usize>),
    /// Goal numbers to delete; empty when the user did not give any.
    Delete(Vec<usize>),
    MoreSuggestions,
    ShowOptions,
    Decline,
    /// 1-based positions in the cumulative suggestion pool.
    Select(Vec<usize>),
    Text,
}

const CONTINUATION_PHRASES: [&str; 17] = [
    "yes",
    "ok",
    "okay",
    "continue",
    "proceed",
    "go on",
    "next",
    "let's continue",
    "please continue",
    "what are the options",
    "show me the options",
    "what are my choices",
    "i understand",
    "got it",
    "clear",
    "now i know",
    "i see",
];

const QUESTION_STARTERS: [&str; 17] = [
    "what is",
    "what's",
    "what does",
    "explain",
    "how do",
    "how does",
    "how much",
    "why",
    "when",
    "where",
    "which",
    "define",
    "difference between",
    "tell me about",
    "meaning of",
    "clarify",
    "can you explain",
];

const MORE_SUGGESTION_PHRASES: [&str; 24] = [
    "more suggestions",
    "more goals",
    "more options",
    "more ideas",
    "need more",
    "additional options",
    "additional suggestions",
    "additional goals",
    "other suggestions",
    "different suggestions",
    "new suggestions",
    "another set",
    "show more",
    "give me more",
    "more please",
    "suggest more",
    "any other",
    "what else",
    "other ideas",
    "different goals",
    "new goals",
    "more choices",
    "other options",
    "different options",
];

const SHOW_OPTION_PHRASES: [&str; 7] = [
    "yes",
    "y",
    "suggest",
    "options",
    "suggestions",
    "show options",
    "show suggestions",
];

const DECLINE_PHRASES: [&str; 2] = ["no", "n"];

/// Words allowed after a done phrase, as in "done for now, thanks".
const DONE_TAILS: [&str; 21] = [
    "for", "now", "today", "thanks", "thank", "you", "please", "with", "the", "my", "goals",
    "goal", "suggestions", "here", "setting", "adding", "i", "think", "that's", "it", "all",
];

const CONTINUATION_TAILS: [&str; 3] = ["thanks", "thank you", "please"];

const DELETION_FILLERS: [&str; 6] = ["goal", "goals", "number", "numbers", "no", "and"];

static DONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:i'?m|i am|we'?re|ok(?:ay)?|so|well|yes)[\s,]+)?(?:all\s+)?(?:done|finish|finished|end|that'?s it|all set|no more|stop|quit|exit|that'?s all|enough|no further goals)\b(.*)$",
    )
    .expect("done pattern compiles")
});
static SELECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:(?:\s*[,&]\s*|\s+)(?:and\s+)?\d+)*$").expect("selection pattern compiles")
});
static EXPLAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:please\s+)?(?:explain|elaborate(?:\s+on)?|describe|details?\s+(?:on|for|of)|tell\s+me\s+(?:more\s+)?about|break\s+down|more\s+info(?:\s+on)?)\b(.*)$",
    )
    .expect("explain pattern compiles")
});
static EXPLAIN_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:goal\s*)?(?:(?:number|no\.?)\s*)?#?\s*(\d+)$")
        .expect("explain target pattern compiles")
});
static DELETE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:please\s+)?(?:delete|remove|drop|unselect|cancel)\b(.*)$")
        .expect("delete pattern compiles")
});

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// `phrase` at the start of `text`, ending on a word boundary.
fn starts_with_phrase(text: &str, phrase: &str) -> bool {
    text.strip_prefix(phrase)
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric()))
}

fn trim_punctuation(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
}

pub fn reset_keyword(text: &str) -> Option<Reset> {
    match trim_punctuation(&normalize(text)) {
        "restart" | "start over" => Some(Reset::Restart),
        "retry" => Some(Reset::Retry),
        _ => None,
    }
}

/// Strips `phrase` from the front of `text` when it ends on a word boundary.
fn strip_phrase<'t>(text: &'t str, phrase: &str) -> Option<&'t str> {
    text.strip_prefix(phrase)
        .filter(|rest| !rest.starts_with(|c: char| c.is_alphanumeric()))
}

/// Nothing left but punctuation, courtesy words or further continuations.
fn continuation_tail(rest: &str) -> bool {
    let rest = trim_punctuation(rest);
    rest.is_empty()
        || CONTINUATION_PHRASES
            .iter()
            .chain(CONTINUATION_TAILS.iter())
            .any(|phrase| strip_phrase(rest, phrase).is_some_and(continuation_tail))
}

/// "ok", "got it", "continue" and friends, as the whole utterance. Anything
/// carrying a digit is an answer, not a continuation.
pub fn is_continuation(text: &str) -> bool {
    let t = normalize(text);
    if t.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    let t = trim_punctuation(&t);
    CONTINUATION_PHRASES
        .iter()
        .any(|phrase| strip_phrase(t, phrase).is_some_and(continuation_tail))
}

pub fn is_question(text: &str) -> bool {
    let t = normalize(text);
    if t.is_empty() {
        return false;
    }
    t.contains('?')
        || QUESTION_STARTERS
            .iter()
            .any(|starter| starts_with_phrase(&t, starter))
}

/// A done phrase leading the utterance, followed by filler at most.
pub fn is_done_phrase(text: &str) -> bool {
    let t = trim_punctuation(&normalize(text)).to_string();
    let words = t.split_whitespace().count();
    if words == 0 || words > 6 || t.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    let Some(rest) = DONE.captures(&t).and_then(|caps| caps.get(1)) else {
        return false;
    };
    rest.as_str()
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|word| !word.is_empty())
        .all(|word| DONE_TAILS.contains(&word))
}

/// `Some(None)` for an explanation request without a goal number.
pub fn parse_explanation(text: &str) -> Option<Option<usize>> {
    let t = trim_punctuation(&normalize(text)).to_string();
    let rest = EXPLAIN.captures(&t)?.get(1)?.as_str().trim();
    if rest.is_empty() {
        return Some(None);
    }
    let number = EXPLAIN_TARGET.captures(rest)?.get(1)?.as_str().parse().ok()?;
    Some(Some(number))
}

/// Goal numbers of a deletion command; `None` when the utterance is not one.
pub fn parse_deletion(text: &str) -> Option<Vec<usize>> {
    let t = trim_punctuation(&normalize(text)).to_string();
    let rest = DELETE.captures(&t)?.get(1)?.as_str().to_string();
    let mut numbers = Vec::new();
    for token in rest
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '&' | '#' | '.'))
        .filter(|token| !token.is_empty())
    {
        if let Ok(number) = token.parse::<usize>() {
            numbers.push(number);
        } else if !DELETION_FILLERS.contains(&token) {
            return None;
        }
    }
    Some(numbers)
}

/// Suggestion numbers when the whole utterance is a numeric pick such as
/// "3", "1,4" or "2 and 7".
pub fn parse_selection(text: &str) -> Option<Vec<usize>> {
    let t = normalize(text);
    if !SELECTION.is_match(&t) {
        return None;
    }
    t.split(|c: char| !c.is_ascii_digit())
        .filter(|token| !token.is_empty())
        .map(|token| token.parse().ok())
        .collect()
}

pub fn classify_goal_command(text: &str) -> GoalCommand {
    if is_done_phrase(text) {
        return GoalCommand::Done;
    }
    if let Some(target) = parse_explanation(text) {
        return GoalCommand::Explain(target);
    }
    if let Some(numbers) = parse_deletion(text) {
        return GoalCommand::Delete(numbers);
    }

    let t = normalize(text);
    if MORE_SUGGESTION_PHRASES
        .iter()
        .any(|phrase| t.contains(phrase))
    {
        return GoalCommand::MoreSuggestions;
    }
    let bare = trim_punctuation(&t);
    if SHOW_OPTION_PHRASES.contains(&bare) {
        return GoalCommand::ShowOptions;
    }
    if DECLINE_PHRASES.contains(&bare) {
        return GoalCommand::Decline;
    }
    if let Some(numbers) = parse_selection(text) {
        return GoalCommand::Select(numbers);
    }
    GoalCommand::Text
}
