use std::sync::LazyLock;

use regex::Regex;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+").expect("integer pattern compiles"));
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("decimal pattern compiles"));

fn word_value(word: &str) -> Option<i64> {
    let value = match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    };
    Some(value)
}

/// Evaluate the first run of English number words, e.g. "twenty eight",
/// "twenty-eight", "one hundred and five".
pub(crate) fn parse_number_words(text: &str) -> Option<i64> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| c.is_whitespace() || c == '-')
        .map(|token| token.trim_matches(|c: char| !c.is_ascii_alphabetic()))
        .filter(|token| !token.is_empty())
        .collect();

    let mut current: Option<i64> = None;
    let mut total = 0i64;
    let mut seen = false;

    for token in tokens {
        if let Some(value) = word_value(token) {
            current = Some(current.unwrap_or(0) + value);
            seen = true;
        } else if token == "hundred" {
            current = Some(current.unwrap_or(1) * 100);
            seen = true;
        } else if token == "thousand" {
            total += current.unwrap_or(1) * 1000;
            current = Some(0);
            seen = true;
        } else if token == "and" && seen {
            continue;
        } else if seen {
            break;
        }
    }

    seen.then(|| total + current.unwrap_or(0))
}

/// First integer in the text, digits first, then number words. Digit runs
/// too long for `i64` saturate.
pub(crate) fn extract_integer(text: &str) -> Option<i64> {
    if let Some(found) = INTEGER.find(text) {
        let digits = found.as_str();
        let saturated = if digits.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        };
        return Some(digits.parse().unwrap_or(saturated));
    }
    parse_number_words(text)
}

/// First decimal in the text, digits first, then number words.
pub(crate) fn extract_decimal(text: &str) -> Option<f64> {
    if let Some(found) = DECIMAL.find(text) {
        return found.as_str().parse().ok();
    }
    parse_number_words(text).map(|value| value as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound_number_words() {
        assert_eq!(parse_number_words("twenty eight"), Some(28));
        assert_eq!(parse_number_words("Twenty-Eight"), Some(28));
        assert_eq!(parse_number_words("I am thirty five years old"), Some(35));
        assert_eq!(parse_number_words("fifteen"), Some(15));
        assert_eq!(parse_number_words("one hundred and five"), Some(105));
        assert_eq!(parse_number_words("zero"), Some(0));
        assert_eq!(parse_number_words("plenty"), None);
    }

    #[test]
    fn digits_take_precedence_over_words() {
        assert_eq!(extract_integer("I'm 34, not thirty"), Some(34));
        assert_eq!(extract_integer("-5"), Some(-5));
        assert_eq!(extract_integer("about seven"), Some(7));
        assert_eq!(extract_integer("dunno"), None);
        assert_eq!(extract_integer("99999999999999999999"), Some(i64::MAX));
        assert_eq!(extract_integer("-99999999999999999999"), Some(i64::MIN));
        assert_eq!(extract_decimal("12.5%"), Some(12.5));
        assert_eq!(extract_decimal("ten percent"), Some(10.0));
    }
}
