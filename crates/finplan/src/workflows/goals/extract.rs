use std::sync::LazyLock;

use chrono::{Datelike, Months, NaiveDate};
use regex::{Captures, Regex};

use crate::workflows::assessment::numbers::parse_number_words;

const NUMBER_WORD: &str = "zero|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|\
thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty|thirty|forty|fifty|sixty|\
seventy|eighty|ninety|hundred";

const FIGURE: &str = r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?";

static CURRENCY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\$\s?({FIGURE})(?:\s*(thousand|million|billion|k|m|b)\b)?"
    ))
    .expect("currency prefix pattern compiles")
});
static CURRENCY_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({FIGURE})\s*(?:dollars?|usd)\b"))
        .expect("currency word pattern compiles")
});
static CURRENCY_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b({FIGURE})\s*\$")).expect("currency suffix pattern compiles")
});
static DIGIT_MAGNITUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*(thousand|million|billion|k|m|b)\b")
        .expect("digit magnitude pattern compiles")
});
static WORD_MAGNITUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b((?:{NUMBER_WORD})(?:[\s-]+(?:{NUMBER_WORD}|and))*)\s+(thousand|million|billion|k)\b"
    ))
    .expect("word magnitude pattern compiles")
});
static BARE_FIGURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FIGURE).expect("bare figure pattern compiles"));

static MONTH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\.?(?:\s+(\d{1,2})(?:st|nd|rd|th)?,?)?\s+(\d{4})\b",
    )
    .expect("month date pattern compiles")
});
static SLASH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("slash date pattern compiles")
});
static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("iso date pattern compiles")
});
static RELATIVE_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:in|within)\s+(\d+|an?|(?:{NUMBER_WORD})(?:[\s-]+(?:{NUMBER_WORD}))*)\s+(years?|months?)\b"
    ))
    .expect("relative span pattern compiles")
});
static NEXT_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnext\s+year\b").expect("next year pattern compiles"));
static BY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:by|in|before|until)\s+(\d{4})\b").expect("by year pattern compiles")
});

const TIME_UNITS: [&str; 12] = [
    "year", "years", "yr", "yrs", "month", "months", "mo", "mos", "week", "weeks", "day", "days",
];
const TIME_PREPOSITIONS: [&str; 7] = ["in", "by", "within", "before", "until", "at", "age"];
/// Words that may follow a bare figure read as an amount. Any other word
/// makes it a count, as in "2 kids".
const AMOUNT_FOLLOWERS: [&str; 10] = [
    "for", "by", "in", "to", "toward", "towards", "before", "until", "within", "on",
];

fn figure(text: &str) -> Option<f64> {
    text.replace(',', "").parse().ok()
}

fn magnitude(word: Option<regex::Match<'_>>) -> f64 {
    match word.map(|m| m.as_str().to_lowercase()).as_deref() {
        Some("thousand") | Some("k") => 1_000.0,
        Some("million") | Some("m") => 1_000_000.0,
        Some("billion") | Some("b") => 1_000_000_000.0,
        _ => 1.0,
    }
}

fn scaled(captures: &Captures<'_>) -> Option<f64> {
    let base = figure(captures.get(1)?.as_str())?;
    Some(base * magnitude(captures.get(2)))
}

/// Target amount in dollars. Currency-marked figures win over magnitude words,
/// which win over a bare figure that does not read as a year, duration or date.
pub(crate) fn extract_amount(text: &str) -> Option<f64> {
    for pattern in [&*CURRENCY_PREFIX, &*CURRENCY_WORD, &*CURRENCY_SUFFIX, &*DIGIT_MAGNITUDE] {
        if let Some(amount) = pattern.captures(text).and_then(|caps| scaled(&caps)) {
            return Some(amount);
        }
    }

    if let Some(caps) = WORD_MAGNITUDE.captures(text) {
        let words = caps.get(1)?.as_str();
        if let Some(base) = parse_number_words(words) {
            return Some(base as f64 * magnitude(caps.get(2)));
        }
    }

    BARE_FIGURE
        .find_iter(text)
        .filter(|found| !reads_as_time(text, found.start(), found.end()))
        .filter(|found| ends_amount_phrase(&text[found.end()..]))
        .find_map(|found| figure(found.as_str()))
}

fn ends_amount_phrase(after: &str) -> bool {
    let next_word = after
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_lowercase();
    next_word.is_empty() || AMOUNT_FOLLOWERS.contains(&next_word.as_str())
}

fn reads_as_time(text: &str, start: usize, end: usize) -> bool {
    let raw = &text[start..end];
    let before = &text[..start];
    let after = &text[end..];

    if before.ends_with(['/', '-', ':']) || after.starts_with(['/', '-', ':', '%']) {
        return true;
    }
    if after.starts_with(|c: char| c.is_ascii_alphabetic()) {
        // ordinals such as "15th"
        return true;
    }
    if !raw.contains([',', '.']) {
        if let Ok(year) = raw.parse::<u32>() {
            if (1900..=2100).contains(&year) {
                return true;
            }
        }
    }

    let after = after.trim_start();
    if after.starts_with('%') {
        return true;
    }
    let next_word: String = after
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_lowercase();
    if TIME_UNITS.contains(&next_word.as_str()) {
        return true;
    }

    let previous_word = before
        .trim_end()
        .rsplit(|c: char| !c.is_ascii_alphabetic())
        .next()
        .unwrap_or_default()
        .to_lowercase();
    TIME_PREPOSITIONS.contains(&previous_word.as_str())
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.get(..3)?.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn number(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

fn absolute_date(text: &str) -> Option<NaiveDate> {
    let by_month = MONTH_DATE.captures_iter(text).find_map(|caps| {
        let month = month_number(caps.get(1)?.as_str())?;
        let day = number(&caps, 2).unwrap_or(1);
        let year = number(&caps, 3)?;
        NaiveDate::from_ymd_opt(year as i32, month, day)
    });
    if by_month.is_some() {
        return by_month;
    }

    let slashed = SLASH_DATE.captures_iter(text).find_map(|caps| {
        NaiveDate::from_ymd_opt(number(&caps, 3)? as i32, number(&caps, 1)?, number(&caps, 2)?)
    });
    if slashed.is_some() {
        return slashed;
    }

    ISO_DATE.captures_iter(text).find_map(|caps| {
        NaiveDate::from_ymd_opt(number(&caps, 1)? as i32, number(&caps, 2)?, number(&caps, 3)?)
    })
}

fn span_length(raw: &str) -> Option<u32> {
    let lowered = raw.to_lowercase();
    if lowered == "a" || lowered == "an" {
        return Some(1);
    }
    if let Ok(value) = lowered.parse() {
        return Some(value);
    }
    parse_number_words(&lowered).and_then(|value| u32::try_from(value).ok())
}

/// Same month and day in `year`; 29 February falls back to the 28th.
fn same_day_in(today: NaiveDate, year: i32) -> Option<NaiveDate> {
    today
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), 28))
}

fn relative_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = RELATIVE_SPAN.captures(text) {
        let length = span_length(caps.get(1)?.as_str())?;
        let unit = caps.get(2)?.as_str().to_lowercase();
        let months = if unit.starts_with("year") {
            length.checked_mul(12)?
        } else {
            length
        };
        return today.checked_add_months(Months::new(months));
    }

    if NEXT_YEAR.is_match(text) {
        return today.checked_add_months(Months::new(12));
    }

    let caps = BY_YEAR.captures(text)?;
    same_day_in(today, number(&caps, 1)? as i32)
}

/// Target date anchored on `today`. Explicit calendar dates win over relative
/// expressions; impossible dates such as 02/30/2026 are skipped.
pub(crate) fn extract_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    absolute_date(text).or_else(|| relative_date(text, today))
}
