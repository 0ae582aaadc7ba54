//! Per-question scorers. Numeric answers use fixed thresholds; choice answers
//! use an index table with a keyword fallback for free text.

fn whole(value: &str) -> Option<i64> {
    value.trim().parse::<f64>().ok().map(|parsed| parsed as i64)
}

fn decimal(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

pub(crate) fn score_age(value: &str) -> Option<f64> {
    let age = whole(value)?;
    Some(match age {
        a if a < 30 => 85.0,
        a if a < 40 => 70.0,
        a if a < 50 => 55.0,
        a if a < 60 => 40.0,
        _ => 25.0,
    })
}

pub(crate) fn score_horizon(value: &str) -> Option<f64> {
    let years = whole(value)?;
    Some(match years {
        y if y >= 10 => 85.0,
        y if y >= 5 => 65.0,
        y if y >= 2 => 45.0,
        _ => 25.0,
    })
}

pub(crate) fn score_emergency_months(value: &str) -> Option<f64> {
    let months = whole(value)?;
    Some(match months {
        m if m >= 6 => 85.0,
        m if m >= 3 => 70.0,
        m if m >= 1 => 50.0,
        _ => 30.0,
    })
}

pub(crate) fn score_dependents(value: &str) -> Option<f64> {
    let count = whole(value)?;
    Some(match count {
        0 => 85.0,
        n if n <= 2 => 70.0,
        n if n <= 4 => 50.0,
        _ => 35.0,
    })
}

pub(crate) fn score_savings_rate(value: &str) -> Option<f64> {
    let rate = decimal(value)?;
    Some(if rate >= 20.0 {
        85.0
    } else if rate >= 10.0 {
        65.0
    } else if rate >= 5.0 {
        50.0
    } else {
        35.0
    })
}

/// Index in `choice_<n>` form, 1-based.
fn choice_index(value: &str) -> Option<usize> {
    value.strip_prefix("choice_")?.parse().ok()
}

fn score_choice(value: &str, table: [f64; 4], fallback: fn(&str) -> f64) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(index) = choice_index(trimmed) {
        if let Some(points) = index.checked_sub(1).and_then(|i| table.get(i)) {
            return Some(*points);
        }
    }
    Some(fallback(&trimmed.to_lowercase()))
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

pub(crate) fn score_income_stability(value: &str) -> Option<f64> {
    score_choice(value, [30.0, 50.0, 70.0, 85.0], |text| {
        if contains_any(text, &["unstable", "irregular"]) {
            35.0
        } else if contains_any(text, &["stable", "secure"]) {
            75.0
        } else {
            55.0
        }
    })
}

pub(crate) fn score_experience(value: &str) -> Option<f64> {
    score_choice(value, [25.0, 45.0, 65.0, 85.0], |text| {
        if contains_any(text, &["beginner", "new"]) {
            30.0
        } else if contains_any(text, &["intermediate", "some"]) {
            55.0
        } else if contains_any(text, &["advanced", "expert"]) {
            80.0
        } else {
            50.0
        }
    })
}

pub(crate) fn score_loss_tolerance(value: &str) -> Option<f64> {
    score_choice(value, [20.0, 40.0, 70.0, 90.0], |text| {
        if contains_any(text, &["no loss", "avoid loss", "can't lose"]) {
            20.0
        } else if contains_any(text, &["some loss", "moderate", "dips"]) {
            50.0
        } else if contains_any(
            text,
            &["high risk", "aggressive", "volatility ok", "big swings"],
        ) {
            85.0
        } else {
            50.0
        }
    })
}

pub(crate) fn score_debt_load(value: &str) -> Option<f64> {
    score_choice(value, [85.0, 65.0, 45.0, 30.0], |text| {
        if contains_any(text, &["no debt", "debt-free"]) {
            85.0
        } else if text.contains("low") {
            65.0
        } else if text.contains("moderate") {
            45.0
        } else if text.contains("high") {
            30.0
        } else {
            50.0
        }
    })
}

pub(crate) fn score_liquidity_need(value: &str) -> Option<f64> {
    score_choice(value, [30.0, 65.0, 85.0, 50.0], |text| {
        if contains_any(text, &[">3", "more than 3", "no liquidity need"]) {
            85.0
        } else if contains_any(text, &["1-3", "1–3", "within 3"]) {
            65.0
        } else if contains_any(text, &["<1", "less than 1", "soon"]) {
            30.0
        } else {
            50.0
        }
    })
}

pub(crate) fn score_reaction_scenario(value: &str) -> Option<f64> {
    score_choice(value, [25.0, 45.0, 70.0, 90.0], |text| {
        if text.contains("sell") {
            30.0
        } else if text.contains("buy") {
            85.0
        } else if contains_any(text, &["hold", "stay"]) {
            70.0
        } else {
            50.0
        }
    })
}

pub(crate) fn score_objective(value: &str) -> Option<f64> {
    score_choice(value, [35.0, 55.0, 70.0, 85.0], |text| {
        let growth = text.contains("growth");
        let income = text.contains("income");
        if contains_any(text, &["preserve", "capital preservation"]) {
            35.0
        } else if growth && income {
            70.0
        } else if income {
            55.0
        } else if growth || text.contains("aggressive") {
            85.0
        } else {
            55.0
        }
    })
}
