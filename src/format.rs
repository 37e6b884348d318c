//! Display formatting helpers shared by table composition and the CLI.

use serde_json::{Map, Value};

/// Format a price for display: two decimals for prices above one unit,
/// eight for sub-unit prices where the extra precision matters.
pub fn format_price(price: f64) -> String {
    if price.abs() >= 1.0 {
        format!("{:.2}", price)
    } else {
        format!("{:.8}", price)
    }
}

/// Format a number with a fixed number of decimal digits.
pub fn format_number(value: f64, digits: usize) -> String {
    format!("{:.*}", digits, value)
}

/// Convert an arbitrary key ("col.date.open", "sum_wins", "SumWins") to
/// camelCase, splitting on separators and lower-to-upper case boundaries.
pub fn camel_case(input: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() && prev_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = ch.is_lowercase() || ch.is_numeric();
            current.push(ch);
        } else {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
            }
        }
    }
    out
}

/// Camel-case the top-level keys of a JSON object. Non-objects are
/// returned unchanged.
pub fn camelize_keys(value: &Value) -> Value {
    match value.as_object() {
        Some(object) => {
            let mut camelized = Map::with_capacity(object.len());
            for (key, item) in object {
                camelized.insert(camel_case(key), item.clone());
            }
            Value::Object(camelized)
        }
        None => value.clone(),
    }
}

/// Humanize the elapsed time since an epoch-millisecond timestamp, in the
/// largest sensible unit ("a few seconds", "5 minutes", "2 days", ...).
pub fn humanize_age(from_ms: i64, now_ms: i64) -> String {
    let seconds = (now_ms - from_ms).max(0) / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = days / 365;

    if seconds < 60 {
        "a few seconds".to_string()
    } else if minutes < 60 {
        if minutes == 1 {
            "a minute".to_string()
        } else {
            format!("{} minutes", minutes)
        }
    } else if hours < 24 {
        if hours == 1 {
            "an hour".to_string()
        } else {
            format!("{} hours", hours)
        }
    } else if days < 30 {
        if days == 1 {
            "a day".to_string()
        } else {
            format!("{} days", days)
        }
    } else if years < 1 {
        if months == 1 {
            "a month".to_string()
        } else {
            format!("{} months", months)
        }
    } else if years == 1 {
        "a year".to_string()
    } else {
        format!("{} years", years)
    }
}
