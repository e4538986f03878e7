//! Sanitizer: turns a [`RawTask`] into a well-formed [`Task`].
//!
//! Each field goes through a `parse_*` function that returns the coerced
//! value together with a validity flag. Invalid input is never an error;
//! the default is substituted and the event is logged at debug level.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

use crate::task::{DEFAULT_IMPORTANCE, RawTask, Task, UNTITLED};

/// Importance bounds (inclusive).
pub const IMPORTANCE_MIN: i64 = 1;
pub const IMPORTANCE_MAX: i64 = 10;

/// A coerced field value plus whether the input was usable as-is.
///
/// `valid == false` means a default or clamp was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub valid: bool,
}

impl<T> Parsed<T> {
    fn ok(value: T) -> Self {
        Self { value, valid: true }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            valid: false,
        }
    }
}

/// Sanitize one raw task. Never fails.
pub fn sanitize(raw: &RawTask) -> Task {
    let title = parse_title(raw.title.as_ref());
    let due_date = parse_due_date(raw.due_date.as_ref());
    let hours = parse_hours(raw.estimated_hours.as_ref());
    let importance = parse_importance(raw.importance.as_ref());
    let dependencies = parse_dependencies(raw.dependencies.as_ref());

    for (field, valid) in [
        ("title", title.valid),
        ("due_date", due_date.valid),
        ("estimated_hours", hours.valid),
        ("importance", importance.valid),
        ("dependencies", dependencies.valid),
    ] {
        if !valid {
            tracing::debug!(task = %title.value, field, "substituted default for field");
        }
    }

    Task {
        title: title.value,
        due_date: due_date.value,
        estimated_hours: hours.value,
        importance: importance.value,
        dependencies: dependencies.value,
    }
}

/// Sanitize every task, preserving order.
pub fn sanitize_all(raw: &[RawTask]) -> Vec<Task> {
    raw.iter().map(sanitize).collect()
}

pub fn parse_title(value: Option<&Value>) -> Parsed<String> {
    let text = match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    if text.is_empty() {
        Parsed::fallback(UNTITLED.to_string())
    } else {
        Parsed::ok(text)
    }
}

/// Absent and unparseable dates both sanitize to `None`; only the latter is
/// flagged invalid.
pub fn parse_due_date(value: Option<&Value>) -> Parsed<Option<NaiveDate>> {
    match value {
        None | Some(Value::Null) => Parsed::ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Parsed::ok(None),
        Some(Value::String(s)) => match parse_iso_date(s.trim()) {
            Some(d) => Parsed::ok(Some(d)),
            None => Parsed::fallback(None),
        },
        Some(_) => Parsed::fallback(None),
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date part is kept).
fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

pub fn parse_hours(value: Option<&Value>) -> Parsed<f64> {
    let Some(hours) = value.and_then(as_number) else {
        return Parsed::fallback(0.0);
    };

    if !hours.is_finite() || hours < 0.0 {
        Parsed::fallback(0.0)
    } else {
        Parsed::ok(hours)
    }
}

pub fn parse_importance(value: Option<&Value>) -> Parsed<i64> {
    let Some(raw) = value.and_then(as_number) else {
        return Parsed::fallback(DEFAULT_IMPORTANCE);
    };
    if !raw.is_finite() {
        return Parsed::fallback(DEFAULT_IMPORTANCE);
    }

    let rounded = raw.round();
    let clamped = rounded.clamp(IMPORTANCE_MIN as f64, IMPORTANCE_MAX as f64) as i64;
    if rounded == raw && clamped as f64 == raw {
        Parsed::ok(clamped)
    } else {
        Parsed::fallback(clamped)
    }
}

pub fn parse_dependencies(value: Option<&Value>) -> Parsed<Vec<String>> {
    let items = match value {
        None | Some(Value::Null) => return Parsed::ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Parsed::fallback(Vec::new()),
    };

    let mut valid = true;
    let mut deps = Vec::with_capacity(items.len());
    for item in items {
        let id = match item {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        if id.is_empty() {
            valid = false;
        } else {
            deps.push(id);
        }
    }

    Parsed { value: deps, valid }
}

/// JSON numbers, or strings holding a number (form fields and CSV cells).
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
