//! Task model: raw input records, sanitized tasks, and scored output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder title for tasks submitted without one.
pub const UNTITLED: &str = "Untitled Task";

/// Importance assumed when the caller gives none (mid-scale).
pub const DEFAULT_IMPORTANCE: i64 = 5;

/// A task exactly as the caller sent it.
///
/// Every field is kept as an untyped JSON value so that wrong types survive
/// deserialization and can be handled by the sanitizer instead of failing the
/// whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTask {
    pub title: Option<Value>,
    pub due_date: Option<Value>,
    pub estimated_hours: Option<Value>,
    pub importance: Option<Value>,
    pub dependencies: Option<Value>,
}

impl RawTask {
    /// Lift an arbitrary JSON value into a raw task.
    ///
    /// Anything that is not an object becomes an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(Value::String(title.into())),
            ..Self::default()
        }
    }

    pub fn with_due_date(mut self, due: impl Into<String>) -> Self {
        self.due_date = Some(Value::String(due.into()));
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(Value::from(hours));
        self
    }

    pub fn with_importance(mut self, importance: i64) -> Self {
        self.importance = Some(Value::from(importance));
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let deps: Vec<Value> = deps.into_iter().map(|d| Value::String(d.into())).collect();
        self.dependencies = Some(Value::Array(deps));
        self
    }
}

/// A fully well-formed task. Produced only by [`crate::sanitize::sanitize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Non-empty; doubles as the task's identifier in the dependency graph.
    pub title: String,
    pub due_date: Option<NaiveDate>,
    /// Hours, never negative.
    pub estimated_hours: f64,
    /// 1-10.
    pub importance: i64,
    /// Titles (or opaque ids) of the tasks this one needs done first.
    pub dependencies: Vec<String>,
}

impl Task {
    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }
}

/// Per-factor sub-scores, each in [0, 10].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependencies: f64,
}

/// A sanitized task with its final score and the reasons behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: Task,
    pub score: f64,
    pub breakdown: FactorBreakdown,
    pub reasons: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_task_from_object_keeps_wrong_types() {
        let raw = RawTask::from_value(json!({
            "title": 42,
            "estimated_hours": "lots",
            "importance": [1, 2],
        }));
        assert_eq!(raw.title, Some(json!(42)));
        assert_eq!(raw.estimated_hours, Some(json!("lots")));
        assert_eq!(raw.importance, Some(json!([1, 2])));
        assert_eq!(raw.due_date, None);
    }

    #[test]
    fn test_raw_task_from_non_object_is_empty() {
        assert_eq!(RawTask::from_value(json!("just a string")), RawTask::default());
        assert_eq!(RawTask::from_value(json!(null)), RawTask::default());
    }

    #[test]
    fn test_scored_task_serializes_flat() {
        let scored = ScoredTask {
            task: Task {
                title: "Fix bug".to_string(),
                due_date: NaiveDate::from_ymd_opt(2026, 3, 1),
                estimated_hours: 2.0,
                importance: 10,
                dependencies: vec![],
            },
            score: 8.2,
            breakdown: FactorBreakdown {
                urgency: 10.0,
                importance: 10.0,
                effort: 8.0,
                dependencies: 0.0,
            },
            reasons: vec!["Due today".to_string()],
        };

        let v = serde_json::to_value(&scored).unwrap();
        assert_eq!(v["title"], "Fix bug");
        assert_eq!(v["due_date"], "2026-03-01");
        assert_eq!(v["score"], 8.2);
        assert_eq!(v["breakdown"]["effort"], 8.0);
    }
}
