//! Priority calculator: weighted combination of factor sub-scores, plus the
//! human-readable reasons shown next to each score.

use chrono::NaiveDate;

use crate::factors::{self, UrgencyScale};
use crate::strategy::Weights;
use crate::task::{FactorBreakdown, Task};

pub const FALLBACK_REASON: &str = "Balanced task with no extreme factors";
pub const CYCLE_REASON: &str = "Part of a circular dependency chain";

/// Result of scoring one task.
#[derive(Debug, Clone, PartialEq)]
pub struct Priority {
    pub score: f64,
    pub breakdown: FactorBreakdown,
    pub reasons: Vec<String>,
}

/// Score one sanitized task under `weights`.
///
/// `in_cycle` adds the circular-dependency reason; it does not change the
/// score.
pub fn calculate_priority(
    task: &Task,
    weights: &Weights,
    today: NaiveDate,
    scale: &UrgencyScale,
    in_cycle: bool,
) -> Priority {
    let breakdown = factors::breakdown(task, today, scale);
    let score = combine(&breakdown, weights);

    let mut reasons = reasons(task, today);
    if in_cycle {
        reasons.push(CYCLE_REASON.to_string());
    }
    if reasons.is_empty() {
        reasons.push(FALLBACK_REASON.to_string());
    }

    Priority {
        score,
        breakdown,
        reasons,
    }
}

/// Weighted sum rounded to two decimals. Not clamped: weights that do not
/// sum to one can push the result outside [0, 10].
pub fn combine(b: &FactorBreakdown, w: &Weights) -> f64 {
    let raw = b.urgency * w.urgency
        + b.importance * w.importance
        + b.effort * w.effort
        + b.dependencies * w.dependencies;
    round2(raw)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Reasons in factor order: urgency, importance, effort, dependencies.
pub fn reasons(task: &Task, today: NaiveDate) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(due) = task.due_date {
        match factors::days_left(due, today) {
            d if d < 0 => out.push(format!("Overdue by {}", plural(-d, "day"))),
            0 => out.push("Due today".to_string()),
            1 => out.push("Due tomorrow".to_string()),
            d @ 2..=3 => out.push(format!("Due in {d} days")),
            4..=7 => out.push("Due within a week".to_string()),
            _ => {}
        }
    }

    match task.importance {
        9..=10 => out.push(format!("Critical importance ({}/10)", task.importance)),
        7..=8 => out.push(format!("High importance ({}/10)", task.importance)),
        1..=3 => out.push(format!("Low importance ({}/10)", task.importance)),
        _ => {}
    }

    let hours = task.estimated_hours;
    if hours <= 1.0 {
        out.push("Quick win (1h or less)".to_string());
    } else if hours <= 3.0 {
        out.push(format!("Short task ({})", format_hours(hours)));
    } else if hours > 12.0 {
        out.push(format!("Large effort ({})", format_hours(hours)));
    }

    match task.dependency_count() {
        0 => {}
        n @ 1..=2 => out.push(format!("Depends on {}", plural(n as i64, "task"))),
        n => out.push(format!("Heavy dependencies: waits on {n} tasks")),
    }

    out
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

fn format_hours(h: f64) -> String {
    if h.fract() == 0.0 {
        format!("{}h", h as i64)
    } else {
        format!("{h:.1}h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{StrategyKind, StrategyTable};
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 21).unwrap()
    }

    fn task(title: &str) -> Task {
        Task {
            title: title.to_string(),
            due_date: None,
            estimated_hours: 5.0,
            importance: 5,
            dependencies: vec![],
        }
    }

    fn smart() -> Weights {
        StrategyTable::standard().get(StrategyKind::SmartBalance).weights
    }

    #[test]
    fn test_fix_bug_example() {
        let t = Task {
            due_date: Some(today()),
            estimated_hours: 2.0,
            importance: 10,
            ..task("Fix bug")
        };

        let p = calculate_priority(&t, &smart(), today(), &UrgencyScale::default(), false);

        assert_eq!(p.breakdown.urgency, 10.0);
        assert_eq!(p.breakdown.importance, 10.0);
        assert_eq!(p.breakdown.effort, 8.0);
        assert_eq!(p.breakdown.dependencies, 0.0);
        assert_eq!(p.score, 8.2);
        assert_eq!(p.reasons[0], "Due today");
        assert_eq!(p.reasons[1], "Critical importance (10/10)");
    }

    #[test]
    fn test_reason_order() {
        let t = Task {
            due_date: Some(today() - Duration::days(3)),
            estimated_hours: 20.0,
            importance: 2,
            dependencies: vec!["a".into(), "b".into(), "c".into()],
            ..task("Big")
        };

        let r = reasons(&t, today());
        assert_eq!(
            r,
            vec![
                "Overdue by 3 days",
                "Low importance (2/10)",
                "Large effort (20h)",
                "Heavy dependencies: waits on 3 tasks",
            ]
        );
    }

    #[test]
    fn test_fallback_reason_when_nothing_stands_out() {
        let t = Task {
            due_date: Some(today() + Duration::days(20)),
            ..task("Plain")
        };
        let p = calculate_priority(&t, &smart(), today(), &UrgencyScale::default(), false);
        assert_eq!(p.reasons, vec![FALLBACK_REASON]);
    }

    #[test]
    fn test_cycle_reason_replaces_fallback() {
        let scale = UrgencyScale::default();
        let p = calculate_priority(&task("Loop"), &smart(), today(), &scale, true);
        assert_eq!(p.reasons, vec![CYCLE_REASON]);
    }

    #[test]
    fn test_cycle_reason_comes_last() {
        let t = Task {
            importance: 9,
            dependencies: vec!["x".into()],
            ..task("Loop")
        };
        let p = calculate_priority(&t, &smart(), today(), &UrgencyScale::default(), true);
        assert_eq!(p.reasons.last().map(String::as_str), Some(CYCLE_REASON));
        assert_eq!(p.reasons[p.reasons.len() - 2], "Depends on 1 task");
    }

    #[test]
    fn test_unnormalized_weights_not_clamped() {
        let t = Task {
            due_date: Some(today()),
            estimated_hours: 0.5,
            importance: 10,
            ..task("Hot")
        };
        let w = Weights::new(1.0, 1.0, 1.0, 1.0);
        let p = calculate_priority(&t, &w, today(), &UrgencyScale::default(), false);
        assert_eq!(p.score, 30.0);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        let b = FactorBreakdown {
            urgency: 1.0,
            importance: 1.0,
            effort: 1.0,
            dependencies: 1.0,
        };
        assert_eq!(combine(&b, &Weights::new(0.333, 0.333, 0.333, 0.0)), 1.0);
        assert_eq!(combine(&b, &Weights::new(0.1234, 0.0, 0.0, 0.0)), 0.12);
    }

    #[test]
    fn test_short_task_formats_fraction() {
        let t = Task {
            estimated_hours: 2.5,
            ..task("Half")
        };
        assert!(reasons(&t, today()).contains(&"Short task (2.5h)".to_string()));
    }
}
