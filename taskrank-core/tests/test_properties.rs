//! Property-based tests for the scoring engine
//!
//! These tests verify invariants that should hold for all inputs:
//! - Sanitization never fails and always yields a well-formed task
//! - Default-weight scores stay within [0, 10]
//! - Factor scorers are monotone
//! - Analysis is deterministic and sorting is stable

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use serde_json::{Value, json};
use taskrank_core::factors::{UrgencyScale, dependency_score, effort_score, urgency_score};
use taskrank_core::{AnalyzeRequest, Analyzer, RawTask, StrategyKind, sanitize};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 19).unwrap()
}

/// Any JSON scalar or small container, to stand in for a malformed field.
fn any_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        ".{0,12}".prop_map(Value::String),
        Just(json!("2026-03-01")),
    ];
    leaf.prop_recursive(2, 8, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::hash_map("[a-z]{1,4}", inner, 0..3)
                .prop_map(|m| json!(m)),
        ]
    })
}

fn any_raw_task() -> impl Strategy<Value = RawTask> {
    (
        prop::option::of(any_json()),
        prop::option::of(any_json()),
        prop::option::of(any_json()),
        prop::option::of(any_json()),
        prop::option::of(any_json()),
    )
        .prop_map(|(title, due_date, estimated_hours, importance, dependencies)| RawTask {
            title,
            due_date,
            estimated_hours,
            importance,
            dependencies,
        })
}

/// A well-typed task with titles from a small pool so dependencies connect.
fn plausible_task() -> impl Strategy<Value = RawTask> {
    (
        0usize..6,
        prop::option::of(-60i64..90),
        0.0f64..40.0,
        -2i64..14,
        prop::collection::vec(0usize..6, 0..5),
    )
        .prop_map(|(title, due_in, hours, importance, deps)| {
            let mut raw = RawTask::titled(format!("task-{title}"))
                .with_hours(hours)
                .with_importance(importance)
                .with_dependencies(deps.into_iter().map(|d| format!("task-{d}")));
            if let Some(days) = due_in {
                let due = today() + Duration::days(days);
                raw = raw.with_due_date(due.format("%Y-%m-%d").to_string());
            }
            raw
        })
}

proptest! {
    #[test]
    fn prop_sanitize_is_total(raw in any_raw_task()) {
        let t = sanitize(&raw);
        prop_assert!(!t.title.trim().is_empty());
        prop_assert!((1..=10).contains(&t.importance));
        prop_assert!(t.estimated_hours >= 0.0 && t.estimated_hours.is_finite());
        prop_assert!(t.dependencies.iter().all(|d| !d.is_empty()));
    }

    #[test]
    fn prop_default_weight_scores_bounded(
        tasks in prop::collection::vec(plausible_task(), 0..12),
        kind in prop::sample::select(StrategyKind::ALL.to_vec()),
    ) {
        let req = AnalyzeRequest::new(tasks).with_strategy(kind.key());
        for t in Analyzer::standard().analyze(&req, today()).tasks {
            prop_assert!((0.0..=10.0).contains(&t.score), "{} -> {}", t.task.title, t.score);
        }
    }

    #[test]
    fn prop_effort_monotone(a in 0.0f64..100.0, b in 0.0f64..100.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(effort_score(lo) >= effort_score(hi));
    }

    #[test]
    fn prop_urgency_monotone(a in -400i64..400, b in -400i64..400) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        let scale = UrgencyScale::default();
        let u = |d: i64| urgency_score(Some(today() + Duration::days(d)), today(), &scale);
        prop_assert!(u(near) >= u(far));
    }

    #[test]
    fn prop_dependency_monotone(a in 0usize..50, b in 0usize..50) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(dependency_score(lo) <= dependency_score(hi));
    }

    #[test]
    fn prop_overdue_is_max_urgency(days_ago in 1i64..10_000) {
        let due = today() - Duration::days(days_ago);
        prop_assert_eq!(urgency_score(Some(due), today(), &UrgencyScale::default()), 10.0);
    }

    #[test]
    fn prop_analyze_deterministic(tasks in prop::collection::vec(plausible_task(), 0..12)) {
        let analyzer = Analyzer::standard();
        let req = AnalyzeRequest::new(tasks);
        let one = serde_json::to_string(&analyzer.analyze(&req, today())).unwrap();
        let two = serde_json::to_string(&analyzer.analyze(&req, today())).unwrap();
        prop_assert_eq!(one, two);
    }

    #[test]
    fn prop_sorted_and_stable(tasks in prop::collection::vec(plausible_task(), 0..12)) {
        // Tag each task with its input position via a unique title.
        let tagged: Vec<RawTask> = tasks
            .into_iter()
            .enumerate()
            .map(|(i, mut t)| {
                t.title = Some(json!(format!("{i:02}")));
                t.dependencies = None;
                t
            })
            .collect();

        let result = Analyzer::standard().analyze(&AnalyzeRequest::new(tagged), today());
        for w in result.tasks.windows(2) {
            prop_assert!(w[0].score >= w[1].score);
            if w[0].score == w[1].score {
                prop_assert!(w[0].task.title < w[1].task.title);
            }
        }
    }
}
