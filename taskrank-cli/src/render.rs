use std::fmt::Write as _;

use chrono::NaiveDate;
use taskrank_core::{AnalyzeResult, StrategyInfo};

const TITLE_WIDTH: usize = 32;

/// Plain-text ranking: header, one row per task, then warnings.
pub fn render_result(result: &AnalyzeResult, today: NaiveDate) -> String {
    let mut out = String::new();
    let s = &result.strategy;
    let _ = writeln!(out, "{} {} ({})", s.icon, s.name, s.weights);
    let _ = writeln!(out, "Evaluated on {today}\n");

    if result.tasks.is_empty() {
        out.push_str("(no tasks)\n");
    }

    for (i, t) in result.tasks.iter().enumerate() {
        let due = t
            .task
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:>3}. {:>5.2}  {:<width$}  {:<10}  {}",
            i + 1,
            t.score,
            truncate(&t.task.title, TITLE_WIDTH),
            due,
            t.reasons.join("; "),
            width = TITLE_WIDTH,
        );
    }

    if !result.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for w in &result.warnings {
            let _ = writeln!(out, "- {w}");
        }
    }
    out
}

pub fn render_strategies(list: &[StrategyInfo]) -> String {
    let mut out = String::new();
    for s in list {
        let _ = writeln!(out, "{} {:<16} {:<16} {}", s.icon, s.key, s.name, s.weights);
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut t: String = s.chars().take(max - 1).collect();
    t.push('…');
    t
}
