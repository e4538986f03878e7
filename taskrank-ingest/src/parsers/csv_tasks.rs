//! CSV task parser.
//!
//! Expected header (case-insensitive, any order, extra columns ignored):
//!   title,due_date,estimated_hours,importance,dependencies
//!
//! Cells are passed through as strings; the core sanitizer coerces them.
//! The dependencies cell holds titles separated by `;`, `,` or `|`.

use anyhow::{Result, bail};
use regex::Regex;
use serde_json::Value;
use std::io::Read;
use taskrank_core::RawTask;

const COLUMNS: [&str; 5] = [
    "title",
    "due_date",
    "estimated_hours",
    "importance",
    "dependencies",
];

pub fn parse_tasks_csv(reader: impl Read) -> Result<Vec<RawTask>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let [title, due, hours, importance, deps] = COLUMNS.map(position);

    if [title, due, hours, importance, deps].iter().all(Option::is_none) {
        bail!(
            "no recognised columns in header {:?} (expected any of {})",
            headers.iter().collect::<Vec<_>>(),
            COLUMNS.join(", ")
        );
    }

    let dep_split = Regex::new(r"\s*[;,|]\s*")?;
    let mut tasks = Vec::new();

    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let cell = |col: Option<usize>| -> Option<Value> {
            col.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
        };

        let dependencies = deps
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Value::Array(
                    dep_split
                        .split(s)
                        .filter(|d| !d.is_empty())
                        .map(|d| Value::String(d.to_string()))
                        .collect(),
                )
            });

        tasks.push(RawTask {
            title: cell(title),
            due_date: cell(due),
            estimated_hours: cell(hours),
            importance: cell(importance),
            dependencies,
        });
    }

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskrank_core::sanitize;

    #[test]
    fn test_parses_basic_rows() {
        let text = "\
Title,Due_Date,Estimated_Hours,Importance,Dependencies
Fix bug,2026-03-01,2,10,
Write docs,,4.5,6,Fix bug; Release
";
        let tasks = parse_tasks_csv(text.as_bytes()).unwrap();
        assert_eq!(tasks.len(), 2);

        let fix = sanitize(&tasks[0]);
        assert_eq!(fix.title, "Fix bug");
        assert_eq!(fix.estimated_hours, 2.0);
        assert_eq!(fix.importance, 10);
        assert!(fix.dependencies.is_empty());
        assert!(fix.due_date.is_some());

        let docs = sanitize(&tasks[1]);
        assert_eq!(docs.due_date, None);
        assert_eq!(docs.estimated_hours, 4.5);
        assert_eq!(docs.dependencies, vec!["Fix bug", "Release"]);
    }

    #[test]
    fn test_separators_and_column_order() {
        let text = "dependencies,title\n\"A|B , C;D\",Z\n";
        let tasks = parse_tasks_csv(text.as_bytes()).unwrap();
        let t = sanitize(&tasks[0]);
        assert_eq!(t.title, "Z");
        assert_eq!(t.dependencies, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_skips_blank_rows_and_short_rows() {
        let text = "title,importance\n,\nOnly title\nBoth,3\n";
        let tasks = parse_tasks_csv(text.as_bytes()).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(sanitize(&tasks[0]).importance, 5);
        assert_eq!(sanitize(&tasks[1]).importance, 3);
    }

    #[test]
    fn test_rejects_unrelated_header() {
        let err = parse_tasks_csv("date,amount\n2026-01-01,5\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("no recognised columns"));
    }
}
