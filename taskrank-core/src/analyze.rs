//! Batch orchestration: sanitize, detect cycles, score, sort.
//!
//! An [`Analyzer`] holds only immutable configuration (strategy table and
//! urgency scale). Every call works on its own batch and its own `today`, so
//! one analyzer can be shared freely across threads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cycles::{cycle_members, detect_cycles};
use crate::error::{CoreError, Result};
use crate::factors::UrgencyScale;
use crate::priority::{Priority, calculate_priority};
use crate::sanitize::sanitize_all;
use crate::strategy::{StrategyInfo, StrategyKind, StrategyTable, Weights};
use crate::task::{RawTask, ScoredTask, Task};

/// Number of tasks returned by [`Analyzer::suggest`] unless told otherwise.
pub const DEFAULT_SUGGEST_LIMIT: usize = 3;

/// One analyze call's input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzeRequest {
    pub tasks: Vec<RawTask>,
    /// Wire name; `None` or unknown means `smart_balance`.
    pub strategy: Option<String>,
    pub custom_weights: Option<Weights>,
}

impl AnalyzeRequest {
    pub fn new(tasks: Vec<RawTask>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, name: impl Into<String>) -> Self {
        self.strategy = Some(name.into());
        self
    }

    pub fn with_custom_weights(mut self, weights: Weights) -> Self {
        self.custom_weights = Some(weights);
        self
    }

    /// Check the top-level shape of a decoded request body.
    ///
    /// Accepts `{ "tasks": [...], "strategy"?, "custom_weights"? }` or a bare
    /// list of tasks. Per-task content is not inspected here.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut map = match value {
            Value::Array(items) => return Ok(Self::new(raw_tasks(items))),
            Value::Object(map) => map,
            other => {
                return Err(CoreError::invalid_request(format!(
                    "expected an object with `tasks` or a list of tasks, got {}",
                    json_kind(&other)
                )));
            }
        };

        let tasks = match map.remove("tasks") {
            Some(Value::Array(items)) => raw_tasks(items),
            Some(other) => {
                return Err(CoreError::invalid_request(format!(
                    "`tasks` must be a list, got {}",
                    json_kind(&other)
                )));
            }
            None => return Err(CoreError::invalid_request("`tasks` is missing")),
        };

        let strategy = match map.remove("strategy") {
            Some(Value::String(s)) => Some(s),
            Some(Value::Null) | None => None,
            Some(other) => {
                tracing::debug!(kind = json_kind(&other), "non-string strategy ignored");
                None
            }
        };

        let custom_weights = match map.remove("custom_weights") {
            Some(Value::Null) | None => None,
            Some(v) => Some(Weights::from_value(&v)?),
        };

        Ok(Self {
            tasks,
            strategy,
            custom_weights,
        })
    }
}

fn raw_tasks(items: Vec<Value>) -> Vec<RawTask> {
    items.into_iter().map(RawTask::from_value).collect()
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Output of one analyze call, in wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResult {
    /// Sorted by score, highest first; ties keep input order.
    pub tasks: Vec<ScoredTask>,
    pub strategy: StrategyInfo,
    pub warnings: Vec<String>,
    pub circular_dependencies: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analyzer {
    strategies: StrategyTable,
    urgency: UrgencyScale,
}

impl Analyzer {
    pub fn new(strategies: StrategyTable, urgency: UrgencyScale) -> Result<Self> {
        urgency.validate()?;
        Ok(Self {
            strategies,
            urgency,
        })
    }

    /// Built-in strategies and the default urgency scale.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Static listing of every strategy.
    pub fn list_strategies(&self) -> Vec<StrategyInfo> {
        self.strategies.describe()
    }

    /// Score a single sanitized task outside any batch.
    ///
    /// Custom weights apply only where [`StrategyTable::resolve_weights`]
    /// accepts them; otherwise the strategy's own weights are used. No cycle
    /// context exists here, so the cycle reason is never added.
    pub fn calculate_priority(
        &self,
        task: &Task,
        kind: StrategyKind,
        custom: Option<Weights>,
        today: NaiveDate,
    ) -> Priority {
        let weights = self.strategies.resolve_weights(kind, custom);
        calculate_priority(task, &weights, today, &self.urgency, false)
    }

    /// Score and rank a whole batch against `today`.
    pub fn analyze(&self, request: &AnalyzeRequest, today: NaiveDate) -> AnalyzeResult {
        let kind = StrategyKind::resolve(request.strategy.as_deref());
        let strategy = self.strategies.get(kind);
        let weights = self.strategies.resolve_weights(kind, request.custom_weights);

        let tasks = sanitize_all(&request.tasks);
        let cycles = detect_cycles(&tasks);
        let in_cycle = cycle_members(&tasks);

        let mut warnings: Vec<String> = cycles.iter().map(|c| c.warning.clone()).collect();
        if let Some(custom) = request.custom_weights {
            if custom != weights {
                tracing::warn!(
                    strategy = kind.key(),
                    weights = %custom.describe(),
                    "custom weights ignored"
                );
                warnings.push(format!(
                    "Custom weights ignored for {} ({})",
                    strategy.name,
                    custom.describe()
                ));
            }
        }

        let mut scored: Vec<ScoredTask> = tasks
            .iter()
            .map(|task| {
                let p = calculate_priority(
                    task,
                    &weights,
                    today,
                    &self.urgency,
                    in_cycle.contains(task.title.as_str()),
                );
                ScoredTask {
                    task: task.clone(),
                    score: p.score,
                    breakdown: p.breakdown,
                    reasons: p.reasons,
                }
            })
            .collect();

        // Stable: equal scores keep input order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        tracing::info!(
            tasks = scored.len(),
            strategy = kind.key(),
            cycles = cycles.len(),
            %today,
            "analyzed batch"
        );

        AnalyzeResult {
            tasks: scored,
            strategy: strategy.info_with(weights),
            warnings,
            circular_dependencies: cycles.into_iter().map(|c| c.path).collect(),
        }
    }

    /// Top `limit` tasks under `smart_balance`, whatever strategy was asked.
    pub fn suggest(
        &self,
        request: &AnalyzeRequest,
        today: NaiveDate,
        limit: usize,
    ) -> AnalyzeResult {
        let fixed = AnalyzeRequest {
            tasks: request.tasks.clone(),
            strategy: Some(StrategyKind::SmartBalance.key().to_string()),
            custom_weights: request.custom_weights,
        };
        let mut result = self.analyze(&fixed, today);
        result.tasks.truncate(limit);
        result
    }
}
