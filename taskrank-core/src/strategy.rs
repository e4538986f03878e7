//! Strategy table: named weighting schemes over the four scoring factors.
//!
//! Strategies are a closed enum at the core; the wire representation is the
//! snake_case key (`"smart_balance"`, ...). The table is built once and passed
//! explicitly to whoever scores tasks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

/// Tolerance when checking that a weight vector sums to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Highest value any factor scorer can return.
const MAX_FACTOR_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    SmartBalance,
    FastestWins,
    HighImpact,
    DeadlineDriven,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::SmartBalance,
        StrategyKind::FastestWins,
        StrategyKind::HighImpact,
        StrategyKind::DeadlineDriven,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            StrategyKind::SmartBalance => "smart_balance",
            StrategyKind::FastestWins => "fastest_wins",
            StrategyKind::HighImpact => "high_impact",
            StrategyKind::DeadlineDriven => "deadline_driven",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.into_iter().find(|k| k.key().eq_ignore_ascii_case(key))
    }

    /// Unknown or missing names resolve to `SmartBalance`.
    pub fn resolve(name: Option<&str>) -> Self {
        match name {
            None => StrategyKind::SmartBalance,
            Some(n) => Self::from_key(n).unwrap_or_else(|| {
                tracing::debug!(strategy = n, "unknown strategy, using smart_balance");
                StrategyKind::SmartBalance
            }),
        }
    }

    /// Only `smart_balance` honours caller-supplied weights.
    pub fn accepts_custom_weights(&self) -> bool {
        matches!(self, StrategyKind::SmartBalance)
    }
}

/// Weights for (urgency, importance, effort, dependencies).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependencies: f64,
}

impl Weights {
    pub const fn new(urgency: f64, importance: f64, effort: f64, dependencies: f64) -> Self {
        Self {
            urgency,
            importance,
            effort,
            dependencies,
        }
    }

    pub fn sum(&self) -> f64 {
        self.urgency + self.importance + self.effort + self.dependencies
    }

    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }

    pub fn is_non_negative(&self) -> bool {
        [self.urgency, self.importance, self.effort, self.dependencies]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }

    /// Every weighted score these weights can produce is a finite number.
    pub fn is_bounded(&self) -> bool {
        let magnitude = [self.urgency, self.importance, self.effort, self.dependencies]
            .iter()
            .map(|w| w.abs())
            .sum::<f64>();
        (magnitude * MAX_FACTOR_SCORE).is_finite()
    }

    /// "Urgency 35% · Importance 35% · Effort 15% · Dependencies 15%"
    pub fn describe(&self) -> String {
        format!(
            "Urgency {}% · Importance {}% · Effort {}% · Dependencies {}%",
            percent(self.urgency),
            percent(self.importance),
            percent(self.effort),
            percent(self.dependencies),
        )
    }

    /// Parse custom weights from a request body.
    ///
    /// Accepts `{urgency, importance, effort, dependencies}` or a 4-element
    /// array in that order. Anything else is a shape error. Values are not
    /// required to sum to one.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                let field = |name: &str| -> Result<f64> {
                    let v = map
                        .get(name)
                        .ok_or_else(|| CoreError::invalid_weights(format!("missing `{name}`")))?;
                    v.as_f64().ok_or_else(|| {
                        CoreError::invalid_weights(format!("`{name}` is not a number: {v}"))
                    })
                };
                Self::new(
                    field("urgency")?,
                    field("importance")?,
                    field("effort")?,
                    field("dependencies")?,
                )
                .checked()
            }
            Value::Array(items) => {
                let values = items
                    .iter()
                    .map(|v| {
                        v.as_f64().ok_or_else(|| {
                            CoreError::invalid_weights(format!("not a number: {v}"))
                        })
                    })
                    .collect::<Result<Vec<f64>>>()?;
                Self::from_slice(&values)
            }
            other => Err(CoreError::invalid_weights(format!(
                "expected an object or array, got {other}"
            ))),
        }
    }

    /// Parse `"0.4,0.4,0.1,0.1"` (as given on the command line).
    pub fn parse_list(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<f64>()
                    .map_err(|_| CoreError::invalid_weights(format!("not a number: {part:?}")))
            })
            .collect::<Result<Vec<f64>>>()?;
        Self::from_slice(&values)
    }

    fn from_slice(values: &[f64]) -> Result<Self> {
        match values {
            [u, i, e, d] => Self::new(*u, *i, *e, *d).checked(),
            _ => Err(CoreError::invalid_weights(format!(
                "expected 4 values, got {}",
                values.len()
            ))),
        }
    }
}

impl Weights {
    fn checked(self) -> Result<Self> {
        if self.is_bounded() {
            Ok(self)
        } else {
            Err(CoreError::invalid_weights(format!(
                "too large to score with: {}",
                self.describe()
            )))
        }
    }
}

fn percent(w: f64) -> String {
    let p = w * 100.0;
    if (p - p.round()).abs() < 1e-9 {
        format!("{}", p.round() as i64)
    } else {
        format!("{p:.1}")
    }
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub kind: StrategyKind,
    pub name: &'static str,
    pub icon: &'static str,
    pub weights: Weights,
}

/// Display metadata for a strategy, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInfo {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub weights: String,
}

impl Strategy {
    pub fn info(&self) -> StrategyInfo {
        self.info_with(self.weights)
    }

    /// Metadata reflecting the weights actually used (e.g. custom ones).
    pub fn info_with(&self, weights: Weights) -> StrategyInfo {
        StrategyInfo {
            key: self.kind.key().to_string(),
            name: self.name.to_string(),
            icon: self.icon.to_string(),
            weights: weights.describe(),
        }
    }
}

/// Immutable registry of strategies, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyTable {
    entries: Vec<Strategy>,
}

impl StrategyTable {
    /// The four built-in strategies.
    pub fn standard() -> Self {
        Self {
            entries: vec![
                Strategy {
                    kind: StrategyKind::SmartBalance,
                    name: "Smart Balance",
                    icon: "⚖️",
                    weights: Weights::new(0.35, 0.35, 0.15, 0.15),
                },
                Strategy {
                    kind: StrategyKind::FastestWins,
                    name: "Fastest Wins",
                    icon: "⚡",
                    weights: Weights::new(0.20, 0.10, 0.70, 0.00),
                },
                Strategy {
                    kind: StrategyKind::HighImpact,
                    name: "High Impact",
                    icon: "🎯",
                    weights: Weights::new(0.10, 0.80, 0.10, 0.00),
                },
                Strategy {
                    kind: StrategyKind::DeadlineDriven,
                    name: "Deadline Driven",
                    icon: "⏰",
                    weights: Weights::new(0.80, 0.05, 0.15, 0.00),
                },
            ],
        }
    }

    pub fn get(&self, kind: StrategyKind) -> &Strategy {
        self.entries
            .iter()
            .find(|s| s.kind == kind)
            .unwrap_or(&self.entries[0])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Strategy> {
        self.entries.iter()
    }

    /// Weights to score with: caller overrides for strategies that accept
    /// them (when non-negative and bounded), otherwise the strategy's own.
    pub fn resolve_weights(&self, kind: StrategyKind, custom: Option<Weights>) -> Weights {
        let strategy = self.get(kind);
        match custom {
            Some(w) if kind.accepts_custom_weights() && w.is_non_negative() && w.is_bounded() => {
                if !w.is_normalized() {
                    tracing::debug!(sum = w.sum(), "custom weights do not sum to 1.0");
                }
                w
            }
            Some(_) => strategy.weights,
            None => strategy.weights,
        }
    }

    /// Listing of every strategy.
    pub fn describe(&self) -> Vec<StrategyInfo> {
        self.entries.iter().map(Strategy::info).collect()
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::standard()
    }
}
