//! taskrank-core: scoring and ranking engine for task batches

pub mod analyze;
pub mod cycles;
pub mod error;
pub mod factors;
pub mod priority;
pub mod sanitize;
pub mod strategy;
pub mod task;
pub mod time;

pub use analyze::{AnalyzeRequest, AnalyzeResult, Analyzer, DEFAULT_SUGGEST_LIMIT};
pub use cycles::{DependencyCycle, detect_cycles};
pub use error::{CoreError, Result};
pub use factors::UrgencyScale;
pub use priority::{Priority, calculate_priority};
pub use sanitize::{Parsed, sanitize};
pub use strategy::{Strategy, StrategyInfo, StrategyKind, StrategyTable, Weights};
pub use task::{FactorBreakdown, RawTask, ScoredTask, Task};
