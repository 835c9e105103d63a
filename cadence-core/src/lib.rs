//! cadence-core: alignment scoring and period statistics for scheduled tasks.

pub mod category;
pub mod error;
pub mod period;
pub mod report;
pub mod scoring;
pub mod stats;
pub mod store;
pub mod task;
pub mod time;

pub use category::{Category, categorize_event};
pub use error::{CadenceError, Result};
pub use period::{Period, PeriodBounds, UtcRange, period_bounds, shift_back};
pub use report::{
    HISTORICAL_BUCKETS, HistoricalBucket, PeriodStats, StatsReport, TaskLookup, build_stats_report,
    compute_period_bounds, list_tasks,
};
pub use scoring::{ScoringPolicy, TaskScore, score_task, score_task as recompute_task_score};
pub use stats::{CategoryStats, StatsSummary, summarize};
pub use store::TaskStore;
pub use task::{NewTask, Task, TaskUpdate};
