//! Period reports: current vs previous period plus a 12-bucket trend.
//!
//! Every bucket is fetched through [`TaskLookup`] and summarized on its
//! own. A lookup failure aborts the whole report.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CadenceError, Result};
use crate::period::{Period, PeriodBounds, UtcRange, period_bounds, shift_back};
use crate::stats::{StatsSummary, summarize};
use crate::task::Task;

/// Number of trend buckets, ending at the current period.
pub const HISTORICAL_BUCKETS: u32 = 12;

/// Range query over stored tasks.
///
/// Implementations return every task whose `scheduled_start` lies in
/// `start..=end`, regardless of completion state.
pub trait TaskLookup {
    fn tasks_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> anyhow::Result<Vec<Task>>;
}

impl<F> TaskLookup for F
where
    F: Fn(DateTime<Utc>, DateTime<Utc>) -> anyhow::Result<Vec<Task>>,
{
    fn tasks_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> anyhow::Result<Vec<Task>> {
        self(start, end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub period: Period,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(flatten)]
    pub summary: StatsSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBucket {
    pub label: String,
    /// First local day of the bucket.
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(flatten)]
    pub summary: StatsSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub current: PeriodStats,
    pub previous: PeriodStats,
    /// Oldest first; the last bucket is the current period.
    pub historical: Vec<HistoricalBucket>,
}

/// Compute the UTC query range of the period containing `date` in `tz`.
pub fn compute_period_bounds(period: Period, date: NaiveDate, tz: Tz) -> UtcRange {
    period_bounds(period, date).to_utc(tz)
}

fn fetch<L>(lookup: &L, range: UtcRange) -> Result<Vec<Task>>
where
    L: TaskLookup + ?Sized,
{
    lookup
        .tasks_in_range(range.start, range.end)
        .map_err(|source| CadenceError::Lookup {
            start: range.start,
            end: range.end,
            source,
        })
}

fn period_stats<L>(lookup: &L, bounds: PeriodBounds, tz: Tz) -> Result<PeriodStats>
where
    L: TaskLookup + ?Sized,
{
    let range = bounds.to_utc(tz);
    let tasks = fetch(lookup, range)?;
    Ok(PeriodStats {
        period: bounds.period,
        start: range.start,
        end: range.end,
        summary: summarize(&tasks),
    })
}

/// Tasks of the period containing `reference`, ordered by scheduled start.
pub fn list_tasks<L>(period: Period, reference: NaiveDate, tz: Tz, lookup: &L) -> Result<Vec<Task>>
where
    L: TaskLookup + ?Sized,
{
    let mut tasks = fetch(lookup, compute_period_bounds(period, reference, tz))?;
    tasks.sort_by_key(|t| t.scheduled_start);
    Ok(tasks)
}

/// Build the current, previous, and historical statistics for a period.
pub fn build_stats_report<L>(period: Period, reference: NaiveDate, tz: Tz, lookup: &L) -> Result<StatsReport>
where
    L: TaskLookup + ?Sized,
{
    let current = period_stats(lookup, period_bounds(period, reference), tz)?;
    let previous = period_stats(lookup, period_bounds(period, shift_back(period, reference, 1)), tz)?;

    let mut historical = Vec::with_capacity(HISTORICAL_BUCKETS as usize);
    for i in (0..HISTORICAL_BUCKETS).rev() {
        let bounds = period_bounds(period, shift_back(period, reference, i));
        let stats = period_stats(lookup, bounds, tz)?;
        debug!(
            target: "cadence::report",
            label = %bounds.label(),
            tasks = stats.summary.total_tasks,
            "summarized bucket"
        );
        historical.push(HistoricalBucket {
            label: bounds.label(),
            date: bounds.first_day(),
            start: stats.start,
            end: stats.end,
            summary: stats.summary,
        });
    }

    info!(
        target: "cadence::report",
        period = %period,
        %reference,
        current_tasks = current.summary.total_tasks,
        previous_tasks = previous.summary.total_tasks,
        "built stats report"
    );

    Ok(StatsReport {
        current,
        previous,
        historical,
    })
}
