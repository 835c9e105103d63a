//! Alignment scoring: how closely a task's execution matched its schedule.
//!
//! Being early is penalized the same as being late. The combined start and
//! end deviation costs one point per penalty unit (30 minutes by default),
//! and the relative duration deviation costs one point per percent. The
//! alignment score is the mean of the two, clamped to 0..=100.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CadenceError, Result};
use crate::task::Task;

/// Score granted to a completed task with no recorded execution interval.
pub const PARTIAL_COMPLETION_SCORE: u8 = 50;
/// Minutes of combined start+end delay that cost one timing point.
pub const DELAY_PENALTY_MINUTES: u32 = 30;
/// Flat award for any completed task.
pub const BASE_POINTS: u32 = 10;
/// Bonus awarded on top of the base, scaled linearly by alignment.
pub const BONUS_POINTS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub partial_completion_score: u8,
    pub delay_penalty_minutes: u32,
    pub base_points: u32,
    pub bonus_points: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            partial_completion_score: PARTIAL_COMPLETION_SCORE,
            delay_penalty_minutes: DELAY_PENALTY_MINUTES,
            base_points: BASE_POINTS,
            bonus_points: BONUS_POINTS,
        }
    }
}

impl ScoringPolicy {
    /// Points for a given alignment score; nothing unless completed.
    pub fn points_for(&self, alignment_score: u8, is_completed: bool) -> u32 {
        if !is_completed {
            return 0;
        }
        let bonus = (f64::from(alignment_score) / 100.0 * f64::from(self.bonus_points)).round();
        self.base_points.saturating_add(bonus as u32)
    }

    /// Reject settings that would make the timing penalty meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.delay_penalty_minutes == 0 {
            return Err(CadenceError::InvalidPolicy("delay_penalty_minutes must be at least 1"));
        }
        if self.partial_completion_score > 100 {
            return Err(CadenceError::InvalidPolicy("partial_completion_score must be within 0..=100"));
        }
        Ok(())
    }

    fn penalty_unit_ms(&self) -> f64 {
        f64::from(self.delay_penalty_minutes) * 60_000.0
    }
}

/// Derived score fields of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskScore {
    pub alignment_score: u8,
    pub points: u32,
}

impl TaskScore {
    pub const ZERO: TaskScore = TaskScore {
        alignment_score: 0,
        points: 0,
    };
}

/// Compute the alignment score and points for a task.
///
/// Pure: callers persist the result onto the task.
pub fn score_task(task: &Task, policy: &ScoringPolicy) -> Result<TaskScore> {
    if !task.is_completed {
        return Ok(TaskScore::ZERO);
    }

    let raw = match (task.actual_start, task.actual_end) {
        (Some(actual_start), Some(actual_end)) => raw_alignment(
            (task.scheduled_start, task.scheduled_end),
            (actual_start, actual_end),
            policy,
        )?,
        _ => f64::from(policy.partial_completion_score),
    };

    let alignment_score = raw.round().clamp(0.0, 100.0) as u8;
    let points = policy.points_for(alignment_score, true);

    debug!(
        target: "cadence::scoring",
        task_id = %task.id,
        raw,
        alignment_score,
        points,
        "scored task"
    );

    Ok(TaskScore {
        alignment_score,
        points,
    })
}

/// Unrounded alignment of an actual interval against a scheduled one.
pub fn raw_alignment(
    scheduled: (DateTime<Utc>, DateTime<Utc>),
    actual: (DateTime<Utc>, DateTime<Utc>),
    policy: &ScoringPolicy,
) -> Result<f64> {
    let (scheduled_start, scheduled_end) = scheduled;
    let (actual_start, actual_end) = actual;

    let scheduled_ms = (scheduled_end - scheduled_start).num_milliseconds();
    if scheduled_ms <= 0 {
        return Err(CadenceError::invalid_interval(scheduled_start, scheduled_end));
    }
    let actual_ms = (actual_end - actual_start).num_milliseconds();

    let start_delay = (actual_start - scheduled_start).num_milliseconds().abs();
    let end_delay = (actual_end - scheduled_end).num_milliseconds().abs();

    let duration_accuracy = (actual_ms - scheduled_ms).abs() as f64 / scheduled_ms as f64;

    let timing_score = (100.0 - (start_delay + end_delay) as f64 / policy.penalty_unit_ms()).max(0.0);
    let duration_score = (100.0 - duration_accuracy * 100.0).max(0.0);

    Ok(((timing_score + duration_score) / 2.0).clamp(0.0, 100.0))
}
