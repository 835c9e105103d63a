//! Task model: scheduled interval, recorded execution, and derived score fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::{Category, categorize_event};
use crate::error::{CadenceError, Result};
use crate::scoring::{ScoringPolicy, TaskScore, score_task};

/// Core task type.
///
/// `alignment_score` and `points` are derived; they only change together,
/// through [`Task::apply_update`] or [`Task::toggle_completion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,

    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,

    #[serde(default)]
    pub actual_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_end: Option<DateTime<Utc>>,

    pub is_completed: bool,

    /// 0-100.
    pub alignment_score: u8,
    pub points: u32,

    /// Id of the calendar event this task was imported from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task. Category defaults to the keyword classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub external_id: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            category: None,
            scheduled_start: start,
            scheduled_end: end,
            external_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    /// Reject empty titles and non-positive scheduled intervals.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CadenceError::EmptyTitle);
        }
        validate_interval(self.scheduled_start, self.scheduled_end)
    }
}

/// Partial update of execution fields. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_end: Option<DateTime<Utc>>,
    pub is_completed: Option<bool>,
}

impl TaskUpdate {
    pub fn complete() -> Self {
        Self {
            is_completed: Some(true),
            ..Self::default()
        }
    }

    pub fn with_actual(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.actual_start = Some(start);
        self.actual_end = Some(end);
        self
    }
}

pub fn validate_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end <= start {
        return Err(CadenceError::invalid_interval(start, end));
    }
    Ok(())
}

impl Task {
    pub fn create(id: impl Into<String>, new: NewTask, now: DateTime<Utc>) -> Result<Self> {
        new.validate()?;

        let title = new.title.trim().to_string();
        let category = new.category.unwrap_or_else(|| categorize_event(&title));
        let description = new
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id: id.into(),
            title,
            description,
            category,
            scheduled_start: new.scheduled_start,
            scheduled_end: new.scheduled_end,
            actual_start: None,
            actual_end: None,
            is_completed: false,
            alignment_score: 0,
            points: 0,
            external_id: new.external_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Scheduled length in minutes.
    pub fn scheduled_minutes(&self) -> i64 {
        (self.scheduled_end - self.scheduled_start).num_minutes()
    }

    pub fn score(&self) -> TaskScore {
        TaskScore {
            alignment_score: self.alignment_score,
            points: self.points,
        }
    }

    /// Apply an update and recompute the derived fields.
    ///
    /// The task is left untouched if the update or scoring fails.
    pub fn apply_update(
        &mut self,
        update: TaskUpdate,
        policy: &ScoringPolicy,
        now: DateTime<Utc>,
    ) -> Result<TaskScore> {
        let mut next = self.clone();
        if let Some(start) = update.actual_start {
            next.actual_start = Some(start);
        }
        if let Some(end) = update.actual_end {
            next.actual_end = Some(end);
        }
        if let Some(done) = update.is_completed {
            next.is_completed = done;
        }

        if let (Some(start), Some(end)) = (next.actual_start, next.actual_end) {
            if end < start {
                return Err(CadenceError::invalid_interval(start, end));
            }
        }

        next.commit(policy, now)?;
        *self = next;
        Ok(self.score())
    }

    /// Flip completion.
    ///
    /// Completing stamps a missing actual start with the scheduled start and
    /// a missing actual end with `now`. Un-completing clears both.
    pub fn toggle_completion(&mut self, policy: &ScoringPolicy, now: DateTime<Utc>) -> Result<TaskScore> {
        let mut next = self.clone();
        if next.is_completed {
            next.is_completed = false;
            next.actual_start = None;
            next.actual_end = None;
        } else {
            next.is_completed = true;
            let start = *next.actual_start.get_or_insert(next.scheduled_start);
            if next.actual_end.is_none() {
                next.actual_end = Some(now.max(start));
            }
        }

        next.commit(policy, now)?;
        *self = next;
        Ok(self.score())
    }

    fn commit(&mut self, policy: &ScoringPolicy, now: DateTime<Utc>) -> Result<()> {
        let score = score_task(self, policy)?;
        self.alignment_score = score.alignment_score;
        self.points = score.points;
        self.updated_at = now;
        Ok(())
    }
}
