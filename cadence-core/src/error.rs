//! Error types for the scoring and aggregation engine.

use chrono::{DateTime, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CadenceError>;

#[derive(Debug, Error)]
pub enum CadenceError {
    /// An interval whose end does not come after its start.
    #[error("invalid interval: end {end} is not after start {start}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("invalid scoring policy: {0}")]
    InvalidPolicy(&'static str),

    /// The task lookup collaborator failed while serving a range query.
    #[error("task lookup failed for {start} ..= {end}")]
    Lookup {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        #[source]
        source: anyhow::Error,
    },
}

impl CadenceError {
    pub fn invalid_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        CadenceError::InvalidInterval { start, end }
    }
}
