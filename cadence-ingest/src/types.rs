use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const UNTITLED_EVENT: &str = "Untitled Event";

/// Source format of an event export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFormat {
    /// Google Calendar `events.list` JSON.
    Google,
    /// iCalendar (.ics) text.
    Ics,
}

impl EventFormat {
    /// Guess the format from a file extension; `.ics` is iCalendar, anything else JSON.
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext {
            Some(e) if e.eq_ignore_ascii_case("ics") => EventFormat::Ics,
            _ => EventFormat::Google,
        }
    }
}

impl FromStr for EventFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" | "json" => Ok(EventFormat::Google),
            "ics" | "ical" => Ok(EventFormat::Ics),
            other => Err(format!("unknown event format: {other}")),
        }
    }
}

/// Normalized calendar event (source-agnostic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub external_id: Option<String>,
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
