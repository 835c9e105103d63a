//! cadence-ingest: calendar event import (Google Calendar JSON, iCalendar text)
//! and conversion of events into new tasks.

pub mod convert;
pub mod parsers;
pub mod types;

pub use convert::{ImportPlan, SkippedEvent, events_to_new_tasks};
pub use parsers::{google::parse_google_events_json, ics::parse_ics};
pub use types::{CalendarEvent, EventFormat, UNTITLED_EVENT};
