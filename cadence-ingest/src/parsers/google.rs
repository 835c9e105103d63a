//! Google Calendar `events.list` JSON parser.
//!
//! Accepts the full API response (`{"items": [...]}`) or a bare array of
//! event resources. Timed events carry `dateTime` (RFC 3339); all-day
//! events carry `date` and start at local midnight in `tz`.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::warn;

use super::{all_day_start, title_or_untitled};
use crate::types::CalendarEvent;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload {
    List { items: Vec<GoogleEvent> },
    Bare(Vec<GoogleEvent>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEvent {
    id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<DateTime<FixedOffset>>,
    date: Option<NaiveDate>,
}

impl EventTime {
    fn resolve(&self, tz: Tz) -> Option<DateTime<Utc>> {
        match (self.date_time, self.date) {
            (Some(dt), _) => Some(dt.with_timezone(&Utc)),
            (None, Some(date)) => Some(all_day_start(date, tz)),
            (None, None) => None,
        }
    }
}

pub fn parse_google_events_json(json: &str, tz: Tz) -> Result<Vec<CalendarEvent>> {
    let payload: Payload = serde_json::from_str(json).context("parse Google Calendar events JSON")?;
    let items = match payload {
        Payload::List { items } => items,
        Payload::Bare(items) => items,
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let start = item.start.as_ref().and_then(|t| t.resolve(tz));
        let end = item.end.as_ref().and_then(|t| t.resolve(tz));

        let (Some(start), Some(end)) = (start, end) else {
            warn!(
                target: "cadence::ingest",
                id = item.id.as_deref().unwrap_or("-"),
                "skipping event without start/end"
            );
            continue;
        };

        out.push(CalendarEvent {
            external_id: item.id,
            title: title_or_untitled(item.summary.as_deref()),
            description: item.description.unwrap_or_default(),
            start,
            end,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const LIST: &str = r#"{
      "kind": "calendar#events",
      "items": [
        {
          "id": "evt-1",
          "summary": "Standup meeting",
          "description": "Daily sync",
          "start": { "dateTime": "2026-10-12T09:00:00-05:00" },
          "end": { "dateTime": "2026-10-12T09:15:00-05:00" }
        },
        {
          "id": "evt-2",
          "start": { "date": "2026-10-13" },
          "end": { "date": "2026-10-14" }
        },
        {
          "id": "evt-3",
          "status": "cancelled"
        }
      ]
    }"#;

    #[test]
    fn test_parses_list_response() {
        let tz: Tz = "America/Chicago".parse().unwrap();
        let events = parse_google_events_json(LIST, tz).unwrap();
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].external_id.as_deref(), Some("evt-1"));
        assert_eq!(events[0].title, "Standup meeting");
        assert_eq!(events[0].start, Utc.with_ymd_and_hms(2026, 10, 12, 14, 0, 0).unwrap());

        // All-day, CDT midnight is 05:00 UTC.
        assert_eq!(events[1].title, "Untitled Event");
        assert_eq!(events[1].start, Utc.with_ymd_and_hms(2026, 10, 13, 5, 0, 0).unwrap());
        assert_eq!(events[1].description, "");
    }

    #[test]
    fn test_parses_bare_array() {
        let json = r#"[{"summary": "Gym", "start": {"dateTime": "2026-10-12T07:00:00Z"}, "end": {"dateTime": "2026-10-12T08:00:00Z"}}]"#;
        let events = parse_google_events_json(json, Tz::UTC).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].external_id, None);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(parse_google_events_json("{not json", Tz::UTC).is_err());
    }
}
