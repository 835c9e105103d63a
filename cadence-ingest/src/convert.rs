//! Convert imported calendar events into new tasks.
//!
//! Events that would make invalid tasks are reported, not fatal: one bad
//! entry in a calendar export should not abort the whole import.

use cadence_core::{NewTask, categorize_event};
use serde::Serialize;

use crate::types::CalendarEvent;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEvent {
    pub external_id: Option<String>,
    pub title: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPlan {
    pub tasks: Vec<NewTask>,
    pub skipped: Vec<SkippedEvent>,
}

pub fn event_to_new_task(event: &CalendarEvent) -> NewTask {
    let mut task = NewTask::new(event.title.clone(), event.start, event.end)
        .with_category(categorize_event(&event.title));
    if !event.description.trim().is_empty() {
        task = task.with_description(event.description.clone());
    }
    if let Some(id) = &event.external_id {
        task = task.with_external_id(id.clone());
    }
    task
}

pub fn events_to_new_tasks(events: &[CalendarEvent]) -> ImportPlan {
    let mut plan = ImportPlan::default();

    for event in events {
        let task = event_to_new_task(event);
        match task.validate() {
            Ok(()) => plan.tasks.push(task),
            Err(e) => plan.skipped.push(SkippedEvent {
                external_id: event.external_id.clone(),
                title: event.title.clone(),
                reason: e.to_string(),
            }),
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::Category;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 12, h, 0, 0).unwrap()
    }

    fn event(id: &str, title: &str, start: u32, end: u32) -> CalendarEvent {
        CalendarEvent {
            external_id: Some(id.to_string()),
            title: title.to_string(),
            description: String::new(),
            start: at(start),
            end: at(end),
        }
    }

    #[test]
    fn test_categorizes_and_keeps_ids() {
        let plan = events_to_new_tasks(&[event("e1", "Gym", 7, 8), event("e2", "Learn Rust", 9, 11)]);
        assert!(plan.skipped.is_empty());
        assert_eq!(plan.tasks[0].category, Some(Category::Health));
        assert_eq!(plan.tasks[1].category, Some(Category::Learning));
        assert_eq!(plan.tasks[1].external_id.as_deref(), Some("e2"));
        assert_eq!(plan.tasks[0].description, None);
    }

    #[test]
    fn test_invalid_interval_is_skipped() {
        let plan = events_to_new_tasks(&[event("e1", "Broken", 9, 9), event("e2", "Fine", 9, 10)]);
        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].external_id.as_deref(), Some("e1"));
        assert!(plan.skipped[0].reason.contains("invalid interval"));
    }
}
