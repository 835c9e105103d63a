pub mod google;
pub mod ics;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use cadence_core::time::local_to_utc;

/// All-day events begin at local midnight.
pub(crate) fn all_day_start(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    local_to_utc(date.and_time(NaiveTime::MIN), tz)
}

pub(crate) fn title_or_untitled(title: Option<&str>) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => crate::types::UNTITLED_EVENT.to_string(),
    }
}
