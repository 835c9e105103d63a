//! iCalendar (.ics) text parser.
//!
//! Only the VEVENT properties needed for task import are read:
//! UID, SUMMARY, DESCRIPTION, DTSTART, DTEND. Supported stamps:
//!   DTSTART:20261012T090000Z                 (UTC)
//!   DTSTART;TZID=Europe/Berlin:20261012T090000
//!   DTSTART:20261012T090000                  (floating, read in `tz`)
//!   DTSTART;VALUE=DATE:20261012              (all-day)

use anyhow::{Result, bail};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;
use tracing::warn;

use super::{all_day_start, title_or_untitled};
use crate::types::CalendarEvent;
use cadence_core::time::local_to_utc;

#[derive(Debug, Default)]
struct PendingEvent {
    uid: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    all_day: bool,
}

/// RFC 5545 line unfolding: a line starting with a space or tab continues the previous one.
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        let raw = raw.trim_end_matches('\r');
        if let Some(rest) = raw.strip_prefix(' ').or_else(|| raw.strip_prefix('\t')) {
            if let Some(last) = lines.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        lines.push(raw.to_string());
    }
    lines
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn param<'a>(params: &'a str, name: &str) -> Option<&'a str> {
    params
        .split(';')
        .filter_map(|p| p.split_once('='))
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.trim_matches('"'))
}

/// Parse a DTSTART/DTEND value. Returns the instant and whether it was a date-only stamp.
fn parse_stamp(params: &str, value: &str, tz: Tz) -> Result<(DateTime<Utc>, bool)> {
    let value = value.trim();

    if value.len() == 8 || param(params, "VALUE").is_some_and(|v| v.eq_ignore_ascii_case("DATE")) {
        let date = NaiveDate::parse_from_str(value, "%Y%m%d")
            .map_err(|e| anyhow::anyhow!("invalid date '{value}': {e}"))?;
        return Ok((all_day_start(date, tz), true));
    }

    if let Some(utc) = value.strip_suffix('Z') {
        let ndt = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S")
            .map_err(|e| anyhow::anyhow!("invalid UTC stamp '{value}': {e}"))?;
        return Ok((ndt.and_utc(), false));
    }

    let ndt = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .map_err(|e| anyhow::anyhow!("invalid local stamp '{value}': {e}"))?;
    let zone = match param(params, "TZID") {
        Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(target: "cadence::ingest", tzid = name, "unknown TZID, using default timezone");
            tz
        }),
        None => tz,
    };
    Ok((local_to_utc(ndt, zone), false))
}

pub fn parse_ics(text: &str, tz: Tz) -> Result<Vec<CalendarEvent>> {
    // NAME;PARAMS:VALUE
    let prop_re = Regex::new(r"^(?P<name>[A-Za-z0-9-]+)(?P<params>(?:;[^:]*)?):(?P<value>.*)$")?;

    let mut out = Vec::new();
    let mut current: Option<PendingEvent> = None;
    // Depth of sub-components (VALARM, ...) inside the current VEVENT.
    let mut nested: u32 = 0;
    let mut saw_calendar = false;

    for line in unfold(text) {
        let Some(caps) = prop_re.captures(&line) else {
            continue;
        };
        let name = caps["name"].to_ascii_uppercase();
        let params = caps["params"].trim_start_matches(';');
        let value = &caps["value"];

        match name.as_str() {
            "BEGIN" if value.eq_ignore_ascii_case("VCALENDAR") => saw_calendar = true,
            "BEGIN" if value.eq_ignore_ascii_case("VEVENT") => {
                current = Some(PendingEvent::default());
                nested = 0;
            }
            "BEGIN" if current.is_some() => nested += 1,
            "END" if nested > 0 => nested -= 1,
            "END" if value.eq_ignore_ascii_case("VEVENT") => {
                if let Some(event) = current.take().and_then(finish) {
                    out.push(event);
                }
            }
            _ if nested > 0 => {}
            _ => {
                if let Some(ev) = current.as_mut() {
                    apply_property(ev, &name, params, value, tz)?;
                }
            }
        }
    }

    if !saw_calendar {
        bail!("not an iCalendar document (missing BEGIN:VCALENDAR)");
    }

    Ok(out)
}

fn apply_property(ev: &mut PendingEvent, name: &str, params: &str, value: &str, tz: Tz) -> Result<()> {
    match name {
        "UID" => ev.uid = Some(value.trim().to_string()),
        "SUMMARY" => ev.summary = Some(unescape(value)),
        "DESCRIPTION" => ev.description = Some(unescape(value)),
        "DTSTART" => {
            let (start, all_day) = parse_stamp(params, value, tz)?;
            ev.start = Some(start);
            ev.all_day = all_day;
        }
        "DTEND" => ev.end = Some(parse_stamp(params, value, tz)?.0),
        _ => {}
    }
    Ok(())
}

fn finish(ev: PendingEvent) -> Option<CalendarEvent> {
    let Some(start) = ev.start else {
        warn!(target: "cadence::ingest", uid = ev.uid.as_deref().unwrap_or("-"), "skipping VEVENT without DTSTART");
        return None;
    };
    // A date-only event without DTEND lasts one day.
    let end = match ev.end {
        Some(end) => end,
        None if ev.all_day => start + Duration::days(1),
        None => {
            warn!(target: "cadence::ingest", uid = ev.uid.as_deref().unwrap_or("-"), "skipping VEVENT without DTEND");
            return None;
        }
    };

    Some(CalendarEvent {
        external_id: ev.uid,
        title: title_or_untitled(ev.summary.as_deref()),
        description: ev.description.unwrap_or_default(),
        start,
        end,
    })
}
