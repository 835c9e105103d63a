//! Reporting periods: ISO weeks (Monday first) and calendar months.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::time::local_to_utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Week,
    Month,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(format!("unknown period: {other} (expected week or month)")),
        }
    }
}

/// Local wall-clock boundaries of one period, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodBounds {
    pub period: Period,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A UTC query range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl UtcRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

impl PeriodBounds {
    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end.date()
    }

    pub fn to_utc(&self, tz: Tz) -> UtcRange {
        UtcRange {
            start: local_to_utc(self.start, tz),
            end: local_to_utc(self.end, tz),
        }
    }

    /// Short chart label: "Week D/M" from the start date, or "Mon YYYY".
    pub fn label(&self) -> String {
        let first = self.first_day();
        match self.period {
            Period::Week => format!("Week {}/{}", first.day(), first.month()),
            Period::Month => first.format("%b %Y").to_string(),
        }
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("23:59:59.999 is a valid time")
}

/// Bounds of the week or month containing `reference`.
pub fn period_bounds(period: Period, reference: NaiveDate) -> PeriodBounds {
    let (first, last) = match period {
        Period::Week => {
            let monday = reference - Duration::days(i64::from(reference.weekday().num_days_from_monday()));
            (monday, monday + Duration::days(6))
        }
        Period::Month => {
            let first = reference - Duration::days(i64::from(reference.day0()));
            let last = first
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .unwrap_or(NaiveDate::MAX);
            (first, last)
        }
    };

    PeriodBounds {
        period,
        start: first.and_time(NaiveTime::MIN),
        end: last.and_time(end_of_day()),
    }
}

/// Shift a date back by `n` periods.
///
/// Months follow calendar arithmetic and clamp the day to the last valid
/// day of the target month (Mar 31 minus one month is Feb 28 or 29).
pub fn shift_back(period: Period, date: NaiveDate, n: u32) -> NaiveDate {
    match period {
        Period::Week => date - Duration::weeks(i64::from(n)),
        Period::Month => date
            .checked_sub_months(Months::new(n))
            .unwrap_or(NaiveDate::MIN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike, Weekday};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_week_bounds_monday_to_sunday() {
        // 2026-10-16 is a Friday.
        for reference in [d(2026, 10, 12), d(2026, 10, 16), d(2026, 10, 18)] {
            let b = period_bounds(Period::Week, reference);
            assert_eq!(b.first_day(), d(2026, 10, 12));
            assert_eq!(b.last_day(), d(2026, 10, 18));
            assert_eq!(b.first_day().weekday(), Weekday::Mon);
            assert_eq!(b.last_day().weekday(), Weekday::Sun);
            assert_eq!(b.start.time(), NaiveTime::MIN);
            assert_eq!((b.end.hour(), b.end.minute(), b.end.second()), (23, 59, 59));
        }
    }

    #[test]
    fn test_week_crossing_year() {
        let b = period_bounds(Period::Week, d(2027, 1, 1));
        assert_eq!(b.first_day(), d(2026, 12, 28));
        assert_eq!(b.last_day(), d(2027, 1, 3));
    }

    #[test]
    fn test_month_bounds_cover_month_lengths() {
        let cases = [
            (d(2026, 2, 14), d(2026, 2, 28)),
            (d(2028, 2, 1), d(2028, 2, 29)),
            (d(2026, 4, 30), d(2026, 4, 30)),
            (d(2026, 12, 31), d(2026, 12, 31)),
        ];
        for (reference, last) in cases {
            let b = period_bounds(Period::Month, reference);
            assert_eq!(b.first_day(), d(reference.year(), reference.month(), 1));
            assert_eq!(b.last_day(), last);
        }
    }

    #[test]
    fn test_shift_back_clamps_month_end() {
        assert_eq!(shift_back(Period::Month, d(2026, 3, 31), 1), d(2026, 2, 28));
        assert_eq!(shift_back(Period::Month, d(2028, 3, 31), 1), d(2028, 2, 29));
        assert_eq!(shift_back(Period::Month, d(2026, 1, 15), 1), d(2025, 12, 15));
        assert_eq!(shift_back(Period::Week, d(2026, 1, 2), 1), d(2025, 12, 26));
        assert_eq!(shift_back(Period::Week, d(2026, 1, 2), 0), d(2026, 1, 2));
    }

    #[test]
    fn test_labels() {
        assert_eq!(period_bounds(Period::Week, d(2026, 10, 16)).label(), "Week 12/10");
        assert_eq!(period_bounds(Period::Month, d(2026, 10, 16)).label(), "Oct 2026");
    }

    #[test]
    fn test_to_utc_respects_timezone() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let range = period_bounds(Period::Week, d(2026, 10, 16)).to_utc(tz);
        // EDT is UTC-4.
        assert_eq!(range.start.to_rfc3339(), "2026-10-12T04:00:00+00:00");
        assert!(range.contains(range.end));
        assert!(!range.contains(range.end + Duration::milliseconds(1)));
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("Week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("month".parse::<Period>().unwrap(), Period::Month);
        assert!("year".parse::<Period>().is_err());
    }
}
