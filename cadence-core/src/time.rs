//! Time utilities: timezone-aware conversion of local wall-clock times.

use anyhow::Result;
use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse an IANA timezone name like "America/Chicago".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Parse a local time like "2026-02-20 23:59" in an IANA tz, returning UTC.
pub fn parse_local_datetime_to_utc(local: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let ndt = NaiveDateTime::parse_from_str(local.trim(), "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))?;

    Ok(local_to_utc(ndt, tz))
}

/// Resolve a local wall-clock time to UTC.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// DST gap are read with the offset in force before the gap, which lands on
/// the first valid instant after it.
pub fn local_to_utc(ndt: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&ndt) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let before = tz
                .offset_from_local_datetime(&(ndt - Duration::hours(3)))
                .earliest()
                .map(|o| o.fix().local_minus_utc())
                .unwrap_or(0);
            Utc.from_utc_datetime(&(ndt - Duration::seconds(i64::from(before))))
        }
    }
}
