//! Rendering of stats reports: terminal text and CSV trend export.

use anyhow::{Context, Result};
use cadence_core::{StatsReport, StatsSummary};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct TrendRow<'a> {
    label: &'a str,
    start_date: String,
    total_tasks: u32,
    completed_tasks: u32,
    total_points: u32,
    average_alignment: u8,
    success_rate: u8,
}

pub fn write_trend_csv(path: &Path, report: &StatsReport) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for bucket in &report.historical {
        wtr.serialize(TrendRow {
            label: &bucket.label,
            start_date: bucket.date.format("%Y-%m-%d").to_string(),
            total_tasks: bucket.summary.total_tasks,
            completed_tasks: bucket.summary.completed_tasks,
            total_points: bucket.summary.total_points,
            average_alignment: bucket.summary.average_alignment,
            success_rate: bucket.summary.success_rate,
        })?;
    }
    wtr.flush().with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn signed(delta: i64) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

pub fn render_report(report: &StatsReport) -> String {
    let cur = &report.current.summary;
    let prev = &report.previous.summary;
    let mut s = String::new();

    s.push_str(&format!(
        "# {} stats: {} .. {}\n\n",
        report.current.period,
        report.current.start.format("%Y-%m-%d %H:%M UTC"),
        report.current.end.format("%Y-%m-%d %H:%M UTC"),
    ));

    s.push_str(&format!("{:<18}{:>10}{:>10}{:>8}\n", "", "current", "previous", "delta"));
    let diff = |c: i64, p: i64| (c, p, c - p);
    let rows: [(&str, (i64, i64, i64)); 5] = [
        ("tasks", diff(cur.total_tasks.into(), prev.total_tasks.into())),
        ("completed", diff(cur.completed_tasks.into(), prev.completed_tasks.into())),
        ("points", (cur.total_points.into(), prev.total_points.into(), cur.points_delta(prev))),
        ("avg alignment", diff(cur.average_alignment.into(), prev.average_alignment.into())),
        (
            "success rate %",
            (cur.success_rate.into(), prev.success_rate.into(), cur.success_rate_delta(prev).into()),
        ),
    ];
    for (name, (c, p, delta)) in rows {
        s.push_str(&format!("{:<18}{:>10}{:>10}{:>8}\n", name, c, p, signed(delta)));
    }

    s.push_str("\n## Categories\n\n");
    s.push_str(&render_categories(cur));

    s.push_str("\n## Trend\n\n");
    for bucket in &report.historical {
        let b = &bucket.summary;
        s.push_str(&format!(
            "{:<14} tasks={:<3} done={:<3} points={:<4} align={:<3} success={}%\n",
            bucket.label, b.total_tasks, b.completed_tasks, b.total_points, b.average_alignment, b.success_rate
        ));
    }

    s
}

fn render_categories(summary: &StatsSummary) -> String {
    if summary.category_stats.is_empty() {
        return "(no tasks)\n".to_string();
    }
    let mut s = String::new();
    for (category, stats) in &summary.category_stats {
        s.push_str(&format!(
            "- {:<10} {} {}/{} done, {} pts\n",
            category.label(),
            category.color(),
            stats.completed,
            stats.total,
            stats.points
        ));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{NewTask, Period, ScoringPolicy, TaskStore, TaskUpdate, build_stats_report};
    use chrono::{NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;

    fn report() -> StatsReport {
        let start = Utc.with_ymd_and_hms(2026, 10, 13, 9, 0, 0).unwrap();
        let mut store = TaskStore::new();
        store
            .create(NewTask::new("Gym", start, start + chrono::Duration::hours(1)), start)
            .unwrap();
        store.update("1", TaskUpdate::complete(), &ScoringPolicy::default(), start).unwrap();

        let reference = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        build_stats_report(Period::Week, reference, Tz::UTC, &store).unwrap()
    }

    #[test]
    fn test_render_includes_deltas_and_trend() {
        let text = render_report(&report());
        assert!(text.starts_with("# week stats: 2026-10-12 00:00 UTC"));
        assert!(text.contains("points"));
        assert!(text.contains("+20"));
        assert!(text.contains("- Health     #4CAF50 1/1 done, 20 pts"));
        assert!(text.contains("success rate %           100         0    +100"));
        assert!(text.contains("Week 12/10"));
        assert_eq!(text.matches("tasks=").count(), 12);
    }

    #[test]
    fn test_trend_csv_has_header_and_twelve_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trend.csv");
        write_trend_csv(&path, &report()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(
            lines[0],
            "label,start_date,total_tasks,completed_tasks,total_points,average_alignment,success_rate"
        );
        assert_eq!(lines[12], "Week 12/10,2026-10-12,1,1,20,50,100");
    }
}
