//! Summary statistics over a set of tasks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::category::Category;
use crate::task::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total: u32,
    pub completed: u32,
    /// Points of completed tasks only.
    pub points: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub total_points: u32,
    /// Rounded mean alignment over all tasks, incomplete ones included.
    pub average_alignment: u8,
    /// Rounded percentage of completed tasks.
    pub success_rate: u8,
    /// Sparse: categories with no tasks are absent.
    pub category_stats: BTreeMap<Category, CategoryStats>,
}

/// Fold a task set into a summary. An empty set yields all zeros.
pub fn summarize<'a, I>(tasks: I) -> StatsSummary
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut summary = StatsSummary::default();
    let mut alignment_sum: u64 = 0;

    for task in tasks {
        summary.total_tasks += 1;
        summary.total_points += task.points;
        alignment_sum += u64::from(task.alignment_score);

        let entry = summary.category_stats.entry(task.category).or_default();
        entry.total += 1;

        if task.is_completed {
            summary.completed_tasks += 1;
            entry.completed += 1;
            entry.points += task.points;
        }
    }

    if summary.total_tasks > 0 {
        let total = f64::from(summary.total_tasks);
        summary.average_alignment = (alignment_sum as f64 / total).round() as u8;
        summary.success_rate = (f64::from(summary.completed_tasks) * 100.0 / total).round() as u8;
    }

    summary
}

impl StatsSummary {
    /// Change in points relative to an earlier summary.
    pub fn points_delta(&self, previous: &StatsSummary) -> i64 {
        i64::from(self.total_points) - i64::from(previous.total_points)
    }

    /// Change in success rate (percentage points) relative to an earlier summary.
    pub fn success_rate_delta(&self, previous: &StatsSummary) -> i16 {
        i16::from(self.success_rate) - i16::from(previous.success_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoringPolicy;
    use crate::task::{NewTask, TaskUpdate};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, h, 0, 0).unwrap()
    }

    fn task(id: &str, title: &str, day: u32) -> Task {
        Task::create(id, NewTask::new(title, at(day, 10), at(day, 11)), at(1, 0)).unwrap()
    }

    fn done(mut t: Task, actual: Option<(DateTime<Utc>, DateTime<Utc>)>) -> Task {
        let mut update = TaskUpdate::complete();
        if let Some((s, e)) = actual {
            update = update.with_actual(s, e);
        }
        t.apply_update(update, &ScoringPolicy::default(), at(28, 0)).unwrap();
        t
    }

    #[test]
    fn test_empty_summary_is_zero() {
        let s = summarize(&Vec::<Task>::new());
        assert_eq!(s, StatsSummary::default());
        assert!(s.category_stats.is_empty());
    }

    #[test]
    fn test_summary_counts_and_rounding() {
        let tasks = vec![
            done(task("1", "Meeting", 2), Some((at(2, 10), at(2, 11)))), // 100 / 30
            done(task("2", "Gym", 3), None),                              // 50 / 20
            task("3", "Study", 4),                                        // 0 / 0
        ];

        let s = summarize(&tasks);
        assert_eq!(s.total_tasks, 3);
        assert_eq!(s.completed_tasks, 2);
        assert_eq!(s.total_points, 50);
        assert_eq!(s.average_alignment, 50);
        assert_eq!(s.success_rate, 67);

        assert_eq!(s.category_stats.len(), 3);
        assert_eq!(
            s.category_stats[&Category::Work],
            CategoryStats { total: 1, completed: 1, points: 30 }
        );
        assert_eq!(
            s.category_stats[&Category::Learning],
            CategoryStats { total: 1, completed: 0, points: 0 }
        );
        assert!(!s.category_stats.contains_key(&Category::Personal));
    }

    #[test]
    fn test_incomplete_tasks_pull_average_down() {
        let tasks = vec![
            done(task("1", "Meeting", 2), Some((at(2, 10), at(2, 11)))),
            task("2", "Meeting", 3),
        ];
        let s = summarize(&tasks);
        assert_eq!(s.average_alignment, 50);
        assert_eq!(s.success_rate, 50);
    }

    #[test]
    fn test_deltas() {
        let prev = StatsSummary { total_points: 40, success_rate: 80, ..Default::default() };
        let cur = StatsSummary { total_points: 25, success_rate: 100, ..Default::default() };
        assert_eq!(cur.points_delta(&prev), -15);
        assert_eq!(cur.success_rate_delta(&prev), 20);
    }

    #[test]
    fn test_category_keys_serialize_lowercase() {
        let s = summarize(&[task("1", "Personal admin", 2)]);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["category_stats"]["personal"]["total"], 1);
    }
}
