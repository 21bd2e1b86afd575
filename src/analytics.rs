//! Aggregate statistics over a task collection.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Category, Priority, Task};

const SECONDS_PER_DAY: i64 = 86_400;

/// Statistics recomputed from a non-empty task collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub total: usize,
    pub completed: usize,
    /// Percentage of completed tasks, rounded to one decimal.
    pub completion_rate: f64,
    /// Counts over all tasks, pending and completed.
    pub by_priority: BTreeMap<Priority, usize>,
    pub by_category: BTreeMap<Category, usize>,
    /// Mean window length of completed tasks in hours, rounded to one decimal.
    pub avg_duration_hours: f64,
}

impl AnalyticsSnapshot {
    pub fn pending(&self) -> usize {
        self.total - self.completed
    }

    pub fn priority_count(&self, priority: Priority) -> usize {
        self.by_priority.get(&priority).copied().unwrap_or(0)
    }

    pub fn category_count(&self, category: Category) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}

/// Summarises `tasks`. Returns `None` for an empty collection.
pub fn aggregate(tasks: &[Task]) -> Option<AnalyticsSnapshot> {
    if tasks.is_empty() {
        return None;
    }

    let total = tasks.len();
    let completed: Vec<&Task> = tasks.iter().filter(|t| t.is_completed()).collect();

    let mut by_priority = BTreeMap::new();
    let mut by_category = BTreeMap::new();
    for task in tasks {
        *by_priority.entry(task.priority).or_insert(0) += 1;
        *by_category.entry(task.category).or_insert(0) += 1;
    }

    let durations: Vec<f64> = completed.iter().filter_map(|t| duration_hours(t)).collect();
    let avg_duration_hours = if durations.is_empty() {
        0.0
    } else {
        round1(durations.iter().sum::<f64>() / durations.len() as f64)
    };

    Some(AnalyticsSnapshot {
        total,
        completed: completed.len(),
        completion_rate: round1(100.0 * completed.len() as f64 / total as f64),
        by_priority,
        by_category,
        avg_duration_hours,
    })
}

/// Time-of-day length of a task window in hours.
///
/// The date is ignored, so a window whose end is before its start wraps
/// around midnight: 23:00 to 01:00 counts as two hours. `None` when either
/// time is unreadable.
pub fn duration_hours(task: &Task) -> Option<f64> {
    let start = task.start().ok()?;
    let end = task.end().ok()?;
    let seconds = (end - start).num_seconds().rem_euclid(SECONDS_PER_DAY);
    Some(seconds as f64 / 3600.0)
}

/// One decimal, exact halves to even.
fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
