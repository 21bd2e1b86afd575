//! Temporal classification of pending tasks.
//!
//! Lifecycle state is derived from the scheduled window and a caller-supplied
//! `now`; it is never stored.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::TaskError;
use crate::models::Task;

/// Where a pending task sits relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LifecycleState {
    /// Started and not yet ended.
    Active,
    /// Ended before `now`.
    Overdue,
    /// Starts after `now`.
    Upcoming,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Active => write!(f, "Active"),
            LifecycleState::Overdue => write!(f, "Overdue"),
            LifecycleState::Upcoming => write!(f, "Upcoming"),
        }
    }
}

/// Classifies a pending task.
///
/// # Errors
///
/// Returns [`TaskError::NotPending`] for completed tasks and a validation
/// error if the stored date or times cannot be parsed.
pub fn classify(task: &Task, now: NaiveDateTime) -> Result<LifecycleState, TaskError> {
    if task.is_completed() {
        return Err(TaskError::NotPending {
            id: task.id.clone(),
        });
    }
    let start = task.start_instant()?;
    let end = task.end_instant()?;
    Ok(if start > now {
        LifecycleState::Upcoming
    } else if end < now {
        LifecycleState::Overdue
    } else {
        LifecycleState::Active
    })
}

/// A task collection split by lifecycle, each group in display order.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub overdue: Vec<&'a Task>,
    pub active: Vec<&'a Task>,
    pub upcoming: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
    /// Pending tasks whose schedule could not be parsed.
    pub unscheduled: Vec<&'a Task>,
}

impl<'a> Partition<'a> {
    /// Started tasks: overdue first, then active, each group by priority rank.
    pub fn in_progress(&self) -> Vec<&'a Task> {
        self.overdue.iter().chain(&self.active).copied().collect()
    }

    pub fn pending_count(&self) -> usize {
        self.overdue.len() + self.active.len() + self.upcoming.len() + self.unscheduled.len()
    }
}

/// Splits `tasks` by lifecycle relative to `now`.
///
/// Overdue and active groups are ordered by priority rank, upcoming by start
/// instant, completed by completion time (latest first). Sorting is stable,
/// so ties keep collection order.
pub fn partition(tasks: &[Task], now: NaiveDateTime) -> Partition<'_> {
    let mut parts = Partition::default();
    for task in tasks {
        if task.is_completed() {
            parts.completed.push(task);
            continue;
        }
        match classify(task, now) {
            Ok(LifecycleState::Overdue) => parts.overdue.push(task),
            Ok(LifecycleState::Active) => parts.active.push(task),
            Ok(LifecycleState::Upcoming) => parts.upcoming.push(task),
            Err(e) => {
                tracing::warn!(id = %task.id, error = %e, "Skipping task with unreadable schedule");
                parts.unscheduled.push(task);
            }
        }
    }

    parts.overdue.sort_by_key(|t| t.priority.rank());
    parts.active.sort_by_key(|t| t.priority.rank());
    parts.upcoming.sort_by_key(|t| t.start_instant().ok());
    parts
        .completed
        .sort_by_key(|t| std::cmp::Reverse(t.completed_instant()));
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Priority, Status};

    fn task(id: &str, date: &str, start: &str, end: &str) -> Task {
        Task {
            id: id.into(),
            title: id.into(),
            priority: Priority::Medium,
            category: Category::General,
            status: Status::Pending,
            created_at: "2025-01-01 00:00".into(),
            scheduled_date: date.into(),
            start_time: start.into(),
            end_time: end.into(),
            completed_at: None,
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn window_boundaries() {
        let t = task("a", "2025-06-01", "10:00", "11:00");
        assert_eq!(classify(&t, at(9, 59)).unwrap(), LifecycleState::Upcoming);
        assert_eq!(classify(&t, at(10, 0)).unwrap(), LifecycleState::Active);
        assert_eq!(classify(&t, at(11, 0)).unwrap(), LifecycleState::Active);
        assert_eq!(classify(&t, at(11, 1)).unwrap(), LifecycleState::Overdue);
    }

    #[test]
    fn completed_tasks_are_not_classified() {
        let mut t = task("a", "2025-06-01", "10:00", "11:00");
        t.status = Status::Completed;
        assert!(matches!(
            classify(&t, at(9, 0)),
            Err(TaskError::NotPending { .. })
        ));
    }

    #[test]
    fn unreadable_schedule_is_set_aside() {
        let tasks = vec![task("bad", "someday", "10:00", "11:00")];
        let parts = partition(&tasks, at(9, 0));
        assert_eq!(parts.unscheduled.len(), 1);
        assert_eq!(parts.pending_count(), 1);
    }
}
