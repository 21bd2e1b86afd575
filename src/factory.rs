//! Construction, completion and editing of task records.
//!
//! Every operation validates first and mutates last, so a failed call leaves
//! the task exactly as it was.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::error::{TaskError, ValidationError};
use crate::models::{
    encode_date, encode_time, encode_timestamp, Category, Priority, Status, Task,
};
use crate::parser::ParsedTask;

/// Validated-on-create fields of a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub priority: Priority,
    pub category: Category,
    pub scheduled_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<ParsedTask> for TaskDraft {
    fn from(parsed: ParsedTask) -> Self {
        TaskDraft {
            title: parsed.title,
            priority: parsed.priority,
            category: parsed.category,
            scheduled_date: parsed.scheduled_date,
            start_time: parsed.start_time,
            end_time: parsed.end_time,
        }
    }
}

/// Optional changes applied by [`update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub scheduled_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }
}

fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

fn validate_window(start: NaiveTime, end: NaiveTime) -> Result<(), ValidationError> {
    if end <= start {
        return Err(ValidationError::InvertedWindow { start, end });
    }
    Ok(())
}

/// Builds a new pending task with a fresh identifier.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyTitle`] for a blank title and
/// [`ValidationError::InvertedWindow`] unless `end_time > start_time`.
pub fn create(draft: TaskDraft, now: NaiveDateTime) -> Result<Task, TaskError> {
    let title = validate_title(&draft.title)?;
    validate_window(draft.start_time, draft.end_time)?;

    let task = Task {
        id: Uuid::new_v4().to_string(),
        title,
        priority: draft.priority,
        category: draft.category,
        status: Status::Pending,
        created_at: encode_timestamp(now),
        scheduled_date: encode_date(draft.scheduled_date),
        start_time: encode_time(draft.start_time),
        end_time: encode_time(draft.end_time),
        completed_at: None,
    };
    tracing::debug!(id = %task.id, title = %task.title, "Created task");
    Ok(task)
}

/// Moves a pending task to `Completed`, stamping `completed_at`.
///
/// # Errors
///
/// Returns [`TaskError::AlreadyCompleted`] if the task is already completed.
pub fn complete(task: &mut Task, now: NaiveDateTime) -> Result<(), TaskError> {
    if task.is_completed() {
        return Err(TaskError::AlreadyCompleted {
            id: task.id.clone(),
        });
    }
    task.status = Status::Completed;
    task.completed_at = Some(encode_timestamp(now));
    tracing::debug!(id = %task.id, "Completed task");
    Ok(())
}

/// Applies `patch` to `task` under the same rules as [`create`].
///
/// Unchanged time fields are read from the stored record; if they are
/// malformed and the patch does not replace them, the update is rejected.
pub fn update(task: &mut Task, patch: TaskPatch) -> Result<(), TaskError> {
    let title = patch.title.as_deref().map(validate_title).transpose()?;
    let start = match patch.start_time {
        Some(t) => t,
        None => task.start()?,
    };
    let end = match patch.end_time {
        Some(t) => t,
        None => task.end()?,
    };
    validate_window(start, end)?;

    if let Some(title) = title {
        task.title = title;
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(category) = patch.category {
        task.category = category;
    }
    if let Some(date) = patch.scheduled_date {
        task.scheduled_date = encode_date(date);
    }
    task.start_time = encode_time(start);
    task.end_time = encode_time(end);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    fn draft(title: &str, start: (u32, u32), end: (u32, u32)) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            priority: Priority::High,
            category: Category::Work,
            scheduled_date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        }
    }

    #[test]
    fn create_uses_canonical_encodings() {
        let task = create(draft("  Ship release ", (9, 5), (10, 0)), now()).unwrap();
        assert_eq!(task.title, "Ship release");
        assert_eq!(task.scheduled_date, "2025-03-15");
        assert_eq!(task.start_time, "09:05");
        assert_eq!(task.end_time, "10:00");
        assert_eq!(task.created_at, "2025-03-14 08:30");
        assert_eq!(task.status, Status::Pending);
        assert!(Uuid::parse_str(&task.id).is_ok());
    }

    #[test]
    fn create_assigns_distinct_ids() {
        let a = create(draft("a", (9, 0), (10, 0)), now()).unwrap();
        let b = create(draft("a", (9, 0), (10, 0)), now()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn create_rejects_blank_title() {
        let err = create(draft("   ", (9, 0), (10, 0)), now()).unwrap_err();
        assert_eq!(err, TaskError::Validation(ValidationError::EmptyTitle));
    }

    #[test]
    fn create_rejects_equal_times() {
        let err = create(draft("x", (9, 0), (9, 0)), now()).unwrap_err();
        assert!(matches!(
            err,
            TaskError::Validation(ValidationError::InvertedWindow { .. })
        ));
    }

    #[test]
    fn complete_is_one_way() {
        let mut task = create(draft("x", (9, 0), (10, 0)), now()).unwrap();
        complete(&mut task, now()).unwrap();
        assert!(task.is_completed());
        assert_eq!(task.completed_at.as_deref(), Some("2025-03-14 08:30"));

        let before = task.clone();
        let err = complete(&mut task, now()).unwrap_err();
        assert!(matches!(err, TaskError::AlreadyCompleted { .. }));
        assert_eq!(task, before);
    }

    #[test]
    fn failed_update_leaves_task_untouched() {
        let mut task = create(draft("x", (9, 0), (10, 0)), now()).unwrap();
        let before = task.clone();
        let patch = TaskPatch {
            title: Some("renamed".into()),
            end_time: NaiveTime::from_hms_opt(8, 0, 0),
            ..TaskPatch::default()
        };
        assert!(update(&mut task, patch).is_err());
        assert_eq!(task, before);
    }

    #[test]
    fn update_applies_fields() {
        let mut task = create(draft("x", (9, 0), (10, 0)), now()).unwrap();
        let patch = TaskPatch {
            title: Some("Write tests".into()),
            priority: Some(Priority::Low),
            end_time: NaiveTime::from_hms_opt(12, 15, 0),
            ..TaskPatch::default()
        };
        update(&mut task, patch).unwrap();
        assert_eq!(task.title, "Write tests");
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.end_time, "12:15");
        assert_eq!(task.start_time, "09:00");
    }
}
