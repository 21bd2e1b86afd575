//! Built-in task templates and their expansion into tasks.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{TaskError, ValidationError};
use crate::factory::{self, TaskDraft};
use crate::models::{Category, Priority, Task, Template};

fn template(name: &str, tasks: &[&str], category: Category, priority: Priority, hours: f64) -> Template {
    Template {
        name: name.to_string(),
        tasks: tasks.iter().map(|t| t.to_string()).collect(),
        category,
        priority,
        duration_hours: hours,
    }
}

/// Templates available when none have been saved.
pub fn default_templates() -> Vec<Template> {
    vec![
        template(
            "Morning Routine",
            &["Exercise", "Healthy breakfast", "Plan the day"],
            Category::Health,
            Priority::Medium,
            0.5,
        ),
        template(
            "Weekly Review",
            &["Review completed tasks", "Plan next week", "Update goals"],
            Category::Personal,
            Priority::Medium,
            1.0,
        ),
        template(
            "Project Kickoff",
            &["Define scope", "Assign roles", "Set milestones", "Schedule meetings"],
            Category::Work,
            Priority::High,
            1.0,
        ),
        template(
            "Study Session",
            &["Review materials", "Practice exercises", "Take notes"],
            Category::Learning,
            Priority::Medium,
            1.5,
        ),
    ]
}

/// Finds a template by name, ignoring case.
pub fn find<'a>(templates: &'a [Template], name: &str) -> Result<&'a Template, TaskError> {
    templates
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| TaskError::UnknownTemplate(name.to_string()))
}

/// Creates one task per template entry on `date`, back to back from `now`.
///
/// Task `i` starts at `now + i * duration`, with `now` cut to the minute and
/// the duration rounded to whole minutes. Either every task is created or
/// none is: a slot that fails validation, such as one running past midnight,
/// fails the whole expansion.
pub fn expand(template: &Template, date: NaiveDate, now: NaiveDateTime) -> Result<Vec<Task>, TaskError> {
    let hours = template.duration_hours;
    let minutes = (hours * 60.0).round();
    if !minutes.is_finite() || minutes < 1.0 {
        return Err(ValidationError::InvalidDuration(hours).into());
    }
    // Slots are whole minutes so stored HH:MM windows stay non-empty.
    let slot = Duration::minutes(minutes as i64);

    let mut created = Vec::with_capacity(template.tasks.len());
    let mut start = now
        .time()
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now.time());
    for title in &template.tasks {
        let (end, wrapped) = start.overflowing_add_signed(slot);
        if wrapped != 0 {
            return Err(ValidationError::InvertedWindow { start, end }.into());
        }
        let draft = TaskDraft {
            title: title.clone(),
            priority: template.priority,
            category: template.category,
            scheduled_date: date,
            start_time: start,
            end_time: end,
        };
        created.push(factory::create(draft, now)?);
        start = end;
    }
    tracing::info!(template = %template.name, count = created.len(), "Expanded template");
    Ok(created)
}
