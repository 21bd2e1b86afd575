use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::rules;

/// Canonical encoding of a scheduled date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Canonical encoding of a time of day.
pub const TIME_FORMAT: &str = "%H:%M";
/// Canonical encoding of creation and completion timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Task priority.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Resolves a stored value, falling back to Medium when absent or unknown.
    pub fn resolve(value: Option<&str>) -> Priority {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn rank(self) -> u8 {
        rules::priority_rank(self)
    }

    pub fn icon(self) -> &'static str {
        rules::priority_icon(self)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!("unknown priority '{}', expected high, medium or low", s)),
        }
    }
}

/// Task category.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Category {
    #[default]
    General,
    Work,
    Personal,
    Health,
    Learning,
    Finance,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::General,
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Learning,
        Category::Finance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Health => "Health",
            Category::Learning => "Learning",
            Category::Finance => "Finance",
        }
    }

    /// Resolves a stored value, falling back to General when absent or unknown.
    pub fn resolve(value: Option<&str>) -> Category {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn color(self) -> (u8, u8, u8) {
        rules::category_color(self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Completion status. `Completed` is terminal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Completed,
}

fn lenient_priority<'de, D: Deserializer<'de>>(d: D) -> Result<Priority, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(Priority::resolve(raw.as_deref()))
}

fn lenient_category<'de, D: Deserializer<'de>>(d: D) -> Result<Category, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(Category::resolve(raw.as_deref()))
}

/// A single scheduled task.
///
/// Date and time fields hold their canonical string encodings so records
/// round-trip through storage unchanged. Use the accessors to get typed values.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier, assigned once at creation.
    pub id: String,
    /// Cleaned task title.
    #[serde(alias = "task")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Category,
    #[serde(default)]
    pub status: Status,
    /// Creation timestamp (`YYYY-MM-DD HH:MM`).
    #[serde(default, alias = "added_at")]
    pub created_at: String,
    /// Scheduled day (`YYYY-MM-DD`).
    #[serde(default)]
    pub scheduled_date: String,
    /// Start of the window (`HH:MM`).
    #[serde(default)]
    pub start_time: String,
    /// End of the window (`HH:MM`).
    #[serde(default)]
    pub end_time: String,
    /// Timestamp of the transition to `Completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    pub fn date(&self) -> Result<NaiveDate, ValidationError> {
        parse_date(&self.scheduled_date)
    }

    pub fn start(&self) -> Result<NaiveTime, ValidationError> {
        parse_time(&self.start_time)
    }

    pub fn end(&self) -> Result<NaiveTime, ValidationError> {
        parse_time(&self.end_time)
    }

    /// Scheduled date combined with the start time.
    pub fn start_instant(&self) -> Result<NaiveDateTime, ValidationError> {
        Ok(self.date()?.and_time(self.start()?))
    }

    /// Scheduled date combined with the end time.
    pub fn end_instant(&self) -> Result<NaiveDateTime, ValidationError> {
        Ok(self.date()?.and_time(self.end()?))
    }

    pub fn completed_instant(&self) -> Option<NaiveDateTime> {
        self.completed_at
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok())
    }
}

/// A reusable group of task titles sharing priority, category and duration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Template {
    /// The unique name of the template.
    pub name: String,
    /// Titles of the tasks created from this template, in order.
    pub tasks: Vec<String>,
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Category,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Priority,
    /// Length of each created task in hours.
    #[serde(alias = "duration")]
    pub duration_hours: f64,
}

pub fn encode_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn encode_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub fn encode_timestamp(instant: NaiveDateTime) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::MalformedDate(value.to_string()))
}

pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| ValidationError::MalformedTime(value.to_string()))
}
