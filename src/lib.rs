//! # Tusk
//!
//! A task manager whose core turns quick-add text into scheduled tasks and
//! sorts pending work by where it sits in time.
//!
//! The core is pure: it holds no state, performs no I/O and never reads the
//! clock. Callers pass in the task collection and the current instant.
//!
//! ```
//! use chrono::NaiveDate;
//! use tusk::{factory, parser, lifecycle};
//!
//! let now = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let parsed = parser::extract("urgent call client tomorrow 3pm for 2 hours", now);
//! assert_eq!(parsed.title, "call client");
//!
//! let task = factory::create(parsed.into(), now).unwrap();
//! assert_eq!(task.start_time, "15:00");
//! assert_eq!(
//!     lifecycle::classify(&task, now).unwrap(),
//!     lifecycle::LifecycleState::Upcoming
//! );
//! ```
//!
//! Around the core sit a JSON store ([`storage`]), CLI command handlers
//! ([`commands`]) and an interactive terminal dashboard ([`tui`]).

pub mod analytics;
pub mod error;
pub mod factory;
pub mod lifecycle;
pub mod models;
pub mod parser;
pub mod rules;
pub mod search;
pub mod templates;

pub mod commands;
pub mod logging;
pub mod storage;
pub mod tui;

pub use error::{Error, Result, TaskError, ValidationError};
pub use models::{Category, Priority, Status, Task, Template};
