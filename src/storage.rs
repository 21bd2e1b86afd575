use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Task, Template};
use crate::templates::default_templates;

/// Version written into export bundles.
pub const EXPORT_VERSION: &str = "2.0";

/// Returns the path to the tasks database file (`tasks.json`).
///
/// The path is determined in the following order:
/// 1. `TUSK_DB` environment variable.
/// 2. `~/.local/share/tusk/tasks.json` (on Linux).
/// 3. `./tasks.json` (fallback).
pub fn db_path() -> PathBuf {
    std::env::var("TUSK_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("tusk");
        if !p.exists() {
            let _ = fs::create_dir_all(&p);
        }
        p.push("tasks.json");
        p
    })
}

/// Returns the path to the templates file (`templates.json`).
///
/// Located in the same directory as the tasks database.
pub fn templates_path() -> PathBuf {
    let mut p = db_path();
    p.pop();
    p.push("templates.json");
    p
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut f = OpenOptions::new().read(true).open(path)?;
    let mut s = String::new();
    f.read_to_string(&mut s)?;
    Ok(Some(serde_json::from_str(&s)?))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Loads all tasks from the storage file.
///
/// Returns an empty vector if the file does not exist or cannot be read.
pub fn load_tasks() -> Vec<Task> {
    let path = db_path();
    match read_json(&path) {
        Ok(tasks) => tasks.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not read tasks, starting empty");
            Vec::new()
        }
    }
}

/// Saves the given list of tasks to the storage file.
///
/// Overwrites the existing file.
pub fn save_tasks(tasks: &[Task]) -> Result<()> {
    write_json(&db_path(), tasks)
}

/// Loads all templates, falling back to the built-in set when none are saved
/// or the file is unreadable.
pub fn load_templates() -> Vec<Template> {
    let path = templates_path();
    match read_json(&path) {
        Ok(Some(templates)) => templates,
        Ok(None) => default_templates(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not read templates, using defaults");
            default_templates()
        }
    }
}

/// Saves the given list of templates to the storage file.
pub fn save_templates(templates: &[Template]) -> Result<()> {
    write_json(&templates_path(), templates)
}

/// Deletes the tasks and templates files.
pub fn delete_database() -> Result<()> {
    for path in [db_path(), templates_path()] {
        if path.exists() {
            fs::remove_file(path)?;
        }
    }
    Ok(())
}

/// A portable snapshot of the task collection.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExportBundle {
    pub tasks: Vec<Task>,
    pub export_date: String,
    pub version: String,
}

impl ExportBundle {
    pub fn new(tasks: Vec<Task>, now: NaiveDateTime) -> Self {
        ExportBundle {
            tasks,
            export_date: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
            version: EXPORT_VERSION.to_string(),
        }
    }
}

/// Writes an export bundle to `path`.
pub fn export_to(path: &Path, tasks: &[Task], now: NaiveDateTime) -> Result<()> {
    write_json(path, &ExportBundle::new(tasks.to_vec(), now))
}

/// Reads the tasks of an export bundle at `path`.
///
/// # Errors
///
/// Returns [`Error::InvalidBundle`] when the document has no `tasks` array.
pub fn import_from(path: &Path) -> Result<Vec<Task>> {
    let value: serde_json::Value = read_json(path)?
        .ok_or_else(|| Error::NotFound(format!("import file {}", path.display())))?;
    let tasks = match value.get("tasks") {
        Some(tasks) if tasks.is_array() => tasks.clone(),
        _ => return Err(Error::InvalidBundle("expected an object with a 'tasks' array".into())),
    };
    Ok(serde_json::from_value(tasks)?)
}
