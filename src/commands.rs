use std::io::{self, Write};
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::analytics::aggregate;
use crate::error::{Error, Result};
use crate::factory::{self, TaskDraft, TaskPatch};
use crate::lifecycle::{partition, LifecycleState};
use crate::models::{parse_date, parse_time, Category, Priority, Task, Template};
use crate::parser::{extract, fit_window};
use crate::search::search;
use crate::storage::{
    delete_database, export_to, import_from, load_tasks, load_templates, save_tasks, save_templates,
};
use crate::templates;

/// Length of the id prefix shown in tables.
const SHORT_ID: usize = 8;

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Finds the index of the task whose id starts with `prefix`.
///
/// The prefix must match exactly one task.
pub fn find_task(tasks: &[Task], prefix: &str) -> Result<usize> {
    let prefix = prefix.trim();
    let matches: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| !prefix.is_empty() && t.id.starts_with(prefix))
        .map(|(i, _)| i)
        .collect();
    match matches.as_slice() {
        [i] => Ok(*i),
        [] => Err(Error::NotFound(format!("task '{}'", prefix))),
        _ => Err(Error::NotFound(format!("unique task for prefix '{}'", prefix))),
    }
}

fn short_id(task: &Task) -> &str {
    task.id.get(..SHORT_ID).unwrap_or(&task.id)
}

/// Adds a task from free text.
///
/// The text goes through the quick-add extractor; any explicit option
/// overrides what was extracted. When only a start time is given the task
/// lasts one hour. Returns the new task's id.
pub fn cmd_add(
    text: String,
    priority: Option<Priority>,
    category: Option<Category>,
    date: Option<String>,
    start: Option<String>,
    end: Option<String>,
    silent: bool,
) -> Option<String> {
    let now = now();
    let mut draft = TaskDraft::from(extract(&text, now));
    if let Some(p) = priority {
        draft.priority = p;
    }
    if let Some(c) = category {
        draft.category = c;
    }

    let overrides = (|| -> Result<()> {
        if let Some(d) = &date {
            draft.scheduled_date = parse_date(d)?;
        }
        if let Some(s) = &start {
            let (s, e) = fit_window(parse_time(s)?, 1);
            draft.start_time = s;
            draft.end_time = e;
        }
        if let Some(e) = &end {
            draft.end_time = parse_time(e)?;
        }
        Ok(())
    })();
    if let Err(e) = overrides {
        if !silent { eprintln!("{}", e); }
        return None;
    }

    let task = match factory::create(draft, now) {
        Ok(t) => t,
        Err(e) => {
            if !silent { eprintln!("Could not add task: {}", e); }
            return None;
        }
    };

    let mut tasks = load_tasks();
    let id = task.id.clone();
    if !silent {
        println!(
            "Task added (id = {}): {} {} [{}] {} {}-{}",
            short_id(&task),
            task.priority.icon(),
            task.title,
            task.category,
            task.scheduled_date,
            task.start_time,
            task.end_time
        );
    }
    tasks.push(task);
    if let Err(e) = save_tasks(&tasks) {
        if !silent { eprintln!("Failed to save tasks: {}", e); }
        return None;
    }
    Some(id)
}

/// Marks a task as complete by id prefix.
///
/// Returns whether the completion was saved.
pub fn cmd_complete(id: &str, silent: bool) -> bool {
    let mut tasks = load_tasks();
    let idx = match find_task(&tasks, id) {
        Ok(i) => i,
        Err(e) => {
            if !silent { eprintln!("{}", e); }
            return false;
        }
    };
    if let Err(e) = factory::complete(&mut tasks[idx], now()) {
        if !silent { eprintln!("{}", e); }
        return false;
    }
    if let Err(e) = save_tasks(&tasks) {
        if !silent { eprintln!("Failed to save tasks: {}", e); }
        return false;
    }
    if !silent {
        println!("Task '{}' marked as complete.", tasks[idx].title);
    }
    true
}

/// Removes a task from the database by id prefix.
pub fn cmd_remove(id: &str, silent: bool) {
    let mut tasks = load_tasks();
    let idx = match find_task(&tasks, id) {
        Ok(i) => i,
        Err(e) => {
            if !silent { eprintln!("{}", e); }
            return;
        }
    };
    let removed = tasks.remove(idx);
    if let Err(e) = save_tasks(&tasks) {
        if !silent { eprintln!("Failed to save tasks: {}", e); }
    } else if !silent {
        println!("Task '{}' removed.", removed.title);
    }
}

/// Edits an existing task's details.
#[allow(clippy::too_many_arguments)]
pub fn cmd_edit(
    id: &str,
    title: Option<String>,
    priority: Option<Priority>,
    category: Option<Category>,
    date: Option<String>,
    start: Option<String>,
    end: Option<String>,
    silent: bool,
) {
    let mut tasks = load_tasks();
    let idx = match find_task(&tasks, id) {
        Ok(i) => i,
        Err(e) => {
            if !silent { eprintln!("{}", e); }
            return;
        }
    };

    let patch = (|| -> Result<TaskPatch> {
        Ok(TaskPatch {
            title,
            priority,
            category,
            scheduled_date: date.as_deref().map(parse_date).transpose()?,
            start_time: start.as_deref().map(parse_time).transpose()?,
            end_time: end.as_deref().map(parse_time).transpose()?,
        })
    })();
    let patch = match patch {
        Ok(p) if p.is_empty() => {
            if !silent { println!("Nothing to change."); }
            return;
        }
        Ok(p) => p,
        Err(e) => {
            if !silent { eprintln!("{}", e); }
            return;
        }
    };

    if let Err(e) = factory::update(&mut tasks[idx], patch) {
        if !silent { eprintln!("Could not update task: {}", e); }
        return;
    }
    if let Err(e) = save_tasks(&tasks) {
        if !silent { eprintln!("Failed to save tasks: {}", e); }
    } else if !silent {
        println!("Task '{}' updated.", tasks[idx].title);
    }
}

fn task_table(title: &str) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new(title).add_attribute(Attribute::Bold),
            Cell::new("Task").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Date").add_attribute(Attribute::Bold),
            Cell::new("Window").add_attribute(Attribute::Bold),
            Cell::new("State").add_attribute(Attribute::Bold),
        ]);
    table
}

fn category_cell(category: Category) -> Cell {
    let (r, g, b) = category.color();
    Cell::new(category).fg(Color::Rgb { r, g, b })
}

fn add_task_row(table: &mut Table, task: &Task, state: &str, state_color: Color) {
    table.add_row(vec![
        Cell::new(short_id(task)),
        Cell::new(&task.title),
        Cell::new(format!("{} {}", task.priority.icon(), task.priority)),
        category_cell(task.category),
        Cell::new(&task.scheduled_date),
        Cell::new(format!("{}-{}", task.start_time, task.end_time)),
        Cell::new(state).fg(state_color),
    ]);
}

/// Lists tasks grouped by lifecycle.
///
/// By default, hides completed tasks unless `all` is true.
pub fn cmd_list(all: bool) {
    let tasks = load_tasks();
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    let parts = partition(&tasks, now());

    let in_progress = parts.in_progress();
    if !in_progress.is_empty() {
        let mut table = task_table("In Progress");
        for t in &parts.overdue {
            add_task_row(&mut table, t, "OVERDUE", Color::Red);
        }
        for t in &parts.active {
            add_task_row(&mut table, t, "Active", Color::Yellow);
        }
        println!("{table}");
    }

    if !parts.upcoming.is_empty() {
        let mut table = task_table("Upcoming");
        for t in &parts.upcoming {
            add_task_row(&mut table, t, "Upcoming", Color::Cyan);
        }
        println!("{table}");
    }

    if !parts.unscheduled.is_empty() {
        let mut table = task_table("Unscheduled");
        for t in &parts.unscheduled {
            add_task_row(&mut table, t, "Bad schedule", Color::Grey);
        }
        println!("{table}");
    }

    if all && !parts.completed.is_empty() {
        let mut table = task_table("Done");
        for t in &parts.completed {
            add_task_row(&mut table, t, "Done", Color::Green);
        }
        println!("{table}");
    }

    if parts.pending_count() == 0 && !all {
        println!("All caught up! No pending tasks.");
    }
}

/// Lists tasks whose title or category matches `query`.
pub fn cmd_search(query: &str) {
    let tasks = load_tasks();
    let found = search(&tasks, query);
    if found.is_empty() {
        println!("No tasks match '{}'.", query);
        return;
    }
    let now = now();
    let mut table = task_table("ID");
    for t in found {
        let (state, color) = if t.is_completed() {
            ("Done".to_string(), Color::Green)
        } else {
            match crate::lifecycle::classify(t, now) {
                Ok(LifecycleState::Overdue) => ("OVERDUE".to_string(), Color::Red),
                Ok(s) => (s.to_string(), Color::Reset),
                Err(_) => ("Bad schedule".to_string(), Color::Grey),
            }
        };
        add_task_row(&mut table, t, &state, color);
    }
    println!("{table}");
}

/// Prints completion and distribution statistics.
pub fn cmd_stats() {
    let tasks = load_tasks();
    let Some(snap) = aggregate(&tasks) else {
        println!("No data to show yet. Add some tasks first.");
        return;
    };

    let mut summary = Table::new();
    summary
        .load_preset(UTF8_FULL)
        .set_header(vec!["Total", "Completed", "Pending", "Completion", "Avg Duration"]);
    summary.add_row(vec![
        snap.total.to_string(),
        snap.completed.to_string(),
        snap.pending().to_string(),
        format!("{:.1}%", snap.completion_rate),
        format!("{:.1}h", snap.avg_duration_hours),
    ]);
    println!("{summary}");

    let mut priorities = Table::new();
    priorities.load_preset(UTF8_FULL).set_header(vec!["Priority", "Tasks"]);
    for p in Priority::ALL {
        priorities.add_row(vec![
            Cell::new(format!("{} {}", p.icon(), p)),
            Cell::new(snap.priority_count(p)),
        ]);
    }
    println!("{priorities}");

    let mut categories = Table::new();
    categories.load_preset(UTF8_FULL).set_header(vec!["Category", "Tasks"]);
    for c in Category::ALL {
        let count = snap.category_count(c);
        if count > 0 {
            categories.add_row(vec![category_cell(c), Cell::new(count)]);
        }
    }
    println!("{categories}");
}

/// Adds a new task template.
pub fn cmd_template_add(
    name: String,
    tasks: Vec<String>,
    category: Category,
    priority: Priority,
    hours: f64,
    silent: bool,
) {
    if tasks.iter().all(|t| t.trim().is_empty()) {
        if !silent { eprintln!("Template '{}' needs at least one task.", name); }
        return;
    }
    if !hours.is_finite() || hours <= 0.0 {
        if !silent { eprintln!("Duration must be a positive number of hours."); }
        return;
    }
    let mut all = load_templates();
    if templates::find(&all, &name).is_ok() {
        if !silent { eprintln!("Template '{}' already exists.", name); }
        return;
    }
    all.push(Template {
        name: name.clone(),
        tasks,
        category,
        priority,
        duration_hours: hours,
    });
    if let Err(e) = save_templates(&all) {
        if !silent { eprintln!("Failed to save templates: {}", e); }
    } else if !silent {
        println!("Template '{}' added.", name);
    }
}

/// Lists all available templates.
pub fn cmd_template_list() {
    let all = load_templates();
    if all.is_empty() {
        println!("No templates found.");
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Name", "Tasks", "Category", "Priority", "Hours Each"]);
    for t in all {
        table.add_row(vec![
            Cell::new(&t.name),
            Cell::new(t.tasks.join(", ")),
            category_cell(t.category),
            Cell::new(format!("{} {}", t.priority.icon(), t.priority)),
            Cell::new(format!("{:.2}", t.duration_hours)),
        ]);
    }
    println!("{table}");
}

/// Removes a template.
pub fn cmd_template_remove(name: String, silent: bool) {
    let mut all = load_templates();
    let len_before = all.len();
    all.retain(|t| !t.name.eq_ignore_ascii_case(name.trim()));

    if all.len() == len_before {
        if !silent { eprintln!("Template '{}' not found.", name); }
        return;
    }
    if let Err(e) = save_templates(&all) {
        if !silent { eprintln!("Failed to save templates: {}", e); }
    } else if !silent {
        println!("Template '{}' removed.", name);
    }
}

/// Creates the tasks of a template, scheduled on `date` (default today).
///
/// Returns how many tasks were created.
pub fn cmd_template_apply(name: String, date: Option<String>, silent: bool) -> usize {
    let now = now();
    let all = load_templates();
    let created = (|| -> Result<Vec<Task>> {
        let template = templates::find(&all, &name)?;
        let date = match &date {
            Some(d) => parse_date(d)?,
            None => now.date(),
        };
        Ok(templates::expand(template, date, now)?)
    })();
    let created = match created {
        Ok(c) => c,
        Err(e) => {
            if !silent { eprintln!("Could not apply template: {}", e); }
            return 0;
        }
    };

    let count = created.len();
    let mut tasks = load_tasks();
    tasks.extend(created);
    if let Err(e) = save_tasks(&tasks) {
        if !silent { eprintln!("Failed to save tasks: {}", e); }
        return 0;
    }
    if !silent { println!("Created {} tasks from '{}'.", count, name); }
    count
}

/// Writes all tasks to an export bundle.
pub fn cmd_export(path: &Path, silent: bool) {
    let tasks = load_tasks();
    if let Err(e) = export_to(path, &tasks, now()) {
        if !silent { eprintln!("Export failed: {}", e); }
    } else if !silent {
        println!("Exported {} tasks to {}.", tasks.len(), path.display());
    }
}

/// Replaces the task collection with the contents of an export bundle.
pub fn cmd_import(path: &Path, silent: bool) {
    let tasks = match import_from(path) {
        Ok(t) => t,
        Err(e) => {
            if !silent { eprintln!("Import failed: {}", e); }
            return;
        }
    };
    if let Err(e) = save_tasks(&tasks) {
        if !silent { eprintln!("Failed to save tasks: {}", e); }
    } else if !silent {
        println!("Imported {} tasks.", tasks.len());
    }
}

/// Resets the database by deleting all tasks and templates.
pub fn cmd_reset(force: bool) {
    if !force {
        print!("Are you sure you want to delete all tasks and templates? This cannot be undone. [y/N] ");
        let mut input = String::new();
        if io::stdout().flush().is_err() || io::stdin().read_line(&mut input).is_err() {
            println!("Aborted.");
            return;
        }
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = delete_database() {
        eprintln!("Failed to reset database: {}", e);
    } else {
        println!("Database reset successfully.");
    }
}
