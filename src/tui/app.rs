use chrono::{Local, NaiveDateTime};
use ratatui::widgets::TableState;

use crate::analytics::{aggregate, AnalyticsSnapshot};
use crate::commands::{cmd_add, cmd_complete, cmd_remove, cmd_template_apply};
use crate::lifecycle::partition;
use crate::models::{Task, Template};
use crate::search::search;
use crate::storage::{load_tasks, load_templates};

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
    Searching,
}

#[derive(Clone, Copy, PartialEq)]
pub enum View {
    InProgress,
    Upcoming,
    Done,
    Stats,
    Templates,
}

impl View {
    pub const ALL: [View; 5] = [View::InProgress, View::Upcoming, View::Done, View::Stats, View::Templates];

    pub fn title(self) -> &'static str {
        match self {
            View::InProgress => "In Progress",
            View::Upcoming => "Upcoming",
            View::Done => "Done",
            View::Stats => "Analytics",
            View::Templates => "Templates",
        }
    }

    fn index(self) -> usize {
        View::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }
}

/// A task row with its overdue flag resolved at load time.
pub struct Row {
    pub task: Task,
    pub overdue: bool,
}

pub struct App {
    pub rows: Vec<Row>,
    pub counts: [usize; 3],
    pub templates: Vec<Template>,
    pub stats: Option<AnalyticsSnapshot>,
    pub state: TableState,
    pub template_state: TableState,
    pub view: View,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub search_query: String,
    pub message: Option<String>,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn clamp_selection(state: &mut TableState, len: usize) {
    if len == 0 {
        state.select(None);
    } else if let Some(i) = state.selected() {
        if i >= len {
            state.select(Some(len - 1));
        }
    } else {
        state.select(Some(0));
    }
}

fn step(state: &mut TableState, len: usize, forward: bool) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if forward => (i + 1) % len,
        Some(0) => len - 1,
        Some(i) => i - 1,
        None => 0,
    };
    state.select(Some(i));
}

impl App {
    /// Creates a new App instance and loads initial data.
    pub fn new() -> App {
        let mut app = App {
            rows: Vec::new(),
            counts: [0; 3],
            templates: Vec::new(),
            stats: None,
            state: TableState::default(),
            template_state: TableState::default(),
            view: View::InProgress,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            search_query: String::new(),
            message: None,
        };
        app.reload();
        app
    }

    /// Reloads tasks and templates from storage and rebuilds the current view.
    pub fn reload(&mut self) {
        let all = load_tasks();
        let visible: Vec<Task> = search(&all, &self.search_query).into_iter().cloned().collect();
        let parts = partition(&visible, now());
        self.counts = [
            parts.in_progress().len() + parts.unscheduled.len(),
            parts.upcoming.len(),
            parts.completed.len(),
        ];

        let row = |t: &&Task, overdue: bool| Row { task: (*t).clone(), overdue };
        self.rows = match self.view {
            View::InProgress => parts
                .overdue
                .iter()
                .map(|t| row(t, true))
                .chain(parts.active.iter().map(|t| row(t, false)))
                .chain(parts.unscheduled.iter().map(|t| row(t, false)))
                .collect(),
            View::Upcoming => parts.upcoming.iter().map(|t| row(t, false)).collect(),
            View::Done => parts.completed.iter().map(|t| row(t, false)).collect(),
            View::Stats | View::Templates => Vec::new(),
        };
        self.stats = aggregate(&visible);
        clamp_selection(&mut self.state, self.rows.len());

        self.templates = load_templates();
        clamp_selection(&mut self.template_state, self.templates.len());
    }

    pub fn next(&mut self) {
        match self.view {
            View::Templates => step(&mut self.template_state, self.templates.len(), true),
            _ => step(&mut self.state, self.rows.len(), true),
        }
    }

    pub fn previous(&mut self) {
        match self.view {
            View::Templates => step(&mut self.template_state, self.templates.len(), false),
            _ => step(&mut self.state, self.rows.len(), false),
        }
    }

    /// Cycles through the tabs.
    pub fn next_view(&mut self) {
        let i = (self.view.index() + 1) % View::ALL.len();
        self.view = View::ALL[i];
        self.state.select(None);
        self.reload();
    }

    fn selected_task(&self) -> Option<&Task> {
        self.state
            .selected()
            .and_then(|i| self.rows.get(i))
            .map(|r| &r.task)
    }

    /// Marks the currently selected task as complete.
    pub fn complete_selected(&mut self) {
        if let Some(t) = self.selected_task() {
            if t.is_completed() {
                self.message = Some(format!("'{}' is already done", t.title));
                return;
            }
            let (id, title) = (t.id.clone(), t.title.clone());
            self.message = Some(if cmd_complete(&id, true) {
                format!("Completed '{}'", title)
            } else {
                format!("Could not complete '{}'", title)
            });
            self.reload();
        }
    }

    /// Deletes the currently selected task.
    pub fn delete_selected(&mut self) {
        if let Some(t) = self.selected_task() {
            let (id, title) = (t.id.clone(), t.title.clone());
            cmd_remove(&id, true);
            self.message = Some(format!("Deleted '{}'", title));
            self.reload();
        }
    }

    /// Creates the tasks of the selected template for today.
    pub fn apply_selected_template(&mut self) {
        if self.view != View::Templates {
            return;
        }
        let Some(name) = self
            .template_state
            .selected()
            .and_then(|i| self.templates.get(i))
            .map(|t| t.name.clone())
        else {
            return;
        };
        let count = cmd_template_apply(name.clone(), None, true);
        self.message = Some(if count > 0 {
            format!("Created {} tasks from '{}'", count, name)
        } else {
            format!("'{}' does not fit in the rest of today", name)
        });
        self.reload();
    }

    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input_buffer.clear();
    }

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Searching;
        self.input_buffer = self.search_query.clone();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => {
                let text = self.input_buffer.trim().to_string();
                if text.is_empty() {
                    return;
                }
                self.message = Some(match cmd_add(text, None, None, None, None, None, true) {
                    Some(_) => "Task added".to_string(),
                    None => "Nothing left to use as a title".to_string(),
                });
            }
            InputMode::Searching => {
                self.search_query = self.input_buffer.trim().to_string();
            }
            InputMode::Normal => return,
        }
        self.cancel_input();
        self.reload();
    }
}
