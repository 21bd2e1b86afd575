//! # Tusk
//!
//! A terminal task manager with natural-language quick add. Tusk combines a
//! fast CLI for quick entry with a TUI (Terminal User Interface) dashboard.
//!
//! ## Features
//!
//! *   **Quick Add**: `tusk add "urgent call client tomorrow 3pm for 2 hours"` picks
//!     out priority, category, date, start time and duration from plain text.
//! *   **Lifecycle Views**: pending tasks are grouped as overdue, active or upcoming
//!     relative to the current time.
//! *   **Analytics**: completion rate, priority and category breakdown, average duration.
//! *   **Templates**: create a whole set of tasks (e.g. "Morning Routine") in one go.
//! *   **Data Persistence**: tasks are stored as JSON in the XDG data directory.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive dashboard
//! tusk
//!
//! # Quick add, with optional overrides
//! tusk add "gym 6am health"
//! tusk add "pay invoice in 3 days" --priority high
//!
//! # Lifecycle-grouped listing, including completed tasks
//! tusk list --all
//!
//! # Complete by id prefix
//! tusk complete 3f2a
//!
//! # Templates
//! tusk template list
//! tusk template apply "Study Session" --date 2025-12-01
//! ```
//!
//! ## Data Storage
//!
//! Tasks are saved in your local data directory:
//! *   Linux: `~/.local/share/tusk/tasks.json`
//! *   macOS: `~/Library/Application Support/tusk/tasks.json`
//! *   Windows: `%APPDATA%\tusk\tasks.json`
//!
//! You can override this by setting the `TUSK_DB` environment variable.
//! Diagnostics go to stderr and are filtered with `RUST_LOG`.

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

use tusk::commands::*;
use tusk::logging;
use tusk::models::{Category, Priority};
use tusk::tui::run_tui;

#[derive(Parser)]
#[command(name = "tusk")]
#[command(about = "Smart terminal task manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task from natural language
    Add {
        /// Task text, e.g. "urgent call client tomorrow 3pm for 2 hours"
        text: String,
        /// Override the detected priority (high, medium, low)
        #[arg(short, long)]
        priority: Option<Priority>,
        /// Override the detected category
        #[arg(short, long)]
        category: Option<Category>,
        /// Scheduled date in YYYY-MM-DD
        #[arg(short, long)]
        date: Option<String>,
        /// Start time in HH:MM
        #[arg(short, long)]
        start: Option<String>,
        /// End time in HH:MM
        #[arg(short, long)]
        end: Option<String>,
    },
    /// List pending tasks grouped by lifecycle
    List {
        /// Show completed tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Mark a task as complete
    Complete {
        /// Task id or unique id prefix
        id: String,
    },
    /// Remove a task
    Remove {
        /// Task id or unique id prefix
        id: String,
    },
    /// Edit a task
    Edit {
        /// Task id or unique id prefix
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New priority
        #[arg(short, long)]
        priority: Option<Priority>,
        /// New category
        #[arg(short, long)]
        category: Option<Category>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New start time (HH:MM)
        #[arg(short, long)]
        start: Option<String>,
        /// New end time (HH:MM)
        #[arg(short, long)]
        end: Option<String>,
    },
    /// Search tasks by title or category
    Search {
        query: String,
    },
    /// Show completion statistics
    Stats,
    /// Manage templates
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Export all tasks to a JSON bundle
    Export {
        path: PathBuf,
    },
    /// Replace all tasks with those of a JSON bundle
    Import {
        path: PathBuf,
    },
    /// Reset the database (delete all tasks and templates)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// Add a new template
    Add {
        /// Template name
        name: String,
        /// Task titles, in order
        #[arg(short, long = "task", required = true)]
        tasks: Vec<String>,
        /// Category shared by the tasks
        #[arg(short, long, default_value = "General")]
        category: Category,
        /// Priority shared by the tasks
        #[arg(short, long, default_value = "Medium")]
        priority: Priority,
        /// Duration of each task in hours
        #[arg(short = 'H', long, default_value_t = 1.0)]
        hours: f64,
    },
    /// List templates
    List,
    /// Remove a template
    Remove {
        /// Template name
        name: String,
    },
    /// Create the tasks of a template
    Apply {
        /// Template name
        name: String,
        /// Date to schedule on (YYYY-MM-DD), default today
        #[arg(short, long)]
        date: Option<String>,
    },
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Add { text, priority, category, date, start, end }) => {
            cmd_add(text, priority, category, date, start, end, false);
        }
        Some(Commands::List { all }) => cmd_list(all),
        Some(Commands::Complete { id }) => {
            cmd_complete(&id, false);
        }
        Some(Commands::Remove { id }) => cmd_remove(&id, false),
        Some(Commands::Edit { id, title, priority, category, date, start, end }) => {
            cmd_edit(&id, title, priority, category, date, start, end, false)
        }
        Some(Commands::Search { query }) => cmd_search(&query),
        Some(Commands::Stats) => cmd_stats(),
        Some(Commands::Template { command }) => match command {
            TemplateCommands::Add { name, tasks, category, priority, hours } => {
                cmd_template_add(name, tasks, category, priority, hours, false)
            }
            TemplateCommands::List => cmd_template_list(),
            TemplateCommands::Remove { name } => cmd_template_remove(name, false),
            TemplateCommands::Apply { name, date } => {
                cmd_template_apply(name, date, false);
            }
        },
        Some(Commands::Export { path }) => cmd_export(&path, false),
        Some(Commands::Import { path }) => cmd_import(&path, false),
        Some(Commands::Reset { force }) => cmd_reset(force),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "tusk", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui() {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}
