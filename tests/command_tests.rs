use chrono::{Local, NaiveTime};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tusk::commands::*;
use tusk::storage::{load_tasks, load_templates, save_tasks};
use tusk::tui::app::App;
use tusk::{Category, Priority, Status, Task};

// Use a mutex to ensure tests run serially since they modify the environment variable
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_db<F>(test_name: &str, f: F)
where
    F: FnOnce(PathBuf),
{
    let _guard = TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

    let mut dir = env::temp_dir();
    dir.push(format!("tusk_test_{}", test_name));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    let db_path = dir.join("tasks.json");

    env::set_var("TUSK_DB", db_path.to_str().unwrap());

    // Run test
    f(dir.clone());

    // Clean up after test
    fs::remove_dir_all(&dir).unwrap();
    env::remove_var("TUSK_DB");
}

fn add(text: &str) -> String {
    cmd_add(text.into(), None, None, None, None, None, true).expect("task should be added")
}

#[test]
fn test_add_from_natural_language() {
    with_test_db("add_nl", |_| {
        let id = add("urgent call client tomorrow 3pm for 2 hours");

        let tasks = load_tasks();
        assert_eq!(tasks.len(), 1);
        let t = &tasks[0];
        assert_eq!(t.id, id);
        assert_eq!(t.title, "call client");
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.category, Category::Work);
        assert_eq!(t.status, Status::Pending);
        assert_eq!(t.start_time, "15:00");
        assert_eq!(t.end_time, "17:00");
        let tomorrow = Local::now().date_naive().succ_opt().unwrap();
        assert_eq!(t.scheduled_date, tomorrow.format("%Y-%m-%d").to_string());
    });
}

#[test]
fn test_add_with_overrides() {
    with_test_db("add_overrides", |_| {
        cmd_add(
            "write notes urgent".into(),
            Some(Priority::Low),
            Some(Category::Learning),
            Some("2030-01-01".into()),
            Some("10:00".into()),
            None,
            true,
        );

        let tasks = load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "write notes");
        assert_eq!(tasks[0].priority, Priority::Low);
        assert_eq!(tasks[0].category, Category::Learning);
        assert_eq!(tasks[0].scheduled_date, "2030-01-01");
        assert_eq!(tasks[0].start_time, "10:00");
        assert_eq!(tasks[0].end_time, "11:00");
    });
}

#[test]
fn test_add_rejects_bad_input() {
    with_test_db("add_reject", |_| {
        let bad_date = cmd_add("notes".into(), None, None, Some("01/02/2030".into()), None, None, true);
        assert!(bad_date.is_none());

        let inverted = cmd_add(
            "notes".into(),
            None,
            None,
            None,
            Some("10:00".into()),
            Some("09:00".into()),
            true,
        );
        assert!(inverted.is_none());

        let empty = cmd_add("tomorrow 3pm".into(), None, None, None, None, None, true);
        assert!(empty.is_none());

        assert!(load_tasks().is_empty());
    });
}

#[test]
fn test_complete_task() {
    with_test_db("complete", |_| {
        let id = add("water plants");

        assert!(cmd_complete(&id[..8], true));
        let tasks = load_tasks();
        assert_eq!(tasks[0].status, Status::Completed);
        let stamp = tasks[0].completed_at.clone();
        assert!(stamp.is_some());

        // Completing again is rejected and leaves the record alone.
        assert!(!cmd_complete(&id, true));
        let tasks = load_tasks();
        assert_eq!(tasks[0].status, Status::Completed);
        assert_eq!(tasks[0].completed_at, stamp);

        assert!(!cmd_complete("no-such-id", true));
    });
}

#[test]
fn test_remove_task() {
    with_test_db("remove", |_| {
        let keep = add("keep me");
        let drop = add("drop me");

        cmd_remove(&drop, true);
        let tasks = load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, keep);

        cmd_remove("no-such-id", true);
        assert_eq!(load_tasks().len(), 1);
    });
}

#[test]
fn test_edit_task() {
    with_test_db("edit", |_| {
        let id = cmd_add(
            "draft".into(),
            None,
            None,
            Some("2030-01-01".into()),
            Some("10:00".into()),
            None,
            true,
        )
        .unwrap();

        cmd_edit(&id, Some("final draft".into()), Some(Priority::High), None, None, None, Some("12:30".into()), true);
        let tasks = load_tasks();
        assert_eq!(tasks[0].title, "final draft");
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[0].end_time, "12:30");

        // An end before the start is rejected as a whole.
        cmd_edit(&id, Some("ignored".into()), None, None, None, None, Some("09:00".into()), true);
        let tasks = load_tasks();
        assert_eq!(tasks[0].title, "final draft");
        assert_eq!(tasks[0].end_time, "12:30");
    });
}

#[test]
fn test_find_task_by_prefix() {
    let a = Task {
        id: "abc1".into(),
        title: "a".into(),
        priority: Priority::Medium,
        category: Category::General,
        status: Status::Pending,
        created_at: String::new(),
        scheduled_date: "2030-01-01".into(),
        start_time: "09:00".into(),
        end_time: "10:00".into(),
        completed_at: None,
    };
    let b = Task {
        id: "abc2".into(),
        ..a.clone()
    };
    let tasks = vec![a, b];

    assert_eq!(find_task(&tasks, "abc1").unwrap(), 0);
    assert_eq!(find_task(&tasks, "abc2").unwrap(), 1);
    assert!(find_task(&tasks, "abc").is_err());
    assert!(find_task(&tasks, "zzz").is_err());
    assert!(find_task(&tasks, "").is_err());
}

#[test]
fn test_template_add_and_remove() {
    with_test_db("template_crud", |_| {
        let defaults = load_templates().len();
        assert_eq!(defaults, 4);

        cmd_template_add(
            "Chores".into(),
            vec!["Dishes".into(), "Laundry".into()],
            Category::Personal,
            Priority::Low,
            0.25,
            true,
        );
        let templates = load_templates();
        assert_eq!(templates.len(), defaults + 1);
        let chores = templates.iter().find(|t| t.name == "Chores").unwrap();
        assert_eq!(chores.tasks, vec!["Dishes", "Laundry"]);
        assert_eq!(chores.duration_hours, 0.25);

        // Duplicate names and non-positive durations are refused.
        cmd_template_add("chores".into(), vec!["x".into()], Category::General, Priority::Medium, 1.0, true);
        cmd_template_add("Nap".into(), vec!["Sleep".into()], Category::Health, Priority::Low, 0.0, true);
        assert_eq!(load_templates().len(), defaults + 1);

        cmd_template_remove("chores".into(), true);
        assert_eq!(load_templates().len(), defaults);
    });
}

#[test]
fn test_template_apply_is_all_or_nothing() {
    with_test_db("template_apply", |_| {
        let count = cmd_template_apply("Morning Routine".into(), Some("2030-01-01".into()), true);
        let tasks = load_tasks();

        assert_eq!(tasks.len(), count);
        if Local::now().time() < NaiveTime::from_hms_opt(22, 0, 0).unwrap() {
            assert_eq!(count, 3);
            assert!(tasks.iter().all(|t| t.category == Category::Health));
            assert!(tasks.iter().all(|t| t.scheduled_date == "2030-01-01"));
            assert_eq!(tasks[0].end_time, tasks[1].start_time);
            assert_eq!(tasks[1].end_time, tasks[2].start_time);
        } else {
            assert!(count == 0 || count == 3);
        }
    });
}

#[test]
fn test_template_apply_unknown() {
    with_test_db("template_unknown", |_| {
        assert_eq!(cmd_template_apply("Nope".into(), None, true), 0);
        assert!(load_tasks().is_empty());
    });
}

#[test]
fn test_export_import_roundtrip() {
    with_test_db("export_import", |dir| {
        add("urgent call client tomorrow 3pm for 2 hours");
        let id = add("gym 6am health");
        cmd_complete(&id, true);
        let before = load_tasks();

        let bundle = dir.join("bundle.json");
        cmd_export(&bundle, true);
        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&bundle).unwrap()).unwrap();
        assert_eq!(raw["version"], "2.0");
        assert_eq!(raw["tasks"].as_array().unwrap().len(), 2);

        save_tasks(&[]).unwrap();
        cmd_import(&bundle, true);
        assert_eq!(load_tasks(), before);
    });
}

#[test]
fn test_import_rejects_bundle_without_tasks() {
    with_test_db("import_invalid", |dir| {
        add("keep me");
        let bundle = dir.join("bad.json");
        fs::write(&bundle, r#"{"version": "2.0"}"#).unwrap();

        cmd_import(&bundle, true);
        let tasks = load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "keep me");
    });
}

#[test]
fn test_legacy_records_load() {
    with_test_db("legacy", |dir| {
        let legacy = r#"[{
            "id": "old-1",
            "task": "Old style",
            "priority": "Urgent",
            "category": "Shopping",
            "added_at": "2024-01-01 10:00",
            "scheduled_date": "2024-01-02",
            "start_time": "10:00",
            "end_time": "11:00",
            "status": "completed",
            "completed_at": "2024-01-02 11:05"
        }]"#;
        fs::write(dir.join("tasks.json"), legacy).unwrap();

        let tasks = load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Old style");
        assert_eq!(tasks[0].priority, Priority::Medium);
        assert_eq!(tasks[0].category, Category::General);
        assert_eq!(tasks[0].created_at, "2024-01-01 10:00");
        assert!(tasks[0].is_completed());
    });
}

#[test]
fn test_dashboard_reports_failed_completion() {
    with_test_db("tui_complete", |_| {
        add("water plants");
        let mut app = App::new();
        assert_eq!(app.rows.len(), 1);
        app.complete_selected();
        assert_eq!(app.message.as_deref(), Some("Completed 'water plants'"));

        let id = add("stretch");
        let mut app = App::new();
        assert_eq!(app.rows[0].task.id, id);
        // The task disappears from storage before the dashboard acts on it.
        save_tasks(&[]).unwrap();
        app.complete_selected();
        assert_eq!(app.message.as_deref(), Some("Could not complete 'stretch'"));
    });
}

#[test]
fn test_add_reports_short_id() {
    with_test_db("add_loud", |_| {
        let id = cmd_add("stretch 7am".into(), None, None, None, None, None, false).unwrap();
        assert_eq!(load_tasks()[0].id, id);
    });
}
