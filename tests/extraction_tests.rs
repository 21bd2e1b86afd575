use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rstest::rstest;
use tusk::factory::{self, TaskDraft};
use tusk::logging;
use tusk::parser::extract;
use tusk::{Category, Priority, TaskError, ValidationError};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[rstest]
#[case("urgent call client tomorrow 3pm for 2 hours", "call client", Priority::High, Category::Work, day(2), t(15, 0), t(17, 0))]
#[case("gym 6am health", "gym", Priority::Medium, Category::Health, day(1), t(6, 0), t(7, 0))]
#[case("finish report asap at 14:30", "finish report", Priority::High, Category::General, day(1), t(14, 30), t(15, 30))]
#[case("team meeting today at 4pm for 3 hours", "team meeting", Priority::Medium, Category::Work, day(1), t(16, 0), t(19, 0))]
#[case("read book someday", "read book", Priority::Low, Category::Learning, day(1), t(9, 0), t(10, 0))]
#[case("pay electricity bill in 3 days", "pay electricity bill", Priority::Medium, Category::Finance, day(4), t(9, 0), t(10, 0))]
#[case("late night coding 11pm for 3 hours", "late night coding", Priority::Medium, Category::General, day(1), t(23, 0), t(23, 59))]
#[case("buy 5 apples at 3pm", "buy apples", Priority::Medium, Category::General, day(1), t(5, 0), t(6, 0))]
#[case("important: taxes due in 10 days at 5pm", "taxes due", Priority::High, Category::Finance, day(11), t(17, 0), t(18, 0))]
#[case("go to work", "go to work", Priority::Medium, Category::Work, day(1), t(9, 0), t(10, 0))]
fn extracts_quick_add_text(
    #[case] text: &str,
    #[case] title: &str,
    #[case] priority: Priority,
    #[case] category: Category,
    #[case] date: NaiveDate,
    #[case] start: NaiveTime,
    #[case] end: NaiveTime,
) {
    logging::init_test();
    let parsed = extract(text, now());
    assert_eq!(parsed.title, title);
    assert_eq!(parsed.priority, priority);
    assert_eq!(parsed.category, category);
    assert_eq!(parsed.scheduled_date, date);
    assert_eq!(parsed.start_time, start);
    assert_eq!(parsed.end_time, end);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("99:99")]
#[case("at 25")]
#[case("12:60pm standup")]
#[case("in 99999999999999999999 days")]
#[case("for 0 hours")]
#[case("for 30 hours at 11pm")]
#[case("🚀 launch 5pm")]
#[case("café at 9 with Zoë")]
#[case("URGENT LOW PRIORITY")]
fn extraction_never_produces_an_empty_window(#[case] text: &str) {
    let parsed = extract(text, now());
    assert!(
        parsed.end_time > parsed.start_time,
        "{text:?} gave {} - {}",
        parsed.start_time,
        parsed.end_time
    );
    assert!(parsed.scheduled_date >= now().date());
}

#[rstest]
#[case("urgent call client tomorrow 3pm for 2 hours")]
#[case("gym 6am health")]
#[case("finish report asap at 14:30")]
#[case("pay electricity bill in 3 days")]
fn cleaned_title_is_stable(#[case] text: &str) {
    let once = extract(text, now()).title;
    let twice = extract(&once, now()).title;
    assert_eq!(once, twice);
}

#[rstest]
#[case("buy 5 apples at 3pm", "buy apples")]
#[case("someday fix fence in 2 days 4pm", "fix fence")]
#[case("critical: renew passport tomorrow at 10:30 for 2 hours", "renew passport")]
#[case("water plants 7 8 9", "water plants")]
fn re_extracting_a_clean_title_gives_defaults(#[case] text: &str, #[case] title: &str) {
    let once = extract(text, now());
    assert_eq!(once.title, title);

    let again = extract(&once.title, now());
    assert_eq!(again.title, title);
    assert_eq!(again.priority, Priority::Medium);
    assert_eq!(again.category, Category::General);
    assert_eq!(again.scheduled_date, now().date());
    assert_eq!(again.start_time, t(9, 0));
    assert_eq!(again.end_time, t(10, 0));
}

#[test]
fn day_offset_digits_do_not_leak_into_title_or_time() {
    let parsed = extract("dentist in 3 days", now());
    assert_eq!(parsed.title, "dentist");
    assert_eq!(parsed.scheduled_date, day(4));
    assert_eq!(parsed.start_time, t(9, 0));
}

#[test]
fn seconds_of_now_are_dropped() {
    let now = day(1).and_hms_opt(9, 41, 37).unwrap();
    let parsed = extract("water plants", now);
    assert_eq!(parsed.start_time, t(9, 41));
    assert_eq!(parsed.end_time, t(10, 41));
}

#[test]
fn empty_extraction_is_rejected_on_create() {
    let parsed = extract("tomorrow 3pm urgent", now());
    assert_eq!(parsed.title, "");
    assert_eq!(
        factory::create(TaskDraft::from(parsed), now()),
        Err(TaskError::Validation(ValidationError::EmptyTitle))
    );
}

#[test]
fn extracted_task_round_trips_into_a_record() {
    let parsed = extract("urgent call client tomorrow 3pm for 2 hours", now());
    let task = factory::create(parsed.into(), now()).unwrap();
    assert_eq!(task.title, "call client");
    assert_eq!(task.scheduled_date, "2025-05-02");
    assert_eq!(task.start_time, "15:00");
    assert_eq!(task.end_time, "17:00");
    assert_eq!(task.created_at, "2025-05-01 09:00");
    assert!(task.completed_at.is_none());
}
