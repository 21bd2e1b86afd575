//! Natural-language quick-add extraction.
//!
//! `extract` turns free text such as `"urgent call client tomorrow 3pm for 2 hours"`
//! into a [`ParsedTask`]. It runs a fixed sequence of independent stages:
//!
//! 1. priority keywords (high set checked before low set)
//! 2. category keywords (first category in table order wins)
//! 3. clock time (`3pm`, `at 9`, `14:30`), defaulting to the current minute
//! 4. relative date (`tomorrow`, `today`, `in N days`)
//! 5. duration override (`for N hours`)
//! 6. title cleaning, which strips every token the stages above acted on
//!
//! Extraction never fails. Anything it cannot recognise falls back to the
//! defaults: Medium, General, today, now, one hour.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{Category, Priority};
use crate::rules::{CATEGORY_KEYWORDS, HIGH_PRIORITY_KEYWORDS, LOW_PRIORITY_KEYWORDS};

// ── Patterns ────────────────────────────────────────────────────────────

static RE_IN_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bin\s*(\d+)\s*days?\b").unwrap());

static RE_FOR_HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfor\s*(\d+)\s*(?:hours?|hrs?|h)\b").unwrap());

static RE_CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b").unwrap());

static RE_TOMORROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\btomorrow\b").unwrap());

static RE_TODAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\btoday\b").unwrap());

static RE_HIGH: LazyLock<Regex> = LazyLock::new(|| whole_words(HIGH_PRIORITY_KEYWORDS));

static RE_LOW: LazyLock<Regex> = LazyLock::new(|| whole_words(LOW_PRIORITY_KEYWORDS));

static RE_CATEGORIES: LazyLock<Vec<(Category, Regex)>> = LazyLock::new(|| {
    CATEGORY_KEYWORDS
        .iter()
        .map(|(category, words)| {
            let pattern = format!(r"(?i)\b(?:{})(?:s|es)?\b", words.join("|"));
            (*category, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Ordered removal table for the title cleaning stage. Day and duration
/// phrases go first so their digits are gone before clock phrases are matched.
static CLEANERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    let priority_words: Vec<&str> = HIGH_PRIORITY_KEYWORDS
        .iter()
        .chain(LOW_PRIORITY_KEYWORDS)
        .copied()
        .chain(["medium"])
        .collect();
    vec![
        ("in_days", Regex::new(r"(?i)\bin\s*\d+\s*days?\b").unwrap()),
        ("for_hours", Regex::new(r"(?i)\bfor\s*\d+\s*(?:hours?|hrs?|h)\b").unwrap()),
        ("at_clock", Regex::new(r"(?i)\bat\s*\d{1,2}(?::\d{2})?\s*(?:am|pm)?\b").unwrap()),
        ("clock", Regex::new(r"(?i)\b\d{1,2}(?::\d{2})?\s*(?:am|pm)\b|\b\d{1,2}:\d{2}\b").unwrap()),
        ("day_word", Regex::new(r"(?i)\b(?:tomorrow|today)\b").unwrap()),
        (
            "priority",
            Regex::new(&format!(
                r"(?i)\b(?:{})\b(?:\s*priority\b)?",
                priority_words.join("|")
            ))
            .unwrap(),
        ),
    ]
});

/// Separators left dangling at either end of a title once tokens are gone.
const EDGE_PUNCTUATION: &[char] = &[':', ';', ',', '.', '-', '|', '/'];

fn whole_words(words: &[&str]) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|"))).unwrap()
}

// ── Types ───────────────────────────────────────────────────────────────

/// Fields extracted from quick-add text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTask {
    /// Text with every recognised token removed. May be empty.
    pub title: String,
    pub priority: Priority,
    pub category: Category,
    pub scheduled_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// A clock time found in the text, with the byte span it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockMatch {
    pub time: NaiveTime,
    pub span: Range<usize>,
}

// ── Extraction ──────────────────────────────────────────────────────────

/// Parses quick-add text relative to `now`.
pub fn extract(text: &str, now: NaiveDateTime) -> ParsedTask {
    let priority = detect_priority(text);
    let category = detect_category(text);
    let candidates = clock_candidates(text);
    let start = candidates
        .first()
        .map(|c| c.time)
        .unwrap_or_else(|| truncate_to_minute(now.time()));
    let scheduled_date = detect_date(text, now.date());
    let hours = detect_duration(text).unwrap_or(1);
    let (start_time, end_time) = fit_window(start, hours);
    let spans: Vec<Range<usize>> = candidates.into_iter().map(|c| c.span).collect();
    let title = strip_category_tag(clean_title(text, &spans), category);

    tracing::debug!(
        %priority,
        %category,
        %scheduled_date,
        %start_time,
        %end_time,
        title = %title,
        "Extracted quick-add text"
    );

    ParsedTask {
        title,
        priority,
        category,
        scheduled_date,
        start_time,
        end_time,
    }
}

/// High keywords win over low keywords; neither gives Medium.
pub fn detect_priority(text: &str) -> Priority {
    if RE_HIGH.is_match(text) {
        Priority::High
    } else if RE_LOW.is_match(text) {
        Priority::Low
    } else {
        Priority::Medium
    }
}

/// First category in table order with a keyword hit, else General.
pub fn detect_category(text: &str) -> Category {
    RE_CATEGORIES
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(category, _)| *category)
        .unwrap_or_default()
}

/// Finds the clock time in `text`: the first valid candidate wins.
pub fn detect_clock(text: &str) -> Option<ClockMatch> {
    clock_candidates(text).into_iter().next()
}

/// Every readable clock time in `text`, in order of appearance.
///
/// Digits inside `in N days` and `for N hours` phrases are never read as a
/// time, and a candidate with minutes above 59 is skipped.
pub fn clock_candidates(text: &str) -> Vec<ClockMatch> {
    let masked = mask(text, &[&RE_IN_DAYS, &RE_FOR_HOURS]);
    let mut found = Vec::new();

    for caps in RE_CLOCK.captures_iter(&masked) {
        let Some(whole) = caps.get(0) else { continue };
        let Ok(mut hour) = caps[1].parse::<u32>() else { continue };
        let minute = match caps.get(2) {
            Some(m) => match m.as_str().parse::<u32>() {
                Ok(m) if m < 60 => m,
                _ => continue,
            },
            None => 0,
        };
        let meridiem = caps.get(3).map(|m| m.as_str().to_ascii_lowercase());
        match meridiem.as_deref() {
            Some("pm") if hour != 12 => hour += 12,
            Some("am") if hour == 12 => hour = 0,
            _ => {}
        }
        let Some(time) = NaiveTime::from_hms_opt(hour % 24, minute, 0) else {
            continue;
        };
        let start = at_prefix(&masked, whole.start()).unwrap_or(whole.start());
        found.push(ClockMatch {
            time,
            span: start..whole.end(),
        });
    }
    found
}

/// `tomorrow`, then `today`, then `in N days`; anything else is `today`.
pub fn detect_date(text: &str, today: NaiveDate) -> NaiveDate {
    if RE_TOMORROW.is_match(text) {
        return today.succ_opt().unwrap_or(today);
    }
    if RE_TODAY.is_match(text) {
        return today;
    }
    RE_IN_DAYS
        .captures(text)
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .and_then(|n| today.checked_add_days(Days::new(n)))
        .unwrap_or(today)
}

/// Hours requested by a `for N hours` phrase. Zero is treated as absent.
pub fn detect_duration(text: &str) -> Option<u32> {
    RE_FOR_HOURS
        .captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|h| *h > 0)
}

/// Removes recognised tokens from `text` and normalises whitespace.
///
/// `clock_spans` are the spans [`clock_candidates`] read. They are removed even
/// when they are bare numbers, so no time token survives into the title.
pub fn clean_title(text: &str, clock_spans: &[Range<usize>]) -> String {
    let mut cleaned = text.to_string();
    for span in clock_spans {
        if let Some(token) = text.get(span.clone()) {
            cleaned.replace_range(span.clone(), &" ".repeat(token.len()));
        }
    }
    for (stage, re) in CLEANERS.iter() {
        if re.is_match(&cleaned) {
            tracing::trace!(stage, "Stripping matched tokens from title");
            cleaned = re.replace_all(&cleaned, " ").into_owned();
        }
    }
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    trim_edges(&collapsed).to_string()
}

/// Drops a trailing category name used as a tag (`gym 6am health`).
///
/// The tag only goes when the words before it trigger the same category on
/// their own, so `go to work` keeps its last word.
pub fn strip_category_tag(title: String, category: Category) -> String {
    let Some((rest, tag)) = title.rsplit_once(' ') else {
        return title;
    };
    if category != Category::General
        && tag.eq_ignore_ascii_case(category.as_str())
        && detect_category(rest) == category
    {
        return trim_edges(rest).to_string();
    }
    title
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Blanks every match of `patterns` with spaces, keeping byte offsets intact.
fn mask(text: &str, patterns: &[&Regex]) -> String {
    let mut masked = text.to_string();
    for re in patterns {
        let ranges: Vec<Range<usize>> = re.find_iter(&masked).map(|m| m.range()).collect();
        for range in ranges {
            let blank = " ".repeat(range.len());
            masked.replace_range(range, &blank);
        }
    }
    masked
}

/// Byte offset of an `at` word directly before `start`, if there is one.
fn at_prefix(text: &str, start: usize) -> Option<usize> {
    let before = text[..start].trim_end();
    let at = before.len().checked_sub(2)?;
    let word = before.get(at..)?;
    let boundary = before[..at].chars().last().map_or(true, char::is_whitespace);
    (word.eq_ignore_ascii_case("at") && boundary).then_some(at)
}

fn trim_edges(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || EDGE_PUNCTUATION.contains(&c))
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Builds a same-day window of `hours` starting at `start`.
///
/// A window that would run past midnight is cut off at 23:59, and a start at
/// 23:59 moves back one minute, so the end is always after the start.
pub fn fit_window(start: NaiveTime, hours: u32) -> (NaiveTime, NaiveTime) {
    let last = NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN);
    let latest_start = NaiveTime::from_hms_opt(23, 58, 0).unwrap_or(NaiveTime::MIN);
    let start = truncate_to_minute(start).min(latest_start);
    let room = (last - start).num_minutes();
    let span = (i64::from(hours) * 60).min(room);
    (start, start + Duration::minutes(span))
}
