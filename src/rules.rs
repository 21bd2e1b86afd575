//! Static keyword and presentation tables consumed by the extractor and the
//! display layers.

use crate::models::{Category, Priority};

/// Words that mark a task as high priority.
pub const HIGH_PRIORITY_KEYWORDS: &[&str] = &["urgent", "critical", "important", "asap", "high"];

/// Words that mark a task as low priority. Checked after the high set.
pub const LOW_PRIORITY_KEYWORDS: &[&str] = &["low", "minor", "someday", "whenever"];

/// Category keyword table. Order matters: the first category with a hit wins.
/// General has no entry and is only ever assigned as the default.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Work,
        &["work", "meeting", "project", "client", "email", "call", "presentation", "office"],
    ),
    (
        Category::Personal,
        &["personal", "home", "family", "friend", "birthday", "party"],
    ),
    (
        Category::Health,
        &["health", "gym", "exercise", "workout", "doctor", "medical", "run", "yoga"],
    ),
    (
        Category::Learning,
        &["learn", "study", "course", "read", "book", "tutorial", "class"],
    ),
    (
        Category::Finance,
        &["finance", "budget", "pay", "bill", "invoice", "money", "bank", "tax"],
    ),
];

/// Sort rank of a priority, lower sorts first.
pub fn priority_rank(priority: Priority) -> u8 {
    match priority {
        Priority::High => 1,
        Priority::Medium => 2,
        Priority::Low => 3,
    }
}

pub fn priority_icon(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "🔴",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

/// Display colour of a category as an `(r, g, b)` triple.
pub fn category_color(category: Category) -> (u8, u8, u8) {
    match category {
        Category::Work => (0x3b, 0x82, 0xf6),
        Category::Personal => (0x8b, 0x5c, 0xf6),
        Category::Health => (0x10, 0xb9, 0x81),
        Category::Learning => (0xf5, 0x9e, 0x0b),
        Category::Finance => (0xef, 0x44, 0x44),
        Category::General => (0x6b, 0x72, 0x80),
    }
}

/// Keywords registered for a category. Empty for General.
pub fn category_keywords(category: Category) -> &'static [&'static str] {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, words)| *words)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_covers_every_category_but_general() {
        for category in Category::ALL {
            let words = category_keywords(category);
            if category == Category::General {
                assert!(words.is_empty());
            } else {
                assert!(!words.is_empty(), "{category} has no keywords");
            }
        }
    }

    #[test]
    fn priority_ranks_are_ordered() {
        assert!(priority_rank(Priority::High) < priority_rank(Priority::Medium));
        assert!(priority_rank(Priority::Medium) < priority_rank(Priority::Low));
    }

    #[test]
    fn priority_sets_do_not_overlap() {
        for word in HIGH_PRIORITY_KEYWORDS {
            assert!(!LOW_PRIORITY_KEYWORDS.contains(word));
        }
    }
}
