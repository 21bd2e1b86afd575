use crate::models::{Category, Task};

/// Tasks whose title or category name contains `query`, ignoring case.
/// A blank query matches everything.
pub fn search<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return tasks.iter().collect();
    }
    tasks
        .iter()
        .filter(|t| {
            t.title.to_lowercase().contains(&needle)
                || t.category.as_str().to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn by_category(tasks: &[Task], category: Category) -> Vec<&Task> {
    tasks.iter().filter(|t| t.category == category).collect()
}
