//! Task record data structure.
//!
//! A `TaskRecord` is one card on the board: what to do, what it pays out
//! when finished, and when it was created.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fields::Column;

/// Text form of creation timestamps in the state file.
pub const TIMESTAMP_FORMAT: &str = "[%H:%M:%S] [%d.%m.%y]";

/// A single task card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub title: String,
    pub description: String,
    pub reward: Option<String>,
    pub deadline: Option<String>,
    pub created_at: NaiveDateTime,
    /// Stored timestamp text that did not parse, shown and saved as is.
    #[serde(default)]
    pub raw_timestamp: Option<String>,
    pub column: Column,
}

impl TaskRecord {
    /// Create a pending task stamped with the current local time.
    ///
    /// The title is trimmed and must not be empty; an empty reward or
    /// deadline is stored as absent.
    pub fn new(
        title: &str,
        description: &str,
        reward: Option<&str>,
        deadline: Option<&str>,
    ) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("Task title cannot be empty".into()));
        }
        Ok(TaskRecord {
            title: title.to_string(),
            description: description.trim().to_string(),
            reward: non_empty(reward),
            deadline: non_empty(deadline),
            created_at: now_to_second(),
            raw_timestamp: None,
            column: Column::Pending,
        })
    }

    /// Creation time in the state file's text form.
    pub fn timestamp(&self) -> String {
        match &self.raw_timestamp {
            Some(raw) => raw.clone(),
            None => self.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Parse a creation timestamp written by `TaskRecord::timestamp`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()
}

/// Current local time truncated to whole seconds, the precision the state file keeps.
pub fn now_to_second() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_blank_title() {
        assert!(matches!(TaskRecord::new("   ", "", None, None), Err(Error::Validation(_))));
    }

    #[test]
    fn test_new_normalises_optional_fields() {
        let task = TaskRecord::new(" Homework ", "Maths", Some(""), Some(" friday ")).unwrap();
        assert_eq!(task.title, "Homework");
        assert_eq!(task.reward, None);
        assert_eq!(task.deadline.as_deref(), Some("friday"));
        assert_eq!(task.column, Column::Pending);
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let task = TaskRecord::new("Homework", "", None, None).unwrap();
        assert_eq!(parse_timestamp(&task.timestamp()), Some(task.created_at));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday-ish"), None);
        assert!(parse_timestamp("[21:05:09] [17.10.26]").is_some());
    }
}
