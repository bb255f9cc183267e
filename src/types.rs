//! Shared primitive IDs and the enumerated option sets offered to forms.

use crate::task::TaskField;

/// Server-assigned task identifier.
pub type TaskId = String;

/// Sentinel option value meaning "unset" for priority and category.
pub const UNSET: &str = "all";

/// Default priority choices.
pub const DEFAULT_PRIORITIES: &[&str] = &["low", "medium", "high"];

/// Default category choices.
pub const DEFAULT_CATEGORIES: &[&str] = &["work", "personal", "errand", "finance", "health"];

/// Fixed priority and category lists used for rendering choices.
///
/// These are read-only rendering hints. Writes are never validated against
/// them, so a record carrying an unknown priority still round-trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSets {
    /// Priority choices, in display order.
    pub priorities: Vec<String>,
    /// Category choices, in display order.
    pub categories: Vec<String>,
}

impl Default for OptionSets {
    fn default() -> Self {
        Self {
            priorities: DEFAULT_PRIORITIES.iter().map(|s| s.to_string()).collect(),
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl OptionSets {
    /// Choices to render for `field`. `None` for free-text fields.
    pub fn choices(&self, field: TaskField) -> Option<&[String]> {
        match field {
            TaskField::Title => None,
            TaskField::Priority => Some(&self.priorities),
            TaskField::Category => Some(&self.categories),
        }
    }
}
