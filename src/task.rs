//! Task domain record, draft, editable fields, and form intents.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{TaskId, UNSET};

/// Authoritative task record as served by the collection resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Server-assigned identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Priority option, or [`UNSET`].
    pub priority: String,
    /// Category option, or [`UNSET`].
    pub category: String,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
}

impl TaskRecord {
    /// Returns a copy with `completed` inverted and every other field kept.
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }

    /// Overwrites one editable field.
    pub fn set_field(&mut self, field: TaskField, value: impl Into<String>) {
        let value = value.into();
        match field {
            TaskField::Title => self.title = value,
            TaskField::Priority => self.priority = value,
            TaskField::Category => self.category = value,
        }
    }
}

/// In-progress form state for a record not yet created server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    /// Title typed so far.
    pub title: String,
    /// Selected priority, [`UNSET`] until chosen.
    pub priority: String,
    /// Selected category, [`UNSET`] until chosen.
    pub category: String,
}

impl Default for DraftRecord {
    fn default() -> Self {
        Self {
            title: String::new(),
            priority: UNSET.to_string(),
            category: UNSET.to_string(),
        }
    }
}

impl DraftRecord {
    /// True when the draft equals the empty default.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Overwrites one field.
    pub fn set_field(&mut self, field: TaskField, value: impl Into<String>) {
        let value = value.into();
        match field {
            TaskField::Title => self.title = value,
            TaskField::Priority => self.priority = value,
            TaskField::Category => self.category = value,
        }
    }

    /// Builds the create body, with `completed` fixed to `false`.
    pub fn to_new_task(&self) -> NewTask {
        NewTask {
            title: self.title.clone(),
            priority: self.priority.clone(),
            category: self.category.clone(),
            completed: false,
        }
    }
}

/// Create request body: a task record without an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Priority option.
    pub priority: String,
    /// Category option.
    pub category: String,
    /// Always `false` on creation.
    pub completed: bool,
}

/// Fields a form may change on a draft or an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    /// `title`.
    Title,
    /// `priority`.
    Priority,
    /// `category`.
    Category,
}

impl TaskField {
    /// Form control name for this field.
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Priority => "priority",
            Self::Category => "category",
        }
    }
}

/// Error for a form control name that is not an editable field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task field `{0}`")]
pub struct UnknownField(pub String);

impl FromStr for TaskField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "priority" => Ok(Self::Priority),
            "category" => Ok(Self::Category),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Structured form-submit intent.
///
/// Carries only whether default navigation should be suppressed; a submit
/// handler needs nothing else from the originating event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitIntent {
    /// Suppress the host's default navigation on submit.
    pub prevent_default: bool,
}

impl Default for SubmitIntent {
    fn default() -> Self {
        Self {
            prevent_default: true,
        }
    }
}
