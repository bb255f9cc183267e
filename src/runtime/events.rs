//! Runtime event stream payloads.

use crate::{op::OpKind, types::TaskId};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    /// The collection was replaced by a successful fetch.
    Loaded {
        /// Records now held locally.
        count: usize,
    },
    /// A remote call failed; local state was left as it was.
    SyncFailed {
        /// Kind of call that failed.
        op: OpKind,
    },
    /// The targeted task is not held locally; no remote call was made.
    NotFound {
        /// Requested task id.
        id: TaskId,
    },
    /// A new task was created and appended.
    Created {
        /// Server-assigned id.
        id: TaskId,
    },
    /// Edited fields of a task were saved.
    Updated {
        /// Saved task id.
        id: TaskId,
    },
    /// Completion of a task was flipped.
    Toggled {
        /// Toggled task id.
        id: TaskId,
        /// Completion value sent to the server.
        completed: bool,
    },
    /// A task was deleted after confirmation.
    Deleted {
        /// Deleted task id.
        id: TaskId,
    },
    /// Deletion was declined at the confirmation prompt.
    DeleteDeclined {
        /// Task that was kept.
        id: TaskId,
    },
    /// Edit mode was entered for a task.
    EditStarted {
        /// Task being edited.
        id: TaskId,
    },
    /// Edit mode was left without saving.
    EditCancelled {
        /// Task whose edits were discarded.
        id: TaskId,
    },
}
