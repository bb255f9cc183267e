//! Remote operation model: one variant per call against the collection resource.

use std::fmt;

use reqwest::Method;

use crate::types::TaskId;

/// Path of the task collection resource.
pub const COLLECTION_PATH: &str = "/tasks";

/// A single call against the collection resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    /// `GET /tasks`.
    List,
    /// `POST /tasks`.
    Create,
    /// `PUT /tasks/{id}`.
    Update {
        /// Target task.
        id: TaskId,
    },
    /// `PATCH /tasks/{id}`.
    Toggle {
        /// Target task.
        id: TaskId,
    },
    /// `DELETE /tasks/{id}`.
    Delete {
        /// Target task.
        id: TaskId,
    },
}

/// Operation kind without its target, used for failure injection and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// List all tasks.
    List,
    /// Create one task.
    Create,
    /// Replace one task.
    Update,
    /// Flip completion of one task.
    Toggle,
    /// Delete one task.
    Delete,
}

impl RemoteOp {
    /// HTTP method of the call.
    pub fn method(&self) -> Method {
        match self {
            Self::List => Method::GET,
            Self::Create => Method::POST,
            Self::Update { .. } => Method::PUT,
            Self::Toggle { .. } => Method::PATCH,
            Self::Delete { .. } => Method::DELETE,
        }
    }

    /// Resource path relative to the host. The id is percent-encoded into
    /// a single segment.
    pub fn path(&self) -> String {
        match self {
            Self::List | Self::Create => COLLECTION_PATH.to_string(),
            Self::Update { id } | Self::Toggle { id } | Self::Delete { id } => {
                format!("{COLLECTION_PATH}/{}", urlencoding::encode(id))
            }
        }
    }

    /// Kind of this operation.
    pub fn kind(&self) -> OpKind {
        match self {
            Self::List => OpKind::List,
            Self::Create => OpKind::Create,
            Self::Update { .. } => OpKind::Update,
            Self::Toggle { .. } => OpKind::Toggle,
            Self::Delete { .. } => OpKind::Delete,
        }
    }
}

impl fmt::Display for RemoteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Toggle => "toggle",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}
