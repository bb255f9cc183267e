//! Client seam for the `/tasks` collection resource.

/// Reqwest-backed client.
pub mod http;
/// In-process stand-in for the collection resource.
pub mod memory;

use async_trait::async_trait;

use crate::{
    op::RemoteOp,
    task::{DraftRecord, TaskRecord},
};

/// Failure of one call against the collection resource.
///
/// Any non-2xx status is a failure; the status code is carried for logging
/// only and nothing branches on it.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The request never produced a response.
    #[error("{op}: transport error: {source}")]
    Transport {
        /// Call that failed.
        op: RemoteOp,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("{op}: server returned status {status}")]
    Status {
        /// Call that failed.
        op: RemoteOp,
        /// HTTP status code.
        status: u16,
    },
    /// The response body was not the expected JSON.
    #[error("{op}: malformed response body: {source}")]
    Decode {
        /// Call that failed.
        op: RemoteOp,
        /// JSON decode error.
        #[source]
        source: serde_json::Error,
    },
}

impl RemoteError {
    /// Call that produced this error.
    pub fn op(&self) -> &RemoteOp {
        match self {
            Self::Transport { op, .. } | Self::Status { op, .. } | Self::Decode { op, .. } => op,
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Client for the remote task collection resource.
///
/// Each method maps to exactly one request. Implementations never retry,
/// time out on their own, or de-duplicate.
#[async_trait]
pub trait TaskRemote: Send + Sync {
    /// Fetches every task in server order.
    async fn list_all(&self) -> RemoteResult<Vec<TaskRecord>>;

    /// Creates a task from `draft` with `completed: false` and returns the stored record.
    async fn create(&self, draft: &DraftRecord) -> RemoteResult<TaskRecord>;

    /// Replaces the task `id` with `record`.
    async fn update(&self, id: &str, record: &TaskRecord) -> RemoteResult<()>;

    /// Sends `record` (completion already flipped) for the task `id`.
    async fn patch(&self, id: &str, record: &TaskRecord) -> RemoteResult<()>;

    /// Deletes the task `id`.
    async fn remove(&self, id: &str) -> RemoteResult<()>;
}
