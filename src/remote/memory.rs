use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use hashbrown::HashSet;

use crate::{
    op::{OpKind, RemoteOp},
    remote::{RemoteError, RemoteResult, TaskRemote},
    task::{DraftRecord, TaskRecord},
};

/// Status reported for injected failures.
pub const INJECTED_FAILURE_STATUS: u16 = 503;

#[derive(Debug, Default)]
struct MemoryState {
    tasks: Vec<TaskRecord>,
    next_id: u64,
    requests: Vec<RemoteOp>,
    fail_next: HashSet<OpKind>,
}

/// In-process stand-in for the collection resource.
///
/// Assigns sequential string ids, records every request it receives, and
/// can be told to fail the next call of a given kind.
#[derive(Debug)]
pub struct MemoryRemote {
    state: Mutex<MemoryState>,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    /// Seeds the resource. New ids continue after the largest numeric id,
    /// saturating at `u64::MAX`.
    pub fn with_tasks(tasks: Vec<TaskRecord>) -> Self {
        let next_id = tasks
            .iter()
            .filter_map(|t| t.id.parse::<u64>().ok())
            .max()
            .map_or(1, |max| max.saturating_add(1));
        Self {
            state: Mutex::new(MemoryState {
                tasks,
                next_id,
                ..MemoryState::default()
            }),
        }
    }

    /// Current server-side records.
    pub fn tasks(&self) -> Vec<TaskRecord> {
        self.lock().tasks.clone()
    }

    /// Every request received so far, failed ones included.
    pub fn requests(&self) -> Vec<RemoteOp> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    /// Makes the next call of `kind` answer with [`INJECTED_FAILURE_STATUS`].
    pub fn fail_next(&self, kind: OpKind) {
        self.lock().fail_next.insert(kind);
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, op: RemoteOp) -> RemoteResult<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock();
        state.requests.push(op.clone());
        if state.fail_next.remove(&op.kind()) {
            return Err(RemoteError::Status {
                op,
                status: INJECTED_FAILURE_STATUS,
            });
        }
        Ok(state)
    }

    fn replace(&self, op: RemoteOp, id: &str, record: &TaskRecord) -> RemoteResult<()> {
        let mut state = self.begin(op.clone())?;
        let Some(slot) = state.tasks.iter_mut().find(|t| t.id == id) else {
            return Err(RemoteError::Status { op, status: 404 });
        };
        *slot = TaskRecord {
            id: id.to_string(),
            ..record.clone()
        };
        Ok(())
    }
}

#[async_trait]
impl TaskRemote for MemoryRemote {
    async fn list_all(&self) -> RemoteResult<Vec<TaskRecord>> {
        let state = self.begin(RemoteOp::List)?;
        Ok(state.tasks.clone())
    }

    async fn create(&self, draft: &DraftRecord) -> RemoteResult<TaskRecord> {
        let mut state = self.begin(RemoteOp::Create)?;
        let id = state.next_id;
        state.next_id = id.saturating_add(1);

        let body = draft.to_new_task();
        let rec = TaskRecord {
            id: id.to_string(),
            title: body.title,
            priority: body.priority,
            category: body.category,
            completed: body.completed,
        };
        state.tasks.push(rec.clone());
        Ok(rec)
    }

    async fn update(&self, id: &str, record: &TaskRecord) -> RemoteResult<()> {
        self.replace(RemoteOp::Update { id: id.to_string() }, id, record)
    }

    async fn patch(&self, id: &str, record: &TaskRecord) -> RemoteResult<()> {
        self.replace(RemoteOp::Toggle { id: id.to_string() }, id, record)
    }

    async fn remove(&self, id: &str) -> RemoteResult<()> {
        let op = RemoteOp::Delete { id: id.to_string() };
        let mut state = self.begin(op.clone())?;
        let Some(pos) = state.tasks.iter().position(|t| t.id == id) else {
            return Err(RemoteError::Status { op, status: 404 });
        };
        state.tasks.remove(pos);
        Ok(())
    }
}
