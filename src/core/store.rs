use std::{fmt, sync::Arc};

use hashbrown::HashMap;
use tracing::{debug, info, warn};

use crate::{
    remote::{RemoteError, TaskRemote},
    task::{DraftRecord, SubmitIntent, TaskField, TaskRecord, UnknownField},
    types::{OptionSets, TaskId},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("task `{0}` is not in the local collection")]
    NotFound(TaskId),
    #[error("a title is required to create a task")]
    EmptyTitle,
    #[error(transparent)]
    UnknownField(#[from] UnknownField),
}

/// Blocking yes/no decision requested before a destructive call.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// A fixed answer.
impl Confirm for bool {
    fn confirm(&mut self, _prompt: &str) -> bool {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

/// Local copy of the task collection plus the new-task draft.
///
/// Reads that fail leave the collection as it was. Writes that fail leave
/// the collection and the draft as they were and hand the error back.
pub struct TaskStore {
    remote: Arc<dyn TaskRemote>,
    tasks: Vec<TaskRecord>,
    pos: HashMap<TaskId, usize>,
    draft: DraftRecord,
    options: OptionSets,
}

impl fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks)
            .field("draft", &self.draft)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl TaskStore {
    /// Empty store; nothing is fetched until [`TaskStore::load`].
    pub fn new(remote: Arc<dyn TaskRemote>) -> Self {
        Self {
            remote,
            tasks: Vec::new(),
            pos: HashMap::new(),
            draft: DraftRecord::default(),
            options: OptionSets::default(),
        }
    }

    pub fn with_options(mut self, options: OptionSets) -> Self {
        self.options = options;
        self
    }

    /// Builds a store and seeds it from the remote.
    pub async fn init(remote: Arc<dyn TaskRemote>) -> Self {
        let mut store = Self::new(remote);
        store.load().await;
        store
    }

    /// Replaces the collection with the remote's. Returns false, keeping the
    /// previous collection, when the fetch fails.
    pub async fn load(&mut self) -> bool {
        match self.remote.list_all().await {
            Ok(tasks) => {
                info!(count = tasks.len(), "task collection loaded");
                self.replace_all(tasks);
                true
            }
            Err(err) => {
                warn!(op = %err.op(), error = %err, "task fetch failed; keeping local collection");
                false
            }
        }
    }

    pub fn set_draft_field(&mut self, field: TaskField, value: impl Into<String>) {
        self.draft.set_field(field, value);
    }

    pub fn set_draft_field_named(&mut self, name: &str, value: impl Into<String>) -> Result<(), StoreError> {
        let field = name.parse::<TaskField>()?;
        self.set_draft_field(field, value);
        Ok(())
    }

    /// Creates a task from the draft and appends the server's record.
    pub async fn submit_draft(&mut self, intent: SubmitIntent) -> Result<TaskRecord, StoreError> {
        debug!(prevent_default = intent.prevent_default, "draft submitted");
        // Matches a `required` form input: whitespace alone counts as a title.
        if self.draft.title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }

        let created = self
            .remote
            .create(&self.draft)
            .await
            .inspect_err(log_write_failure)?;

        info!(id = %created.id, "task created");
        self.push(created.clone());
        self.draft = DraftRecord::default();
        Ok(created)
    }

    /// Deletes `id` once `confirm` agrees, then re-fetches.
    pub async fn confirm_delete(
        &mut self,
        id: &str,
        confirm: &mut (dyn Confirm + Send),
    ) -> Result<DeleteOutcome, StoreError> {
        let prompt = match self.get(id) {
            Some(rec) => format!("Delete task \"{}\"?", rec.title),
            None => "Delete this task?".to_string(),
        };
        if !confirm.confirm(&prompt) {
            debug!(id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        self.remote.remove(id).await.inspect_err(log_write_failure)?;
        info!(id, "task deleted");
        self.load().await;
        Ok(DeleteOutcome::Deleted)
    }

    /// Flips completion of `id` remotely, then re-fetches. Returns the
    /// completion value that was sent.
    pub async fn toggle_completed(&mut self, id: &str) -> Result<bool, StoreError> {
        let toggled = self.require(id)?.toggled();

        self.remote
            .patch(id, &toggled)
            .await
            .inspect_err(log_write_failure)?;
        info!(id, completed = toggled.completed, "task completion toggled");
        self.load().await;
        Ok(toggled.completed)
    }

    /// Sends `edited` as the full replacement for `target_id`, then re-fetches.
    ///
    /// An empty title is sent as-is; only the create path requires one.
    pub async fn save_edit(&mut self, target_id: &str, edited: &TaskRecord) -> Result<(), StoreError> {
        self.require(target_id)?;

        self.remote
            .update(target_id, edited)
            .await
            .inspect_err(log_write_failure)?;
        info!(id = target_id, "task updated");
        self.load().await;
        Ok(())
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&TaskRecord> {
        self.pos.get(id).and_then(|&idx| self.tasks.get(idx))
    }

    /// Locally held record `id`; a miss is logged and returned as
    /// [`StoreError::NotFound`].
    pub fn require(&self, id: &str) -> Result<&TaskRecord, StoreError> {
        self.get(id).ok_or_else(|| not_found(id))
    }

    pub fn get_cloned(&self, id: &str) -> Option<TaskRecord> {
        self.get(id).cloned()
    }

    pub fn draft(&self) -> &DraftRecord {
        &self.draft
    }

    pub fn options(&self) -> &OptionSets {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn replace_all(&mut self, tasks: Vec<TaskRecord>) {
        self.tasks = tasks;
        self.pos.clear();
        for (idx, rec) in self.tasks.iter().enumerate() {
            // Ids are trusted to be unique; on duplicates the first one wins.
            self.pos.entry(rec.id.clone()).or_insert(idx);
        }
    }

    fn push(&mut self, rec: TaskRecord) {
        self.pos.entry(rec.id.clone()).or_insert(self.tasks.len());
        self.tasks.push(rec);
    }
}

fn log_write_failure(err: &RemoteError) {
    warn!(op = %err.op(), error = %err, "remote write failed");
}

fn not_found(id: &str) -> StoreError {
    warn!(id, "task not in the local collection; no call made");
    StoreError::NotFound(id.to_string())
}
