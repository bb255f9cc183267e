use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use crate::{
    config::RuntimeConfig,
    core::store::{Confirm, DeleteOutcome, StoreError, TaskStore},
    edit::{EditController, EditError, EditSession},
    op::OpKind,
    task::{DraftRecord, SubmitIntent, TaskField, TaskRecord},
    types::{OptionSets, TaskId},
};

use super::events::TaskEvent;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("task list runtime is not running")]
    ChannelClosed,
}

/// Point-in-time copy of everything a view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    pub tasks: Vec<TaskRecord>,
    pub draft: DraftRecord,
    pub editing: Option<EditSession>,
    /// Choices for the priority and category selects.
    pub options: OptionSets,
}

#[derive(Clone)]
pub struct TaskListHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<TaskEvent>,
}

enum Command {
    Load {
        resp: oneshot::Sender<bool>,
    },
    SetDraftField {
        field: TaskField,
        value: String,
        resp: oneshot::Sender<()>,
    },
    SubmitDraft {
        intent: SubmitIntent,
        resp: oneshot::Sender<Result<TaskRecord, RuntimeError>>,
    },
    ConfirmDelete {
        id: TaskId,
        confirm: Box<dyn Confirm + Send>,
        resp: oneshot::Sender<Result<DeleteOutcome, RuntimeError>>,
    },
    ToggleCompleted {
        id: TaskId,
        resp: oneshot::Sender<Result<bool, RuntimeError>>,
    },
    StartEdit {
        id: TaskId,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    SetEditField {
        field: TaskField,
        value: String,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    CancelEdit {
        resp: oneshot::Sender<Option<TaskId>>,
    },
    SaveEdit {
        intent: SubmitIntent,
        resp: oneshot::Sender<Result<TaskId, RuntimeError>>,
    },
    Snapshot {
        resp: oneshot::Sender<ListSnapshot>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `store` into a single task that applies commands one at a time.
///
/// Every mutation runs to completion, remote call included, before the next
/// command is read, so the store and the edit controller are never touched
/// concurrently.
pub fn spawn_task_list(store: TaskStore, config: RuntimeConfig) -> TaskListHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<TaskEvent>(config.event_capacity.max(1));

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut store = store;
        let mut editor = EditController::with_options(store.options().clone());

        if config.load_on_start {
            load_and_report(&mut store, &events_tx_loop).await;
        }

        while let Some(cmd) = cmd_rx.recv().await {
            let done = handle_command(cmd, &mut store, &mut editor, &events_tx_loop).await;
            if done {
                break;
            }
        }
        debug!("task list runtime stopped");
    });

    TaskListHandle { cmd_tx, events_tx }
}

impl TaskListHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.events_tx.subscribe()
    }

    /// Re-fetches the collection. Returns false when the fetch failed.
    pub async fn load(&self) -> Result<bool, RuntimeError> {
        self.request(|resp| Command::Load { resp }).await
    }

    pub async fn set_draft_field(&self, field: TaskField, value: impl Into<String>) -> Result<(), RuntimeError> {
        let value = value.into();
        self.request(|resp| Command::SetDraftField { field, value, resp })
            .await
    }

    pub async fn submit_draft(&self, intent: SubmitIntent) -> Result<TaskRecord, RuntimeError> {
        self.request(|resp| Command::SubmitDraft { intent, resp })
            .await?
    }

    pub async fn confirm_delete(
        &self,
        id: impl Into<TaskId>,
        confirm: impl Confirm + Send + 'static,
    ) -> Result<DeleteOutcome, RuntimeError> {
        let id = id.into();
        let confirm: Box<dyn Confirm + Send> = Box::new(confirm);
        self.request(|resp| Command::ConfirmDelete { id, confirm, resp })
            .await?
    }

    pub async fn toggle_completed(&self, id: impl Into<TaskId>) -> Result<bool, RuntimeError> {
        let id = id.into();
        self.request(|resp| Command::ToggleCompleted { id, resp })
            .await?
    }

    /// Enters edit mode on the locally held record `id`.
    pub async fn start_edit(&self, id: impl Into<TaskId>) -> Result<(), RuntimeError> {
        let id = id.into();
        self.request(|resp| Command::StartEdit { id, resp }).await?
    }

    pub async fn set_edit_field(&self, field: TaskField, value: impl Into<String>) -> Result<(), RuntimeError> {
        let value = value.into();
        self.request(|resp| Command::SetEditField { field, value, resp })
            .await?
    }

    /// Leaves edit mode without saving. Returns the abandoned target, if any.
    pub async fn cancel_edit(&self) -> Result<Option<TaskId>, RuntimeError> {
        self.request(|resp| Command::CancelEdit { resp }).await
    }

    pub async fn save_edit(&self, intent: SubmitIntent) -> Result<TaskId, RuntimeError> {
        self.request(|resp| Command::SaveEdit { intent, resp })
            .await?
    }

    pub async fn snapshot(&self) -> Result<ListSnapshot, RuntimeError> {
        self.request(|resp| Command::Snapshot { resp }).await
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Shutdown { resp }).await
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

async fn handle_command(
    cmd: Command,
    store: &mut TaskStore,
    editor: &mut EditController,
    events_tx: &broadcast::Sender<TaskEvent>,
) -> bool {
    match cmd {
        Command::Load { resp } => {
            let refreshed = load_and_report(store, events_tx).await;
            let _ = resp.send(refreshed);
        }
        Command::SetDraftField { field, value, resp } => {
            store.set_draft_field(field, value);
            let _ = resp.send(());
        }
        Command::SubmitDraft { intent, resp } => {
            let res = store.submit_draft(intent).await;
            match &res {
                Ok(created) => {
                    let _ = events_tx.send(TaskEvent::Created {
                        id: created.id.clone(),
                    });
                }
                Err(err) => report_failure(events_tx, err),
            }
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::ConfirmDelete {
            id,
            mut confirm,
            resp,
        } => {
            let res = store.confirm_delete(&id, confirm.as_mut()).await;
            match &res {
                Ok(DeleteOutcome::Deleted) => {
                    let _ = events_tx.send(TaskEvent::Deleted { id });
                }
                Ok(DeleteOutcome::Declined) => {
                    let _ = events_tx.send(TaskEvent::DeleteDeclined { id });
                }
                Err(err) => report_failure(events_tx, err),
            }
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::ToggleCompleted { id, resp } => {
            let res = store.toggle_completed(&id).await;
            match &res {
                Ok(completed) => {
                    let _ = events_tx.send(TaskEvent::Toggled {
                        id,
                        completed: *completed,
                    });
                }
                Err(err) => report_failure(events_tx, err),
            }
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::StartEdit { id, resp } => {
            let res = match store.require(&id) {
                Ok(rec) => {
                    if let Some(abandoned) = editor.start_edit(rec) {
                        let _ = events_tx.send(TaskEvent::EditCancelled { id: abandoned });
                    }
                    let _ = events_tx.send(TaskEvent::EditStarted { id });
                    Ok(())
                }
                Err(err) => {
                    report_failure(events_tx, &err);
                    Err(RuntimeError::from(err))
                }
            };
            let _ = resp.send(res);
        }
        Command::SetEditField { field, value, resp } => {
            let res = editor.set_field(field, value).map_err(RuntimeError::from);
            let _ = resp.send(res);
        }
        Command::CancelEdit { resp } => {
            let abandoned = editor.cancel().map(|session| session.target_id().to_string());
            if let Some(id) = &abandoned {
                let _ = events_tx.send(TaskEvent::EditCancelled { id: id.clone() });
            }
            let _ = resp.send(abandoned);
        }
        Command::SaveEdit { intent, resp } => {
            let res = editor.save(store, intent).await;
            match &res {
                Ok(id) => {
                    let _ = events_tx.send(TaskEvent::Updated { id: id.clone() });
                }
                Err(EditError::Store(err)) => report_failure(events_tx, err),
                Err(_) => {}
            }
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::Snapshot { resp } => {
            let _ = resp.send(ListSnapshot {
                tasks: store.tasks().to_vec(),
                draft: store.draft().clone(),
                editing: editor.session().cloned(),
                options: store.options().clone(),
            });
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}

async fn load_and_report(store: &mut TaskStore, events_tx: &broadcast::Sender<TaskEvent>) -> bool {
    let refreshed = store.load().await;
    let evt = if refreshed {
        TaskEvent::Loaded { count: store.len() }
    } else {
        TaskEvent::SyncFailed { op: OpKind::List }
    };
    let _ = events_tx.send(evt);
    refreshed
}

fn report_failure(events_tx: &broadcast::Sender<TaskEvent>, err: &StoreError) {
    let evt = match err {
        StoreError::Remote(remote) => TaskEvent::SyncFailed {
            op: remote.op().kind(),
        },
        StoreError::NotFound(id) => TaskEvent::NotFound { id: id.clone() },
        StoreError::EmptyTitle | StoreError::UnknownField(_) => return,
    };
    let _ = events_tx.send(evt);
}
