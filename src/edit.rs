//! Inline edit state machine: at most one record is being edited at a time.

use tracing::debug;

use crate::{
    core::store::{StoreError, TaskStore},
    task::{SubmitIntent, TaskField, TaskRecord, UnknownField},
    types::{OptionSets, TaskId},
};

/// In-progress edits to one record.
///
/// `working_copy` is an owned snapshot; the collection keeps showing the
/// stored record until a save commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    target_id: TaskId,
    working_copy: TaskRecord,
}

impl EditSession {
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn working_copy(&self) -> &TaskRecord {
        &self.working_copy
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Viewing,
    Editing(EditSession),
}

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("no edit session is active")]
    NotEditing,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    UnknownField(#[from] UnknownField),
}

/// Tracks which record, if any, is in edit mode.
#[derive(Debug, Default)]
pub struct EditController {
    state: EditState,
    options: OptionSets,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller whose select fields offer `options`.
    pub fn with_options(options: OptionSets) -> Self {
        Self {
            state: EditState::Viewing,
            options,
        }
    }

    /// Choices the edit form offers for `field`; `None` for free text.
    pub fn choices(&self, field: TaskField) -> Option<&[String]> {
        self.options.choices(field)
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            EditState::Viewing => None,
            EditState::Editing(session) => Some(session),
        }
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.session().map(EditSession::target_id)
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.editing_id() == Some(id)
    }

    pub fn working_copy(&self) -> Option<&TaskRecord> {
        self.session().map(EditSession::working_copy)
    }

    /// Enters edit mode on `record`. Any active session is dropped without
    /// saving; its target id is returned.
    pub fn start_edit(&mut self, record: &TaskRecord) -> Option<TaskId> {
        let session = EditSession {
            target_id: record.id.clone(),
            working_copy: record.clone(),
        };
        let previous = std::mem::replace(&mut self.state, EditState::Editing(session));
        debug!(id = %record.id, "edit started");
        match previous {
            EditState::Viewing => None,
            EditState::Editing(abandoned) => Some(abandoned.target_id),
        }
    }

    pub fn set_field(&mut self, field: TaskField, value: impl Into<String>) -> Result<(), EditError> {
        match &mut self.state {
            EditState::Viewing => Err(EditError::NotEditing),
            EditState::Editing(session) => {
                session.working_copy.set_field(field, value);
                Ok(())
            }
        }
    }

    pub fn set_field_named(&mut self, name: &str, value: impl Into<String>) -> Result<(), EditError> {
        let field = name.parse::<TaskField>()?;
        self.set_field(field, value)
    }

    /// Leaves edit mode, discarding the working copy.
    pub fn cancel(&mut self) -> Option<EditSession> {
        match std::mem::take(&mut self.state) {
            EditState::Viewing => None,
            EditState::Editing(session) => {
                debug!(id = %session.target_id, "edit cancelled");
                Some(session)
            }
        }
    }

    /// Sends the working copy through [`TaskStore::save_edit`].
    ///
    /// Edit mode ends as soon as the update call succeeds; the follow-up
    /// re-fetch is not waited on for confirmation. On failure the session
    /// is kept so the user can retry.
    pub async fn save(&mut self, store: &mut TaskStore, intent: SubmitIntent) -> Result<TaskId, EditError> {
        let EditState::Editing(session) = &self.state else {
            return Err(EditError::NotEditing);
        };
        debug!(
            id = %session.target_id,
            prevent_default = intent.prevent_default,
            "edit submitted"
        );
        let target_id = session.target_id.clone();
        let edited = session.working_copy.clone();

        store.save_edit(&target_id, &edited).await?;
        self.state = EditState::Viewing;
        Ok(target_id)
    }
}
