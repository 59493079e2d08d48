//! Row edit controller.
//!
//! Tracks, per record id, whether a row is being viewed, edited or saved.
//! Rows missing from the map are `Viewing`. At most one row is ever in
//! `Editing` or `Saving`; starting an edit elsewhere discards the previous
//! draft.
//!
//! Transitions:
//!
//! ```text
//! Viewing --start_edit--> Editing --begin_save--> Saving --save_succeeded--> Viewing
//!                         |  ^  \                   |
//!                  cancel |  |   reject (stays)     | save_failed
//!                         v  +----------------------+
//!                      Viewing
//! ```

use std::collections::HashMap;

use stockroom_core::RecordId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowState<D> {
    Viewing,
    Editing { draft: D, error: Option<String> },
    Saving { draft: D },
}

impl<D> RowState<D> {
    pub fn is_viewing(&self) -> bool {
        matches!(self, RowState::Viewing)
    }

    pub fn draft(&self) -> Option<&D> {
        match self {
            RowState::Viewing => None,
            RowState::Editing { draft, .. } | RowState::Saving { draft } => Some(draft),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("record {0} is not being edited")]
    NotEditing(RecordId),
    #[error("record {0} is being edited; save or cancel first")]
    NotViewing(RecordId),
    #[error("record {0} is being saved")]
    Saving(RecordId),
    #[error("record {0} is not in the list")]
    UnknownRecord(RecordId),
}

#[derive(Debug, Clone)]
pub struct RowEditor<D> {
    rows: HashMap<RecordId, RowState<D>>,
}

impl<D> Default for RowEditor<D> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }
}

impl<D: Clone> RowEditor<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: &RecordId) -> RowState<D> {
        self.rows.get(id).cloned().unwrap_or(RowState::Viewing)
    }

    /// The row currently in `Editing` or `Saving`, if any.
    pub fn active(&self) -> Option<(&RecordId, &RowState<D>)> {
        self.rows.iter().next()
    }

    pub fn active_id(&self) -> Option<&RecordId> {
        self.active().map(|(id, _)| id)
    }

    /// Enter `Editing` on `id` with `draft` as the snapshot of its values.
    ///
    /// Any other row in `Editing` goes back to `Viewing`; its id is returned.
    /// Restarting an edit on the same row re-snapshots the draft.
    pub fn start_edit(&mut self, id: RecordId, draft: D) -> Result<Option<RecordId>, EditError> {
        if let Some((saving, RowState::Saving { .. })) = self.active() {
            return Err(EditError::Saving(saving.clone()));
        }

        let discarded = self.active_id().filter(|active| **active != id).cloned();
        if let Some(previous) = &discarded {
            tracing::debug!(record = %previous, "discarding unsaved draft");
        }

        self.rows.clear();
        self.rows.insert(id, RowState::Editing { draft, error: None });
        Ok(discarded)
    }

    /// Mutable access to the draft of a row in `Editing`.
    pub fn draft_mut(&mut self, id: &RecordId) -> Result<&mut D, EditError> {
        match self.rows.get_mut(id) {
            Some(RowState::Editing { draft, .. }) => Ok(draft),
            Some(RowState::Saving { .. }) => Err(EditError::Saving(id.clone())),
            _ => Err(EditError::NotEditing(id.clone())),
        }
    }

    /// Copy of the draft of a row in `Editing`.
    pub fn draft(&self, id: &RecordId) -> Result<D, EditError> {
        match self.rows.get(id) {
            Some(RowState::Editing { draft, .. }) => Ok(draft.clone()),
            Some(RowState::Saving { .. }) => Err(EditError::Saving(id.clone())),
            _ => Err(EditError::NotEditing(id.clone())),
        }
    }

    /// Stay in `Editing` and show `message` inline (validation failure).
    pub fn reject(&mut self, id: &RecordId, message: impl Into<String>) -> Result<(), EditError> {
        match self.rows.get_mut(id) {
            Some(RowState::Editing { error, .. }) => {
                *error = Some(message.into());
                Ok(())
            }
            Some(RowState::Saving { .. }) => Err(EditError::Saving(id.clone())),
            _ => Err(EditError::NotEditing(id.clone())),
        }
    }

    /// `Editing` → `Saving`. Returns the draft being submitted.
    pub fn begin_save(&mut self, id: &RecordId) -> Result<D, EditError> {
        let draft = self.draft(id)?;
        self.rows.insert(id.clone(), RowState::Saving { draft: draft.clone() });
        Ok(draft)
    }

    /// `Saving` → `Viewing`; the draft is dropped.
    pub fn save_succeeded(&mut self, id: &RecordId) -> Result<(), EditError> {
        match self.rows.get(id) {
            Some(RowState::Saving { .. }) => {
                self.rows.remove(id);
                Ok(())
            }
            _ => Err(EditError::NotEditing(id.clone())),
        }
    }

    /// `Saving` → `Editing`, keeping the draft and showing `message` inline.
    pub fn save_failed(&mut self, id: &RecordId, message: impl Into<String>) -> Result<(), EditError> {
        match self.rows.remove(id) {
            Some(RowState::Saving { draft }) => {
                self.rows.insert(
                    id.clone(),
                    RowState::Editing {
                        draft,
                        error: Some(message.into()),
                    },
                );
                Ok(())
            }
            Some(other) => {
                self.rows.insert(id.clone(), other);
                Err(EditError::NotEditing(id.clone()))
            }
            None => Err(EditError::NotEditing(id.clone())),
        }
    }

    /// `Editing` → `Viewing` without any request.
    pub fn cancel(&mut self, id: &RecordId) -> Result<(), EditError> {
        match self.rows.get(id) {
            Some(RowState::Editing { .. }) => {
                self.rows.remove(id);
                Ok(())
            }
            Some(RowState::Saving { .. }) => Err(EditError::Saving(id.clone())),
            _ => Err(EditError::NotEditing(id.clone())),
        }
    }

    /// Deletes are only offered on rows in `Viewing`.
    pub fn ensure_viewing(&self, id: &RecordId) -> Result<(), EditError> {
        match self.rows.get(id) {
            None | Some(RowState::Viewing) => Ok(()),
            Some(RowState::Saving { .. }) => Err(EditError::Saving(id.clone())),
            Some(RowState::Editing { .. }) => Err(EditError::NotViewing(id.clone())),
        }
    }

    /// Drop the active target if its record is no longer present.
    ///
    /// Returns the id that was reset.
    pub fn retain_existing(&mut self, exists: impl Fn(&RecordId) -> bool) -> Option<RecordId> {
        let gone = self.active_id().filter(|id| !exists(*id)).cloned()?;
        self.rows.remove(&gone);
        tracing::debug!(record = %gone, "edit target no longer exists; reset");
        Some(gone)
    }

    /// Back to `Viewing` everywhere.
    pub fn reset(&mut self) {
        self.rows.clear();
    }
}
