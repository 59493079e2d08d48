//! Per-resource-kind dashboard view.
//!
//! Composes the collection cache, the row edit controller and the page-level
//! state (create form draft, `saving` flag, inline action message). Every
//! action follows the same order: validate, then one gateway call, then on
//! success revalidate the cache. Errors never escape as panics; each one is
//! converted to the view's inline message and also returned to the caller.
//!
//! The `saving` flag allows one create/save/delete at a time per view.

use std::sync::{Mutex, MutexGuard, PoisonError};

use stockroom_core::{RecordId, Resource, ResourceKind, ValidationError};
use thiserror::Error;

use crate::cache::{CacheSnapshot, ResourceCache};
use crate::editor::{EditError, RowEditor, RowState};
use crate::gateway::{Gateway, GatewayError};
use crate::session::SessionError;

/// Explicit operator confirmation for destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another mutation is in flight in this view.
    #[error("another change is still being saved")]
    Busy,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Edit(#[from] EditError),

    /// The request failed; carries the message shown to the operator.
    #[error("{0}")]
    Server(String),

    /// The change was applied but the list could not be refreshed; the
    /// previous list is still shown.
    #[error("{0}")]
    StaleCache(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The operator declined; nothing was sent.
    Declined,
}

/// What the list area should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Failed(String),
    Empty,
    Populated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row<R: Resource> {
    pub record: R,
    pub state: RowState<R::Draft>,
}

/// Everything needed to draw one resource-kind view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel<R: Resource> {
    pub status: ListStatus,
    /// Rows in display order, each with its edit state.
    pub rows: Vec<Row<R>>,
    /// Set when the latest fetch failed, including while stale rows are shown.
    pub fetch_error: Option<String>,
    pub loading: bool,
    pub saving: bool,
    pub action_error: Option<String>,
    pub create_draft: R::Draft,
}

impl<R: Resource> ViewModel<R> {
    fn build(snapshot: CacheSnapshot<R>, page: &PageState<R::Draft>) -> Self {
        let status = match (&snapshot.data, &snapshot.error) {
            (Some(data), _) if data.is_empty() => ListStatus::Empty,
            (Some(_), _) => ListStatus::Populated,
            (None, Some(error)) if !snapshot.loading => ListStatus::Failed(error.clone()),
            (None, _) => ListStatus::Loading,
        };

        let mut records = snapshot.data.unwrap_or_default();
        R::sort_for_display(&mut records);
        let rows = records
            .into_iter()
            .map(|record| {
                let state = page.editor.state(record.id());
                Row { record, state }
            })
            .collect();

        Self {
            status,
            rows,
            fetch_error: snapshot.error,
            loading: snapshot.loading,
            saving: page.saving,
            action_error: page.action_error.clone(),
            create_draft: page.create_draft.clone(),
        }
    }
}

#[derive(Debug)]
struct PageState<D> {
    editor: RowEditor<D>,
    create_draft: D,
    saving: bool,
    action_error: Option<String>,
}

impl<D: Clone + Default> Default for PageState<D> {
    fn default() -> Self {
        Self {
            editor: RowEditor::new(),
            create_draft: D::default(),
            saving: false,
            action_error: None,
        }
    }
}

#[derive(Debug)]
pub struct ResourceView<R: Resource> {
    gateway: Gateway,
    cache: ResourceCache<R>,
    page: Mutex<PageState<R::Draft>>,
}

impl<R: Resource> ResourceView<R> {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            cache: ResourceCache::new(gateway.clone()),
            gateway,
            page: Mutex::new(PageState::default()),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    pub fn cache(&self) -> &ResourceCache<R> {
        &self.cache
    }

    /// Requires a signed-in session, then loads the collection.
    pub async fn mount(&self) -> Result<ViewModel<R>, ActionError> {
        self.gateway.session().require()?;
        self.cache.load().await;
        Ok(self.view_model())
    }

    /// Operator-initiated revalidate. Failures show up as `fetch_error`.
    pub async fn refresh(&self) -> ViewModel<R> {
        let _ = self.cache.invalidate().await;
        self.view_model()
    }

    pub fn view_model(&self) -> ViewModel<R> {
        let snapshot = self.cache.snapshot();
        ViewModel::build(snapshot, &self.page())
    }

    pub fn row_state(&self, id: &RecordId) -> RowState<R::Draft> {
        self.page().editor.state(id)
    }

    pub fn action_error(&self) -> Option<String> {
        self.page().action_error.clone()
    }

    pub fn is_saving(&self) -> bool {
        self.page().saving
    }

    /// Edit the "new record" form.
    pub fn edit_create_draft(&self, f: impl FnOnce(&mut R::Draft)) {
        f(&mut self.page().create_draft);
    }

    /// Validate the create form and submit it.
    ///
    /// Returns the server-assigned id when the response carries one.
    pub async fn create(&self) -> Result<Option<RecordId>, ActionError> {
        let payload = {
            let mut page = self.page();
            if page.saving {
                return Err(ActionError::Busy);
            }
            page.action_error = None;
            let payload = match R::validate(&page.create_draft) {
                Ok(payload) => payload,
                Err(e) => {
                    page.action_error = Some(e.to_string());
                    return Err(e.into());
                }
            };
            page.saving = true;
            payload
        };

        let result = self
            .gateway
            .create::<_, serde_json::Value>(R::KIND.path(), &payload)
            .await;

        match result {
            Ok(created) => {
                let id = created
                    .get("id")
                    .and_then(|id| id.as_str())
                    .and_then(|id| id.parse::<RecordId>().ok());
                tracing::info!(
                    kind = %R::KIND,
                    id = id.as_ref().map(RecordId::as_str).unwrap_or(""),
                    "record created"
                );
                let refresh = self.cache.invalidate().await;
                let mut page = self.page();
                page.create_draft = R::Draft::default();
                Self::settle(&mut page, refresh)?;
                Ok(id)
            }
            Err(e) => Err(self.fail(e, "create")),
        }
    }

    /// Enter inline edit on `id`, snapshotting its current values.
    ///
    /// Any other row being edited loses its unsaved draft.
    pub fn start_edit(&self, id: &RecordId) -> Result<(), ActionError> {
        let record = self
            .cache
            .snapshot()
            .data
            .and_then(|records| records.into_iter().find(|r| r.id() == id))
            .ok_or_else(|| EditError::UnknownRecord(id.clone()))?;
        self.page().editor.start_edit(id.clone(), record.to_draft())?;
        Ok(())
    }

    /// Change the draft of the row being edited.
    pub fn edit_draft(&self, id: &RecordId, f: impl FnOnce(&mut R::Draft)) -> Result<(), ActionError> {
        let mut page = self.page();
        f(page.editor.draft_mut(id)?);
        Ok(())
    }

    pub fn cancel_edit(&self, id: &RecordId) -> Result<(), ActionError> {
        self.page().editor.cancel(id)?;
        Ok(())
    }

    /// Validate the row's draft and submit it as an update.
    ///
    /// Validation failure keeps the row in `Editing` with the message inline.
    /// A failed request puts the row back in `Editing` with its draft intact.
    pub async fn save(&self, id: &RecordId) -> Result<(), ActionError> {
        let payload = {
            let mut page = self.page();
            if page.saving {
                return Err(ActionError::Busy);
            }
            page.action_error = None;
            let draft = page.editor.draft(id)?;
            let payload = match R::validate(&draft) {
                Ok(payload) => payload,
                Err(e) => {
                    page.editor.reject(id, e.to_string())?;
                    page.action_error = Some(e.to_string());
                    return Err(e.into());
                }
            };
            page.editor.begin_save(id)?;
            page.saving = true;
            payload
        };

        let result = self
            .gateway
            .update::<_, serde_json::Value>(R::KIND.path(), id, &payload)
            .await;

        match result {
            Ok(_) => {
                tracing::info!(kind = %R::KIND, id = %id, "record updated");
                let refresh = self.cache.invalidate().await;
                let mut page = self.page();
                page.editor.save_succeeded(id)?;
                Self::settle(&mut page, refresh)
            }
            Err(e) => {
                let message = self.failure_message(&e, "update");
                self.page().editor.save_failed(id, message)?;
                Err(self.fail(e, "update"))
            }
        }
    }

    /// Delete `id` after explicit confirmation.
    ///
    /// Only rows in `Viewing` can be deleted. A declined confirmation sends
    /// nothing. After a successful delete the edit target is reset if its
    /// record disappeared from the refreshed list.
    pub async fn delete(&self, id: &RecordId, confirm: &dyn Confirm) -> Result<DeleteOutcome, ActionError> {
        {
            let page = self.page();
            if page.saving {
                return Err(ActionError::Busy);
            }
            page.editor.ensure_viewing(id)?;
        }

        if !confirm.confirm(&R::KIND.delete_prompt()) {
            tracing::debug!(kind = %R::KIND, id = %id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        {
            let mut page = self.page();
            if page.saving {
                return Err(ActionError::Busy);
            }
            page.action_error = None;
            page.saving = true;
        }

        match self.gateway.delete(R::KIND.path(), id).await {
            Ok(()) => {
                tracing::info!(kind = %R::KIND, id = %id, "record deleted");
                let refresh = self.cache.invalidate().await;
                let mut page = self.page();
                if let Ok(snapshot) = &refresh {
                    let remaining = snapshot.data.as_deref().unwrap_or_default();
                    page.editor
                        .retain_existing(|rid| remaining.iter().any(|r| r.id() == rid));
                }
                Self::settle(&mut page, refresh)?;
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => Err(self.fail(e, "delete")),
        }
    }

    /// Drop cached data and all page state (sign-out).
    pub fn reset(&self) {
        self.cache.reset();
        *self.page() = PageState::default();
    }

    /// Finish a successful mutation: clear `saving`, report a failed refresh.
    fn settle(
        page: &mut PageState<R::Draft>,
        refresh: Result<CacheSnapshot<R>, GatewayError>,
    ) -> Result<(), ActionError> {
        page.saving = false;
        match refresh {
            Ok(_) => Ok(()),
            Err(e) => {
                let message = format!(
                    "Saved, but {} could not be refreshed: {}",
                    R::KIND.plural(),
                    e.server_message().unwrap_or("request failed")
                );
                page.action_error = Some(message.clone());
                Err(ActionError::StaleCache(message))
            }
        }
    }

    /// Record a failed request: clear `saving`, show the message inline.
    fn fail(&self, err: GatewayError, verb: &str) -> ActionError {
        let message = self.failure_message(&err, verb);
        tracing::warn!(kind = %R::KIND, action = verb, error = %err, "mutation failed");
        let mut page = self.page();
        page.saving = false;
        page.action_error = Some(message.clone());
        ActionError::Server(message)
    }

    /// Server-supplied message, else `Failed to {verb} {noun}`.
    fn failure_message(&self, err: &GatewayError, verb: &str) -> String {
        err.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Failed to {verb} {}", R::KIND.singular()))
    }

    fn page(&self) -> MutexGuard<'_, PageState<R::Draft>> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
