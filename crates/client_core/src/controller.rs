//! The portal controller: explicit application state (visible panel, active
//! document, pending delete confirmation, in-flight guard) with one method
//! per user-triggered operation. Front ends own no document state of their
//! own; they render what these methods return.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use shared::{
    domain::{DocumentId, DocumentKind},
    protocol::DocumentPayload,
};
use tracing::{error, info};

use crate::{
    error::PortalError,
    view::{self, SuggestionView},
    PortalApi,
};

/// Shown in place of the saved list when the backend has no documents.
pub const EMPTY_LIST_MESSAGE: &str = "No documents saved yet.";

/// Placed in the raw input field after `view`: the original free text is not
/// recoverable from a saved structured document.
pub const LOADED_FROM_STORAGE_PLACEHOLDER: &str = "[Document loaded from storage]";

const UNTITLED_LABEL: &str = "Untitled";

/// Which panel is visible. The selector and the saved list always show
/// together, so two states cover the whole navigation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Selection,
    Form(DocumentKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSummary {
    pub id: DocumentId,
    pub kind: DocumentKind,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedList {
    pub entries: Vec<SavedSummary>,
}

impl SavedList {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of a successful export: the download bytes plus the filename the
/// front end should write them under.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Result of a successful `view`: everything a front end needs to switch to
/// the right form panel and render the stored suggestion.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub id: DocumentId,
    pub kind: DocumentKind,
    pub view: SuggestionView,
    pub input_placeholder: &'static str,
}

/// Download name for an exported document: `<kind>_<ISO-date>.docx`.
pub fn export_filename(kind: DocumentKind) -> String {
    format!("{}_{}.docx", kind.as_wire(), Utc::now().format("%Y-%m-%d"))
}

struct ControllerState {
    panel: Panel,
    active: Option<DocumentPayload>,
    pending_delete: Option<DocumentId>,
    in_flight: Option<&'static str>,
}

pub struct PortalController {
    api: Arc<dyn PortalApi>,
    // Held only for synchronous state reads/writes, never across an await.
    inner: Mutex<ControllerState>,
}

impl PortalController {
    pub fn new(api: Arc<dyn PortalApi>) -> Self {
        Self {
            api,
            inner: Mutex::new(ControllerState {
                panel: Panel::Selection,
                active: None,
                pending_delete: None,
                in_flight: None,
            }),
        }
    }

    pub fn panel(&self) -> Panel {
        self.lock().panel
    }

    pub fn active_document(&self) -> Option<DocumentPayload> {
        self.lock().active.clone()
    }

    pub fn pending_delete(&self) -> Option<DocumentId> {
        self.lock().pending_delete
    }

    pub fn in_flight(&self) -> Option<&'static str> {
        self.lock().in_flight
    }

    /// Show one of the two input forms. Pure navigation, no network.
    pub fn open_form(&self, kind: DocumentKind) {
        self.lock().panel = Panel::Form(kind);
    }

    /// Back to the selector: drops the active document, discards any pending
    /// delete, and refreshes the saved list. The navigation reset happens
    /// even when the refresh fails.
    pub async fn return_to_selection(&self) -> Result<SavedList, PortalError> {
        {
            let mut state = self.lock();
            state.panel = Panel::Selection;
            state.active = None;
            state.pending_delete = None;
        }
        self.refresh_list().await
    }

    /// Send raw form text for AI-assisted structuring. Empty input is a
    /// client-side validation failure and never reaches the network.
    pub async fn process(
        &self,
        kind: DocumentKind,
        input: &str,
    ) -> Result<SuggestionView, PortalError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PortalError::EmptyInput(match kind {
                DocumentKind::UserStory => "improvement request notes",
                DocumentKind::AcceptanceTerm => "Gherkin scenarios",
            }));
        }

        self.begin("process")?;
        let result = match kind {
            DocumentKind::UserStory => self
                .api
                .process_user_story(input)
                .await
                .map(DocumentPayload::UserStory),
            DocumentKind::AcceptanceTerm => self
                .api
                .process_acceptance_term(input)
                .await
                .map(DocumentPayload::AcceptanceTerm),
        };

        let mut state = self.finish();
        match result {
            Ok(payload) => {
                let suggestion = view::suggestion_view(&payload);
                state.active = Some(payload);
                state.panel = Panel::Form(kind);
                info!(kind = kind.as_wire(), "suggestion rendered");
                Ok(suggestion)
            }
            Err(err) => {
                error!(op = "process", kind = kind.as_wire(), %err, "portal operation failed");
                Err(err)
            }
        }
    }

    /// Persist the active document. The saved list is refreshed by the caller
    /// afterwards so a refresh failure cannot mask a successful save.
    pub async fn save(&self) -> Result<DocumentId, PortalError> {
        let payload = self
            .lock()
            .active
            .clone()
            .ok_or(PortalError::NoActiveDocument)?;
        self.begin("save")?;
        let result = self.api.create_document(&payload).await;
        self.finish();
        match &result {
            Ok(id) => info!(id = id.0, kind = payload.kind().as_wire(), "document saved"),
            Err(err) => error!(op = "save", %err, "portal operation failed"),
        }
        result
    }

    /// Export the active document as a .docx download.
    pub async fn export(&self) -> Result<ExportedFile, PortalError> {
        let payload = self
            .lock()
            .active
            .clone()
            .ok_or(PortalError::NoActiveDocument)?;
        self.begin("export")?;
        let result = self.api.export_document(&payload).await;
        self.finish();
        match result {
            Ok(bytes) => {
                let filename = export_filename(payload.kind());
                info!(filename, size = bytes.len(), "document exported");
                Ok(ExportedFile { filename, bytes })
            }
            Err(err) => {
                error!(op = "export", %err, "portal operation failed");
                Err(err)
            }
        }
    }

    /// Re-fetch the full saved list and derive display labels.
    pub async fn refresh_list(&self) -> Result<SavedList, PortalError> {
        self.begin("refresh_list")?;
        let result = self.api.list_documents().await;
        self.finish();
        match result {
            Ok(documents) => {
                let entries = documents
                    .iter()
                    .map(|saved| SavedSummary {
                        id: saved.id,
                        kind: saved.payload.kind(),
                        label: format!(
                            "{} - {}",
                            saved.payload.kind().list_tag(),
                            saved.payload.title().unwrap_or(UNTITLED_LABEL)
                        ),
                    })
                    .collect();
                Ok(SavedList { entries })
            }
            Err(err) => {
                error!(op = "refresh_list", %err, "portal operation failed");
                Err(err)
            }
        }
    }

    /// Load a saved document: replaces the active document, switches to the
    /// form panel of the record's kind, and renders the stored suggestion.
    pub async fn view(&self, id: DocumentId) -> Result<LoadedDocument, PortalError> {
        self.begin("view")?;
        let result = self.api.fetch_document(id).await;
        let mut state = self.finish();
        match result {
            Ok(saved) => {
                let kind = saved.payload.kind();
                let suggestion = view::suggestion_view(&saved.payload);
                state.active = Some(saved.payload);
                state.panel = Panel::Form(kind);
                info!(id = id.0, kind = kind.as_wire(), "saved document loaded");
                Ok(LoadedDocument {
                    id,
                    kind,
                    view: suggestion,
                    input_placeholder: LOADED_FROM_STORAGE_PLACEHOLDER,
                })
            }
            Err(err) => {
                error!(op = "view", id = id.0, %err, "portal operation failed");
                Err(err)
            }
        }
    }

    /// Arm the delete confirmation. No request is sent until
    /// [`confirm_delete`](Self::confirm_delete) runs.
    pub fn request_delete(&self, id: DocumentId) {
        self.lock().pending_delete = Some(id);
    }

    /// Decline the pending delete; no request is ever issued.
    pub fn cancel_delete(&self) {
        self.lock().pending_delete = None;
    }

    /// Issue the DELETE for the previously armed id. The confirmation is
    /// consumed whether the request succeeds or fails; a failed delete leaves
    /// the item listed.
    pub async fn confirm_delete(&self) -> Result<DocumentId, PortalError> {
        let id = self
            .lock()
            .pending_delete
            .take()
            .ok_or(PortalError::NoPendingDelete)?;
        self.begin("delete")?;
        let result = self.api.delete_document(id).await;
        self.finish();
        match result {
            Ok(()) => {
                info!(id = id.0, "document deleted");
                Ok(id)
            }
            Err(err) => {
                error!(op = "delete", id = id.0, %err, "portal operation failed");
                Err(err)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self, op: &'static str) -> Result<(), PortalError> {
        let mut state = self.lock();
        if let Some(current) = state.in_flight {
            return Err(PortalError::OperationInFlight(current));
        }
        state.in_flight = Some(op);
        Ok(())
    }

    fn finish(&self) -> MutexGuard<'_, ControllerState> {
        let mut state = self.lock();
        state.in_flight = None;
        state
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
