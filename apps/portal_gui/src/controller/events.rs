//! Events flowing from the backend worker to the UI thread.

use std::path::PathBuf;

use client_core::{PortalError, SavedList, SuggestionView};
use shared::domain::{DocumentId, DocumentKind};

pub enum UiEvent {
    WorkerReady,
    SuggestionReady {
        kind: DocumentKind,
        view: SuggestionView,
    },
    DocumentLoaded {
        kind: DocumentKind,
        view: SuggestionView,
        input_placeholder: &'static str,
    },
    Saved {
        id: DocumentId,
    },
    Exported {
        path: PathBuf,
    },
    ListLoaded(SavedList),
    /// List refresh failed; the list area shows this inline instead of a
    /// blocking message.
    ListFailed(String),
    DeleteArmed {
        id: DocumentId,
    },
    DeleteCancelled,
    Deleted {
        id: DocumentId,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    WorkerStartup,
    Process,
    Save,
    Export,
    View,
    Delete,
}

impl UiErrorContext {
    fn action_label(&self) -> &'static str {
        match self {
            UiErrorContext::WorkerStartup => "start the backend worker",
            UiErrorContext::Process => "process the request",
            UiErrorContext::Save => "save the document",
            UiErrorContext::Export => "export the document",
            UiErrorContext::View => "load the document",
            UiErrorContext::Delete => "delete the document",
        }
    }
}

/// A user-facing failure: which action failed plus a one-line explanation.
/// Shown as a blocking message; the failed action must be re-triggered.
#[derive(Debug, Clone)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_portal(context: UiErrorContext, err: &PortalError) -> Self {
        Self {
            context,
            message: err.user_message(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn blocking_text(&self) -> String {
        format!("Could not {}.\n{}", self.context.action_label(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_text_names_the_failed_action() {
        let err = UiError::from_portal(UiErrorContext::Save, &PortalError::NoActiveDocument);
        let text = err.blocking_text();
        assert!(text.contains("save the document"));
        assert!(text.contains("no document is currently loaded"));
    }

    #[test]
    fn validation_failures_surface_the_field_name() {
        let err = UiError::from_portal(
            UiErrorContext::Process,
            &PortalError::EmptyInput("Gherkin scenarios"),
        );
        assert!(err.blocking_text().contains("Gherkin scenarios"));
    }
}
