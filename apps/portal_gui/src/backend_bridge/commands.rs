//! Backend commands queued from UI interactions.

use std::path::PathBuf;

use shared::domain::{DocumentId, DocumentKind};

pub enum BackendCommand {
    OpenForm { kind: DocumentKind },
    ReturnToSelection,
    Process { kind: DocumentKind, input: String },
    Save,
    Export { dest: PathBuf },
    RefreshList,
    View { id: DocumentId },
    RequestDelete { id: DocumentId },
    CancelDelete,
    ConfirmDelete,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::OpenForm { .. } => "open_form",
            BackendCommand::ReturnToSelection => "return_to_selection",
            BackendCommand::Process { .. } => "process",
            BackendCommand::Save => "save",
            BackendCommand::Export { .. } => "export",
            BackendCommand::RefreshList => "refresh_list",
            BackendCommand::View { .. } => "view",
            BackendCommand::RequestDelete { .. } => "request_delete",
            BackendCommand::CancelDelete => "cancel_delete",
            BackendCommand::ConfirmDelete => "confirm_delete",
        }
    }
}
