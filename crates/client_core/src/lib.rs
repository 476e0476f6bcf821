//! Headless portal client: the HTTP seam to the document backend plus the
//! controller state machine and the suggestion view layer built on top of it.

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::DocumentId,
    protocol::{
        AcceptanceTermPayload, CreateDocumentResponse, DocumentPayload,
        ProcessAcceptanceTermRequest, ProcessUserStoryRequest, SavedDocument, UserStoryPayload,
    },
};
use tracing::debug;

pub mod controller;
pub mod error;
pub mod view;

pub use controller::{
    export_filename, ExportedFile, LoadedDocument, Panel, PortalController, SavedList,
    SavedSummary, EMPTY_LIST_MESSAGE, LOADED_FROM_STORAGE_PLACEHOLDER,
};
pub use error::PortalError;
pub use view::{Block, SuggestionView};

const PROCESS_USER_STORY_PATH: &str = "/api/processar-historia-usuario";
const PROCESS_ACCEPTANCE_TERM_PATH: &str = "/api/processar-termo-aceite";
const DOCUMENTS_PATH: &str = "/api/documentos";
const EXPORT_DOCUMENT_PATH: &str = "/api/exportar-documento";

/// Seam to the backend document service. One method per contract operation;
/// any non-2xx status is failure, with no status-specific branching.
#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn process_user_story(&self, notes: &str) -> Result<UserStoryPayload, PortalError>;
    async fn process_acceptance_term(
        &self,
        gherkin_scenarios: &str,
    ) -> Result<AcceptanceTermPayload, PortalError>;
    async fn create_document(&self, payload: &DocumentPayload) -> Result<DocumentId, PortalError>;
    async fn list_documents(&self) -> Result<Vec<SavedDocument>, PortalError>;
    async fn fetch_document(&self, id: DocumentId) -> Result<SavedDocument, PortalError>;
    async fn delete_document(&self, id: DocumentId) -> Result<(), PortalError>;
    async fn export_document(&self, payload: &DocumentPayload) -> Result<Vec<u8>, PortalError>;
}

/// reqwest-backed implementation of [`PortalApi`].
pub struct HttpPortalApi {
    http: Client,
    base_url: String,
}

impl HttpPortalApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl PortalApi for HttpPortalApi {
    async fn process_user_story(&self, notes: &str) -> Result<UserStoryPayload, PortalError> {
        let endpoint = PROCESS_USER_STORY_PATH;
        debug!(endpoint, "processing user story notes");
        let payload: UserStoryPayload = self
            .http
            .post(self.url(endpoint))
            .json(&ProcessUserStoryRequest {
                notes: notes.to_string(),
            })
            .send()
            .await
            .map_err(|err| PortalError::http(endpoint, err))?
            .error_for_status()
            .map_err(|err| PortalError::http(endpoint, err))?
            .json()
            .await
            .map_err(|err| PortalError::http(endpoint, err))?;
        ensure_user_story_shape(endpoint, &payload)?;
        Ok(payload)
    }

    async fn process_acceptance_term(
        &self,
        gherkin_scenarios: &str,
    ) -> Result<AcceptanceTermPayload, PortalError> {
        let endpoint = PROCESS_ACCEPTANCE_TERM_PATH;
        debug!(endpoint, "processing gherkin scenarios");
        let payload: AcceptanceTermPayload = self
            .http
            .post(self.url(endpoint))
            .json(&ProcessAcceptanceTermRequest {
                gherkin_scenarios: gherkin_scenarios.to_string(),
            })
            .send()
            .await
            .map_err(|err| PortalError::http(endpoint, err))?
            .error_for_status()
            .map_err(|err| PortalError::http(endpoint, err))?
            .json()
            .await
            .map_err(|err| PortalError::http(endpoint, err))?;
        ensure_acceptance_term_shape(endpoint, &payload)?;
        Ok(payload)
    }

    async fn create_document(&self, payload: &DocumentPayload) -> Result<DocumentId, PortalError> {
        let endpoint = DOCUMENTS_PATH;
        let created: CreateDocumentResponse = self
            .http
            .post(self.url(endpoint))
            .json(payload)
            .send()
            .await
            .map_err(|err| PortalError::http(endpoint, err))?
            .error_for_status()
            .map_err(|err| PortalError::http(endpoint, err))?
            .json()
            .await
            .map_err(|err| PortalError::http(endpoint, err))?;
        debug!(endpoint, id = created.id.0, "document created");
        Ok(created.id)
    }

    async fn list_documents(&self) -> Result<Vec<SavedDocument>, PortalError> {
        let endpoint = DOCUMENTS_PATH;
        self.http
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|err| PortalError::http(endpoint, err))?
            .error_for_status()
            .map_err(|err| PortalError::http(endpoint, err))?
            .json()
            .await
            .map_err(|err| PortalError::http(endpoint, err))
    }

    async fn fetch_document(&self, id: DocumentId) -> Result<SavedDocument, PortalError> {
        let endpoint = format!("{DOCUMENTS_PATH}/{id}");
        let saved: SavedDocument = self
            .http
            .get(self.url(&endpoint))
            .send()
            .await
            .map_err(|err| PortalError::http(&endpoint, err))?
            .error_for_status()
            .map_err(|err| PortalError::http(&endpoint, err))?
            .json()
            .await
            .map_err(|err| PortalError::http(&endpoint, err))?;
        ensure_document_shape(&endpoint, &saved.payload)?;
        Ok(saved)
    }

    async fn delete_document(&self, id: DocumentId) -> Result<(), PortalError> {
        let endpoint = format!("{DOCUMENTS_PATH}/{id}");
        self.http
            .delete(self.url(&endpoint))
            .send()
            .await
            .map_err(|err| PortalError::http(&endpoint, err))?
            .error_for_status()
            .map_err(|err| PortalError::http(&endpoint, err))?;
        debug!(endpoint, "document deleted");
        Ok(())
    }

    async fn export_document(&self, payload: &DocumentPayload) -> Result<Vec<u8>, PortalError> {
        let endpoint = EXPORT_DOCUMENT_PATH;
        let bytes = self
            .http
            .post(self.url(endpoint))
            .json(payload)
            .send()
            .await
            .map_err(|err| PortalError::http(endpoint, err))?
            .error_for_status()
            .map_err(|err| PortalError::http(endpoint, err))?
            .bytes()
            .await
            .map_err(|err| PortalError::http(endpoint, err))?;
        debug!(endpoint, size = bytes.len(), "export stream received");
        Ok(bytes.to_vec())
    }
}

// Boundary checks: individual fields may be absent (they render as empty
// text), but a payload carrying none of the expected structure means the
// response came from somewhere other than the processing pipeline.

fn ensure_user_story_shape(endpoint: &str, payload: &UserStoryPayload) -> Result<(), PortalError> {
    let any_text = [
        &payload.requested_by,
        &payload.analyst,
        &payload.use_cases,
        &payload.role,
        &payload.goal,
        &payload.benefit,
        &payload.tasks,
        &payload.dependencies,
        &payload.risks,
    ]
    .iter()
    .any(|field| !field.trim().is_empty());
    if any_text || !payload.acceptance_criteria.is_empty() {
        return Ok(());
    }
    Err(PortalError::invalid_payload(
        endpoint,
        "user story response carries none of the expected fields",
    ))
}

fn ensure_acceptance_term_shape(
    endpoint: &str,
    payload: &AcceptanceTermPayload,
) -> Result<(), PortalError> {
    if payload.general_info.is_empty() && payload.test_steps.is_empty() {
        return Err(PortalError::invalid_payload(
            endpoint,
            "acceptance term response carries no general info and no test steps",
        ));
    }
    Ok(())
}

fn ensure_document_shape(endpoint: &str, payload: &DocumentPayload) -> Result<(), PortalError> {
    match payload {
        DocumentPayload::UserStory(story) => ensure_user_story_shape(endpoint, story),
        DocumentPayload::AcceptanceTerm(term) => ensure_acceptance_term_shape(endpoint, term),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
