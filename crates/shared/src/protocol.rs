//! Wire models for the portal backend contract.
//!
//! Field names are the backend's own (Portuguese) and are pinned with serde
//! renames; Rust-side names stay idiomatic. Every payload field defaults when
//! absent so a sparse backend response still deserializes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{DocumentId, DocumentKind};

/// Body of `POST /api/processar-historia-usuario`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessUserStoryRequest {
    #[serde(rename = "anotacoes")]
    pub notes: String,
}

/// Body of `POST /api/processar-termo-aceite`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessAcceptanceTermRequest {
    #[serde(rename = "cenarios_gherkin")]
    pub gherkin_scenarios: String,
}

/// One scenario of the user-story acceptance-criteria sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceCriterion {
    #[serde(default, rename = "cenario")]
    pub scenario: String,
    #[serde(default, rename = "dado")]
    pub given: String,
    #[serde(default, rename = "quando")]
    pub when: String,
    #[serde(default, rename = "entao")]
    pub then: String,
}

/// Structured suggestion returned by the user-story processing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStoryPayload {
    #[serde(default, rename = "solicitado_por")]
    pub requested_by: String,
    #[serde(default, rename = "analista_responsavel")]
    pub analyst: String,
    #[serde(default, rename = "casos_uso")]
    pub use_cases: String,
    #[serde(default, rename = "papel_perfil")]
    pub role: String,
    #[serde(default, rename = "acao_meta")]
    pub goal: String,
    #[serde(default, rename = "beneficio_razao")]
    pub benefit: String,
    #[serde(default, rename = "criterios_aceite")]
    pub acceptance_criteria: Vec<AcceptanceCriterion>,
    #[serde(default, rename = "tarefas")]
    pub tasks: String,
    #[serde(default, rename = "dependencias")]
    pub dependencies: String,
    #[serde(default, rename = "riscos")]
    pub risks: String,
}

/// One row of the acceptance-term test table. The column headings double as
/// wire keys, capitalization and accents included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStepRow {
    #[serde(default, rename = "Etapa")]
    pub step: String,
    #[serde(default, rename = "Executado por")]
    pub executor: String,
    #[serde(default, rename = "Descrição da Etapa")]
    pub description: String,
    #[serde(default, rename = "Resultado Esperado")]
    pub expected_result: String,
    #[serde(default, rename = "Resultado Obtido")]
    pub obtained_result: String,
    #[serde(default, rename = "Status")]
    pub status: String,
    #[serde(default, rename = "Observações")]
    pub observations: String,
}

/// Structured suggestion returned by the acceptance-term processing endpoint.
/// `general_info` keeps backend key order (serde_json `preserve_order`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceTermPayload {
    #[serde(default, rename = "informacoes_gerais")]
    pub general_info: Map<String, Value>,
    #[serde(default, rename = "tabela_testes")]
    pub test_steps: Vec<TestStepRow>,
}

/// The `{tipo, data}` envelope used by the save and export endpoints. The
/// adjacent tagging makes the variant shape follow the kind tag, so a saved
/// acceptance term can never deserialize into user-story fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipo", content = "data")]
pub enum DocumentPayload {
    #[serde(rename = "historia_usuario")]
    UserStory(UserStoryPayload),
    #[serde(rename = "termo_aceite")]
    AcceptanceTerm(AcceptanceTermPayload),
}

impl DocumentPayload {
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentPayload::UserStory(_) => DocumentKind::UserStory,
            DocumentPayload::AcceptanceTerm(_) => DocumentKind::AcceptanceTerm,
        }
    }

    /// Best-effort title for list labels: the requester for user stories, the
    /// "Sistema" general-info entry for acceptance terms.
    pub fn title(&self) -> Option<&str> {
        match self {
            DocumentPayload::UserStory(story) => {
                let requested_by = story.requested_by.trim();
                (!requested_by.is_empty()).then_some(requested_by)
            }
            DocumentPayload::AcceptanceTerm(term) => term
                .general_info
                .get("Sistema")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|title| !title.is_empty()),
        }
    }
}

/// A server-owned record: `{id, tipo, data}` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedDocument {
    pub id: DocumentId,
    #[serde(flatten)]
    pub payload: DocumentPayload,
}

/// Response of `POST /api/documentos`; remaining fields of the created record
/// are ignored, only the assigned id matters to the client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentResponse {
    pub id: DocumentId,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn user_story_envelope_uses_contract_field_names() {
        let payload = DocumentPayload::UserStory(UserStoryPayload {
            requested_by: "Finance team".into(),
            role: "analyst".into(),
            goal: "filter reports".into(),
            benefit: "close the month faster".into(),
            acceptance_criteria: vec![AcceptanceCriterion {
                scenario: "Filter by month".into(),
                given: "an open report".into(),
                when: "a month is selected".into(),
                then: "only that month is shown".into(),
            }],
            ..Default::default()
        });

        let wire = serde_json::to_value(&payload).unwrap();
        assert_eq!(wire["tipo"], "historia_usuario");
        assert_eq!(wire["data"]["solicitado_por"], "Finance team");
        assert_eq!(wire["data"]["papel_perfil"], "analyst");
        assert_eq!(wire["data"]["criterios_aceite"][0]["cenario"], "Filter by month");
        assert_eq!(wire["data"]["criterios_aceite"][0]["entao"], "only that month is shown");
    }

    #[test]
    fn acceptance_term_rows_use_table_headings_as_keys() {
        let wire = json!({
            "tipo": "termo_aceite",
            "data": {
                "informacoes_gerais": {"Sistema": "SPF", "Módulo": "Reports"},
                "tabela_testes": [{
                    "Etapa": "1",
                    "Executado por": "QA",
                    "Descrição da Etapa": "open the report",
                    "Resultado Esperado": "report opens",
                    "Resultado Obtido": "",
                    "Status": "",
                    "Observações": ""
                }]
            }
        });

        let payload: DocumentPayload = serde_json::from_value(wire.clone()).unwrap();
        let DocumentPayload::AcceptanceTerm(term) = &payload else {
            panic!("expected acceptance term variant");
        };
        assert_eq!(term.test_steps[0].executor, "QA");
        assert_eq!(term.general_info.keys().next().map(String::as_str), Some("Sistema"));
        assert_eq!(payload.title(), Some("SPF"));

        // Round-trips back to the identical envelope shape.
        assert_eq!(serde_json::to_value(&payload).unwrap(), wire);
    }

    #[test]
    fn sparse_payload_fields_default_to_empty() {
        let payload: UserStoryPayload =
            serde_json::from_value(json!({"solicitado_por": "someone"})).unwrap();
        assert_eq!(payload.requested_by, "someone");
        assert!(payload.analyst.is_empty());
        assert!(payload.acceptance_criteria.is_empty());
    }

    #[test]
    fn saved_document_flattens_envelope_next_to_id() {
        let wire = json!({
            "id": 42,
            "tipo": "historia_usuario",
            "data": {"solicitado_por": "someone"}
        });
        let saved: SavedDocument = serde_json::from_value(wire).unwrap();
        assert_eq!(saved.id, DocumentId(42));
        assert_eq!(saved.payload.kind(), DocumentKind::UserStory);
        assert_eq!(saved.payload.title(), Some("someone"));
    }

    #[test]
    fn untitled_documents_have_no_title() {
        let story = DocumentPayload::UserStory(UserStoryPayload::default());
        assert_eq!(story.title(), None);

        let term = DocumentPayload::AcceptanceTerm(AcceptanceTermPayload::default());
        assert_eq!(term.title(), None);
    }
}
