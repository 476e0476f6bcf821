use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc, Mutex,
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::DocumentKind;
use tokio::net::TcpListener;

use super::*;

#[derive(Clone, Default)]
struct BackendState {
    docs: Arc<Mutex<Vec<(i64, Value)>>>,
    next_id: Arc<AtomicI64>,
    story_requests: Arc<Mutex<Vec<Value>>>,
    term_requests: Arc<Mutex<Vec<Value>>>,
}

fn story_response() -> Value {
    json!({
        "solicitado_por": "Finance team",
        "analista_responsavel": "A. Analyst",
        "casos_uso": "UC-12",
        "papel_perfil": "a report user",
        "acao_meta": "filter reports by month",
        "beneficio_razao": "close the month faster",
        "criterios_aceite": [{
            "cenario": "Filter applied",
            "dado": "an open report",
            "quando": "a month is chosen",
            "entao": "only that month shows"
        }],
        "tarefas": "- adjust query",
        "dependencias": "- none",
        "riscos": "- slow query"
    })
}

fn term_response() -> Value {
    json!({
        "informacoes_gerais": {"Sistema": "SPF", "Módulo": "Reports"},
        "tabela_testes": [{
            "Etapa": "1",
            "Executado por": "QA",
            "Descrição da Etapa": "open the report screen",
            "Resultado Esperado": "screen opens",
            "Resultado Obtido": "",
            "Status": "",
            "Observações": ""
        }]
    })
}

async fn process_story(
    State(state): State<BackendState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.story_requests.lock().unwrap().push(body);
    Json(story_response())
}

async fn process_term(State(state): State<BackendState>, Json(body): Json<Value>) -> Json<Value> {
    state.term_requests.lock().unwrap().push(body);
    Json(term_response())
}

async fn create_doc(State(state): State<BackendState>, Json(body): Json<Value>) -> Json<Value> {
    let id = state.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    state.docs.lock().unwrap().push((id, body.clone()));
    let mut record = body;
    record["id"] = json!(id);
    Json(record)
}

async fn list_docs(State(state): State<BackendState>) -> Json<Value> {
    let docs: Vec<Value> = state
        .docs
        .lock()
        .unwrap()
        .iter()
        .map(|(id, body)| {
            let mut record = body.clone();
            record["id"] = json!(id);
            record
        })
        .collect();
    Json(json!(docs))
}

async fn fetch_doc(
    State(state): State<BackendState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    state
        .docs
        .lock()
        .unwrap()
        .iter()
        .find(|(doc_id, _)| *doc_id == id)
        .map(|(doc_id, body)| {
            let mut record = body.clone();
            record["id"] = json!(doc_id);
            Json(record)
        })
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_doc(
    State(state): State<BackendState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut docs = state.docs.lock().unwrap();
    let before = docs.len();
    docs.retain(|(doc_id, _)| *doc_id != id);
    if docs.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn export_doc(Json(_body): Json<Value>) -> Vec<u8> {
    b"PK\x03\x04 fake docx".to_vec()
}

async fn spawn_backend(state: BackendState) -> String {
    let app = Router::new()
        .route("/api/processar-historia-usuario", post(process_story))
        .route("/api/processar-termo-aceite", post(process_term))
        .route("/api/documentos", get(list_docs).post(create_doc))
        .route("/api/documentos/:id", get(fetch_doc).delete(delete_doc))
        .route("/api/exportar-documento", post(export_doc))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_failing_backend() -> String {
    async fn fail() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
    let app = Router::new()
        .route("/api/processar-historia-usuario", post(fail))
        .route("/api/documentos", get(fail).post(fail))
        .route("/api/exportar-documento", post(fail));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn process_user_story_posts_the_contract_body() {
    let state = BackendState::default();
    let base = spawn_backend(state.clone()).await;
    let api = HttpPortalApi::new(base);

    let payload = api.process_user_story("Add login button").await.unwrap();

    assert_eq!(payload.requested_by, "Finance team");
    assert_eq!(payload.acceptance_criteria.len(), 1);
    assert_eq!(
        state.story_requests.lock().unwrap().as_slice(),
        [json!({"anotacoes": "Add login button"})]
    );
}

#[tokio::test]
async fn process_acceptance_term_posts_the_contract_body() {
    let state = BackendState::default();
    let base = spawn_backend(state.clone()).await;
    let api = HttpPortalApi::new(base);

    let payload = api
        .process_acceptance_term("Scenario: login works")
        .await
        .unwrap();

    assert_eq!(payload.test_steps[0].executor, "QA");
    assert_eq!(
        state.term_requests.lock().unwrap().as_slice(),
        [json!({"cenarios_gherkin": "Scenario: login works"})]
    );
}

#[tokio::test]
async fn save_list_view_delete_cycle_round_trips() {
    let base = spawn_backend(BackendState::default()).await;
    let api = HttpPortalApi::new(base);

    let payload: DocumentPayload = serde_json::from_value(json!({
        "tipo": "termo_aceite",
        "data": term_response(),
    }))
    .unwrap();

    let id = api.create_document(&payload).await.unwrap();

    let listed = api.list_documents().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].payload.kind(), DocumentKind::AcceptanceTerm);

    let fetched = api.fetch_document(id).await.unwrap();
    assert_eq!(fetched.payload, payload);

    api.delete_document(id).await.unwrap();
    assert!(api.list_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn export_returns_the_binary_stream() {
    let base = spawn_backend(BackendState::default()).await;
    let api = HttpPortalApi::new(base);

    let payload = DocumentPayload::UserStory(serde_json::from_value(story_response()).unwrap());
    let bytes = api.export_document(&payload).await.unwrap();

    assert_eq!(bytes, b"PK\x03\x04 fake docx");
}

#[tokio::test]
async fn any_non_2xx_status_is_failure() {
    let base = spawn_failing_backend().await;
    let api = HttpPortalApi::new(base);

    assert!(matches!(
        api.process_user_story("notes").await.unwrap_err(),
        PortalError::Http { .. }
    ));
    assert!(matches!(
        api.list_documents().await.unwrap_err(),
        PortalError::Http { .. }
    ));
    let payload = DocumentPayload::UserStory(serde_json::from_value(story_response()).unwrap());
    assert!(matches!(
        api.export_document(&payload).await.unwrap_err(),
        PortalError::Http { .. }
    ));
}

#[tokio::test]
async fn fetching_a_missing_document_is_failure() {
    let base = spawn_backend(BackendState::default()).await;
    let api = HttpPortalApi::new(base);

    assert!(matches!(
        api.fetch_document(DocumentId(999)).await.unwrap_err(),
        PortalError::Http { .. }
    ));
}

#[tokio::test]
async fn sparse_process_response_passes_the_boundary() {
    async fn sparse_story() -> Json<Value> {
        Json(json!({
            "analista_responsavel": "A. Analyst",
            "casos_uso": "UC-12"
        }))
    }
    let app = Router::new().route("/api/processar-historia-usuario", post(sparse_story));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let api = HttpPortalApi::new(format!("http://{addr}"));
    let payload = api.process_user_story("notes").await.unwrap();

    // Absent fields stay empty rather than failing validation.
    assert_eq!(payload.analyst, "A. Analyst");
    assert!(payload.requested_by.is_empty());
    assert!(payload.role.is_empty());
    assert!(payload.acceptance_criteria.is_empty());
}

#[tokio::test]
async fn degenerate_process_response_is_rejected_at_the_boundary() {
    async fn empty_story() -> Json<Value> {
        Json(json!({}))
    }
    let app = Router::new().route("/api/processar-historia-usuario", post(empty_story));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let api = HttpPortalApi::new(format!("http://{addr}"));
    assert!(matches!(
        api.process_user_story("notes").await.unwrap_err(),
        PortalError::InvalidPayload { .. }
    ));
}
