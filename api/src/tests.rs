use std::sync::Arc;

use ai_llm_service::{LlmModelConfig, LlmProvider, LlmServiceProfiles};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use ticket_index::{EmbeddingsProvider, IndexConfig, IndexError, TicketIndex};
use ticket_store::TicketStore;
use tower::ServiceExt;
use triage_core::{
    AssignmentEngine, ChatTurn, IssueSummary, SimilarIssue, TriageConfig, TriageError,
    providers::{LanguageModel, ProviderFuture, SearchProvider, Summarizer},
};

use super::*;

struct StubSummarizer;

impl Summarizer for StubSummarizer {
    fn summarize<'a>(&'a self, _text: &'a str) -> ProviderFuture<'a, IssueSummary> {
        Box::pin(async {
            Ok(IssueSummary {
                summary: "Smart hub keeps going offline".into(),
                sentiment: "Annoyed".into(),
                priority: "High".into(),
                solution: "Power-cycle the hub.".into(),
                raw_response: String::new(),
            })
        })
    }
}

struct StubSearch {
    hits: Vec<SimilarIssue>,
    fail: bool,
}

impl SearchProvider for StubSearch {
    fn query<'a>(&'a self, _text: &'a str, _limit: usize) -> ProviderFuture<'a, Vec<SimilarIssue>> {
        Box::pin(async move {
            if self.fail {
                return Err(TriageError::dependency("similarity search", "qdrant down"));
            }
            Ok(self.hits.clone())
        })
    }
}

struct StubModel(&'static str);

impl LanguageModel for StubModel {
    fn complete<'a>(
        &'a self,
        _user_prompt: &'a str,
        _system_prompt: &'a str,
        _history: &'a [ChatTurn],
    ) -> ProviderFuture<'a, String> {
        Box::pin(async move { Ok(self.0.to_string()) })
    }
}

struct StubEmbedder;

impl EmbeddingsProvider for StubEmbedder {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>>
    {
        Box::pin(async { Ok(vec![0.0; 4]) })
    }
}

fn hit(team: &str, score: f64) -> SimilarIssue {
    SimilarIssue {
        id: Some("HIST_1".into()),
        issue_text: "Hub offline after update".into(),
        assigned_team: team.into(),
        ticket_open_timestamp: Some("2024-01-01 08:00:00".into()),
        ticket_resolve_timestamp: Some("2024-01-01 14:00:00".into()),
        similarity_score: score,
        solution: Some("Factory reset the hub".into()),
    }
}

fn unreachable_llm() -> LlmModelConfig {
    LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: "test".into(),
        endpoint: "http://127.0.0.1:9".into(),
        api_key: None,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(1),
    }
}

struct Harness {
    app: Router,
    _dir: tempfile::TempDir,
}

fn harness(hits: Vec<SimilarIssue>, fail_search: bool, reply: &'static str) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let llm = Arc::new(
        LlmServiceProfiles::new(unreachable_llm(), None, unreachable_llm(), Some(1)).unwrap(),
    );
    let model: Arc<dyn LanguageModel> = Arc::new(StubModel(reply));
    let state = AppState {
        engine: AssignmentEngine::new(
            Arc::new(StubSummarizer),
            Arc::new(StubSearch {
                hits,
                fail: fail_search,
            }),
            model.clone(),
        ),
        chat_model: model,
        store: TicketStore::open(dir.path().join("tickets.json")).unwrap(),
        index: Arc::new(
            TicketIndex::new(IndexConfig::new_default("http://127.0.0.1:6334", "test")).unwrap(),
        ),
        embedder: Arc::new(StubEmbedder),
        llm,
        triage: TriageConfig::default(),
    };
    Harness {
        app: router(Arc::new(state)),
        _dir: dir,
    }
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn triage_with_good_match_opens_ticket() {
    let h = harness(vec![hit("Device", 0.8), hit("Device", 0.6)], false, "");

    let (status, body) = call(&h.app, "POST", "/triage", Some(json!({"message": "My hub is offline"}))).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["ticket_id"], "TECH_200");
    assert_eq!(data["assignment"]["source"], "historical_data");
    assert_eq!(data["assignment"]["assigned_team"], "Device");
    assert_eq!(data["assignment"]["parsing_failed"], false);
    assert_eq!(data["estimated_resolution_time"], "6 hours");
    assert_eq!(data["common_solutions"][0]["solution"], "Factory reset the hub");

    let (status, ticket) = call(&h.app, "GET", "/tickets/TECH_200", None).await;
    assert_eq!(status, StatusCode::OK);
    let conversation = ticket["data"]["conversation"].as_array().unwrap();
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation[0]["role"], "user");
    assert_eq!(ticket["data"]["status"], "Open");
}

#[tokio::test]
async fn triage_without_good_match_uses_model_reply() {
    let reply = r#"```json
{"assigned_team": "Network", "estimated_resolution_hours": 30, "reason": "router"}
```"#;
    let h = harness(vec![hit("Device", 0.1)], false, reply);

    let (status, body) = call(&h.app, "POST", "/triage", Some(json!({"message": "wifi drops"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["assignment"]["source"], "llm");
    assert_eq!(body["data"]["assignment"]["reason"], "router");
    assert_eq!(body["data"]["estimated_resolution_time"], "2 days");
    assert!(body["data"]["common_solutions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unparsed_model_reply_falls_back_to_support_team() {
    let h = harness(Vec::new(), false, "I cannot decide");

    let (status, body) = call(&h.app, "POST", "/triage", Some(json!({"message": "help"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["assignment"]["parsing_failed"], true);
    assert_eq!(body["data"]["estimated_resolution_time"], "1 days");

    let (_, ticket) = call(&h.app, "GET", "/tickets/TECH_200", None).await;
    assert_eq!(ticket["data"]["assigned_team"], "Support");
}

#[tokio::test]
async fn triage_errors_use_envelope_and_status() {
    let h = harness(Vec::new(), true, "");

    let (status, body) = call(&h.app, "POST", "/triage", Some(json!({"message": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, body) = call(&h.app, "POST", "/triage", Some(json!({"message": "router down"}))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "DEPENDENCY_FAILED");

    let (status, body) = call(&h.app, "POST", "/triage", Some(json!({"text": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn followup_resolve_and_escalate() {
    let h = harness(vec![hit("Device", 0.9)], false, "Try holding reset for 10 seconds.");
    call(&h.app, "POST", "/triage", Some(json!({"message": "hub offline"}))).await;

    let (status, body) = call(
        &h.app,
        "POST",
        "/tickets/TECH_200/followup",
        Some(json!({"question": "Still offline, what now?"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reply"], "Try holding reset for 10 seconds.");

    let (status, body) = call(&h.app, "POST", "/tickets/TECH_200/escalate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Needs Human Agent");
    assert!(body["data"]["reply"].as_str().unwrap().contains("Device team"));

    let (status, body) = call(&h.app, "POST", "/tickets/TECH_200/resolve", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Resolved");

    let (status, _) = call(&h.app, "POST", "/tickets/TECH_200/resolve", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, ticket) = call(&h.app, "GET", "/tickets/TECH_200", None).await;
    assert_eq!(ticket["data"]["solution"], "Power-cycle the hub.");
    // user, assistant, follow-up question, answer, escalation, resolution
    assert_eq!(ticket["data"]["conversation"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn unknown_ticket_is_404() {
    let h = harness(Vec::new(), false, "");
    for (method, uri, body) in [
        ("GET", "/tickets/TECH_999", None),
        ("POST", "/tickets/TECH_999/followup", Some(json!({"question": "?"}))),
        ("POST", "/tickets/TECH_999/resolve", None),
        ("POST", "/tickets/TECH_999/escalate", None),
    ] {
        let (status, body) = call(&h.app, method, uri, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn search_and_dashboard() {
    let h = harness(vec![hit("Device", 0.9)], false, "");
    call(&h.app, "POST", "/triage", Some(json!({"message": "hub offline"}))).await;
    call(&h.app, "POST", "/triage", Some(json!({"message": "hub offline again"}))).await;
    call(&h.app, "POST", "/tickets/TECH_200/resolve", None).await;

    let (_, body) = call(&h.app, "GET", "/tickets?query=AGAIN", None).await;
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["tickets"][0]["ticket_id"], "TECH_201");

    let (_, body) = call(&h.app, "GET", "/tickets?query=hub&include_unresolved=false", None).await;
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["tickets"][0]["ticket_id"], "TECH_200");

    let (status, body) = call(&h.app, "GET", "/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["resolution_rate"], 50.0);
    assert_eq!(body["data"]["unresolved_by_team"]["Device"], 1);
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let h = harness(Vec::new(), false, "");

    let req = Request::builder()
        .uri("/dashboard")
        .header("X-Request-Id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let res = h.app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.headers()["X-Request-Id"], "abc-123");

    let req = Request::builder().uri("/dashboard").body(Body::empty()).unwrap();
    let res = h.app.clone().oneshot(req).await.unwrap();
    assert!(res.headers()["X-Request-Id"].to_str().unwrap().starts_with("req-"));
}
