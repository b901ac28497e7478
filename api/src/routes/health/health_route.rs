use std::sync::Arc;

use ai_llm_service::health_service::HealthStatus;
use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"` when every probe passed, `"degraded"` otherwise.
    pub status: &'static str,
    pub llm: Vec<HealthStatus>,
    pub index: IndexHealth,
    pub tickets: TicketCounts,
}

#[derive(Debug, Serialize)]
pub struct IndexHealth {
    pub collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TicketCounts {
    pub unresolved: usize,
    pub resolved: usize,
}

/// Probes every LLM profile and the ticket index. Always `200`; read `status`.
pub async fn health_route(State(state): State<Arc<AppState>>) -> Response {
    let llm = state.llm.health_all().await;
    let index = match state.index.count().await {
        Ok(n) => IndexHealth {
            collection: state.index.config().collection.clone(),
            indexed: Some(n),
            error: None,
        },
        Err(e) => IndexHealth {
            collection: state.index.config().collection.clone(),
            indexed: None,
            error: Some(e.to_string()),
        },
    };

    let ok = llm.iter().all(|h| h.ok) && index.error.is_none();
    let tickets = TicketCounts {
        unresolved: state.store.unresolved().await.len(),
        resolved: state.store.resolved().await.len(),
    };

    ApiResponse::success(HealthResponse {
        status: if ok { "ok" } else { "degraded" },
        llm,
        index,
        tickets,
    })
    .into_response_with_status(StatusCode::OK)
}
