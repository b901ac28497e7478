use std::sync::Arc;

use axum::{
    extract::{Json, State, rejection::JsonRejection},
    http::HeaderMap,
    response::Response,
};
use tracing::{info, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    middleware_layer::request_id::request_id,
    routes::history::{
        ingest_history_request::IngestHistoryRequest,
        ingest_history_response::IngestHistoryResponse,
    },
};

/// Index a JSONL file of historical tickets into the similarity collection.
#[instrument(name = "ingest_history_route", skip_all, fields(request_id = %request_id(&headers)))]
pub async fn ingest_history_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<IngestHistoryRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(req) = body?;
    if req.path.trim().is_empty() {
        return Err(AppError::BadRequest("path is empty".into()));
    }

    let written = state
        .index
        .ingest_file(&req.path, state.embedder.as_ref())
        .await?;
    let total = state.index.count().await?;
    info!(path = %req.path, written, total, "historical tickets indexed");

    Ok(ApiResponse::ok(IngestHistoryResponse {
        message: format!("Indexed {written} historical tickets"),
        collection: state.index.config().collection.clone(),
        points_written: written,
        total_indexed: total,
    }))
}
