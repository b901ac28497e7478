//! HTTP surface of the triage backend.

use std::{env, path::Path, sync::Arc};

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    middleware_layer::{json_extractor::json_error_mapper, request_id::attach_request_id},
    routes::{
        dashboard::dashboard_route::dashboard_route,
        health::health_route::health_route,
        history::ingest_history_route::ingest_history_route,
        tickets::tickets_route::{
            escalate_route, followup_route, get_ticket_route, list_tickets_route, resolve_route,
        },
        triage::triage_route::triage_route,
    },
};

/// Builds the router over an already constructed state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/triage", post(triage_route))
        .route("/tickets", get(list_tickets_route))
        .route("/tickets/{id}", get(get_ticket_route))
        .route("/tickets/{id}/followup", post(followup_route))
        .route("/tickets/{id}/resolve", post(resolve_route))
        .route("/tickets/{id}/escalate", post(escalate_route))
        .route("/dashboard", get(dashboard_route))
        .route("/history/ingest", post(ingest_history_route))
        .route("/health", get(health_route))
        .with_state(state)
        .layer(middleware::from_fn(json_error_mapper))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(attach_request_id))
}

pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").map_err(|_| AppError::MissingEnv("API_ADDRESS"))?;

    let state = Arc::new(AppState::from_env()?);
    index_history_if_empty(&state).await;

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "triage api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Seeds the collection from `HISTORY_JSONL_PATH` when it holds no points yet.
///
/// Failures are logged; the API still starts and falls back to the model.
async fn index_history_if_empty(state: &AppState) {
    let Ok(path) = env::var("HISTORY_JSONL_PATH") else {
        return;
    };
    if !Path::new(&path).exists() {
        warn!(path = %path, "HISTORY_JSONL_PATH does not exist, skipping startup ingest");
        return;
    }

    match state.index.count().await {
        Ok(0) => {}
        Ok(n) => {
            info!(indexed = n, "history collection already populated");
            return;
        }
        Err(e) => {
            warn!(error = %e, "could not count history collection, skipping startup ingest");
            return;
        }
    }

    match state.index.ingest_file(&path, state.embedder.as_ref()).await {
        Ok(n) => info!(path = %path, written = n, "startup history ingest done"),
        Err(e) => error!(path = %path, error = %e, "startup history ingest failed"),
    }
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests;
