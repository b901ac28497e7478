use std::sync::Arc;

use axum::{extract::State, response::Response};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
};

/// Ticket analytics for the admin dashboard.
pub async fn dashboard_route(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    Ok(ApiResponse::ok(state.store.dashboard_overview().await))
}
