use std::sync::Arc;

use axum::{
    extract::{Json, State, rejection::JsonRejection},
    http::HeaderMap,
    response::Response,
};
use ticket_store::NewTicket;
use tracing::{info, instrument};
use triage_core::{
    replies::{displayed_hours, initial_reply},
    solutions::{common_solutions, format_resolution_time},
};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    middleware_layer::request_id::request_id,
    routes::triage::{
        triage_request::TriageRequest,
        triage_response::{AssignmentView, TriageResponse},
    },
};

/// Team used on the ticket when the model reply could not be parsed.
const FALLBACK_TEAM: &str = "Support";

/// Triage a new issue and open a ticket for it.
///
/// Summarizes the message, assigns a team, opens a ticket and logs the
/// customer message plus the assistant reply on it.
#[instrument(name = "triage_route", skip_all, fields(request_id = %request_id(&headers)))]
pub async fn triage_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<TriageRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(req) = body?;
    let limit = req.candidate_limit.unwrap_or(state.triage.candidate_limit);

    let outcome = state.engine.triage(&req.message, &req.history, limit).await?;
    let hours = displayed_hours(&outcome.assignment);
    let team = outcome
        .assignment
        .assigned_team()
        .unwrap_or(FALLBACK_TEAM)
        .to_string();

    let ticket_id = state
        .store
        .create_ticket(NewTicket {
            issue_summary: outcome.summary.summary.clone(),
            sentiment: outcome.summary.sentiment.clone(),
            priority: outcome.summary.priority.clone(),
            assigned_team: team.clone(),
            suggested_solution: outcome.summary.solution.clone(),
            estimated_resolution_hours: Some(hours),
        })
        .await?;

    let reply = initial_reply(&outcome.summary, &outcome.assignment);
    state.store.append_message(&ticket_id, "user", &req.message).await?;
    state.store.append_message(&ticket_id, "assistant", &reply).await?;

    info!(
        ticket_id = %ticket_id,
        team = %team,
        source = ?outcome.assignment.source(),
        parsing_failed = outcome.assignment.parsing_failed(),
        "ticket opened"
    );

    let body = TriageResponse {
        ticket_id,
        assignment: AssignmentView::from(&outcome.assignment),
        common_solutions: common_solutions(
            outcome.assignment.similar_issues(),
            state.triage.common_solution_limit,
        ),
        estimated_resolution_time: format_resolution_time(hours),
        reply,
        summary: outcome.summary.into(),
    };

    Ok(ApiResponse::ok(body))
}
