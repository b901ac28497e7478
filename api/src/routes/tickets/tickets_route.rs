use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State, rejection::{JsonRejection, QueryRejection}},
    http::HeaderMap,
    response::Response,
};
use ticket_store::{ConversationMessage, Ticket};
use tracing::{debug, info, instrument};
use triage_core::{
    ChatRole, ChatTurn, DEFAULT_RESOLUTION_HOURS,
    followup::{FollowupContext, answer_followup, recent_context},
    replies::{RESOLVED_REPLY, escalation_reply},
    solutions::format_resolution_time,
};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    middleware_layer::request_id::request_id,
    routes::tickets::{
        followup_request::FollowupRequest,
        search_tickets_query::SearchTicketsQuery,
        ticket_response::{TicketActionResponse, TicketListResponse},
    },
};

const DEFAULT_TEAM: &str = "support";

fn turn(m: &ConversationMessage) -> Option<ChatTurn> {
    let role = match m.role.as_str() {
        "user" => ChatRole::User,
        "assistant" => ChatRole::Assistant,
        "system" => ChatRole::System,
        _ => return None,
    };
    Some(ChatTurn::new(role, m.content.clone()))
}

fn team_of(ticket: &Ticket) -> &str {
    match ticket.assigned_team.trim() {
        "" => DEFAULT_TEAM,
        t => t,
    }
}

async fn existing(state: &AppState, id: &str) -> AppResult<Ticket> {
    state
        .store
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("ticket {id}")))
}

/// Answer a follow-up question using the ticket's recent conversation.
#[instrument(name = "followup_route", skip_all, fields(request_id = %request_id(&headers), ticket_id = %id))]
pub async fn followup_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<FollowupRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(req) = body?;
    if req.question.trim().is_empty() {
        return Err(AppError::BadRequest("follow-up question is empty".into()));
    }

    existing(&state, &id).await?;
    state.store.append_message(&id, "user", &req.question).await?;
    let ticket = existing(&state, &id).await?;

    let history: Vec<ChatTurn> = ticket.conversation.iter().filter_map(turn).collect();
    let ctx = FollowupContext {
        recent: recent_context(&history, state.triage.followup_turns),
        initial_question: ticket.initial_question().unwrap_or_default().to_string(),
        issue_summary: ticket.issue_summary.clone(),
        suggested_solution: ticket.suggested_solution.clone(),
        assigned_team: Some(team_of(&ticket).to_string()),
        question: req.question,
    };

    let answer = answer_followup(state.chat_model.as_ref(), &ctx).await?;
    state.store.append_message(&id, "assistant", &answer).await?;
    debug!(answer_len = answer.len(), "follow-up answered");

    Ok(ApiResponse::ok(TicketActionResponse {
        ticket_id: id,
        status: ticket.status,
        reply: answer,
        estimated_resolution_time: None,
    }))
}

/// The suggested fix worked: close the ticket with it.
#[instrument(name = "resolve_route", skip_all, fields(request_id = %request_id(&headers), ticket_id = %id))]
pub async fn resolve_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let resolved = state.store.resolve_with_suggestion(&id).await?;
    state.store.append_message(&id, "assistant", RESOLVED_REPLY).await?;
    info!(team = %resolved.assigned_team, "ticket resolved");

    Ok(ApiResponse::ok(TicketActionResponse {
        ticket_id: id,
        status: resolved.status,
        reply: RESOLVED_REPLY.to_string(),
        estimated_resolution_time: None,
    }))
}

/// Hand the ticket to a human agent of the assigned team.
#[instrument(name = "escalate_route", skip_all, fields(request_id = %request_id(&headers), ticket_id = %id))]
pub async fn escalate_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let ticket = state.store.flag_for_human_agent(&id).await?;
    let hours = ticket
        .estimated_resolution_hours
        .unwrap_or(DEFAULT_RESOLUTION_HOURS);
    let reply = escalation_reply(&id, team_of(&ticket), hours);
    state.store.append_message(&id, "assistant", &reply).await?;
    info!(team = %ticket.assigned_team, "ticket escalated to a human agent");

    Ok(ApiResponse::ok(TicketActionResponse {
        ticket_id: id,
        status: ticket.status,
        reply,
        estimated_resolution_time: Some(format_resolution_time(hours)),
    }))
}

pub async fn list_tickets_route(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchTicketsQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(q) = query?;
    let tickets = state
        .store
        .search(&q.query, q.include_resolved, q.include_unresolved)
        .await;

    Ok(ApiResponse::ok(TicketListResponse {
        count: tickets.len(),
        tickets,
    }))
}

pub async fn get_ticket_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    Ok(ApiResponse::ok(existing(&state, &id).await?))
}
