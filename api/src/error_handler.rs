use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ticket_index::IndexError;
use ticket_store::StoreError;
use thiserror::Error;
use tracing::{error, warn};
use triage_core::TriageError;

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Error mapped from a lower layer with its own status and code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Http { status, .. } => *status,
            AppError::MissingEnv(_)
            | AppError::Config(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Http { code, .. } => code,
        }
    }

    fn dependency(code: &'static str, message: impl Into<String>) -> Self {
        AppError::Http {
            status: StatusCode::BAD_GATEWAY,
            code,
            message: message.into(),
        }
    }

    fn internal(code: &'static str, message: impl Into<String>) -> Self {
        AppError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), error = %self, "request failed");
        } else {
            warn!(code = self.error_code(), error = %self, "request rejected");
        }
        ApiResponse::<()>::error(self.error_code(), self.to_string(), Vec::new())
            .into_response_with_status(status)
    }
}

/// Result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<TriageError> for AppError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::InvalidInput(msg) => AppError::BadRequest(msg),
            e @ TriageError::Dependency { .. } => AppError::dependency("DEPENDENCY_FAILED", e.to_string()),
            e @ TriageError::Computation(_) => AppError::internal("COMPUTATION_ERROR", e.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(format!("ticket {id}")),
            e @ StoreError::AlreadyResolved(_) => AppError::Conflict(e.to_string()),
            e @ (StoreError::Io(_) | StoreError::Decode(_)) => {
                AppError::internal("TICKET_STORE_ERROR", e.to_string())
            }
        }
    }
}

/// Index errors surface from `/history/ingest` and at startup.
impl From<IndexError> for AppError {
    fn from(err: IndexError) -> Self {
        match err {
            e @ (IndexError::Io(_) | IndexError::Parse(_)) => AppError::BadRequest(e.to_string()),
            IndexError::Config(msg) => AppError::Config(msg),
            e @ (IndexError::Embedding(_) | IndexError::Qdrant(_)) => {
                AppError::dependency("INDEX_BACKEND_FAILED", e.to_string())
            }
            e @ IndexError::VectorSizeMismatch { .. } => AppError::internal("INDEX_ERROR", e.to_string()),
        }
    }
}

impl From<ai_llm_service::AiLlmError> for AppError {
    fn from(err: ai_llm_service::AiLlmError) -> Self {
        match err {
            ai_llm_service::AiLlmError::Config(e) => AppError::Config(e.to_string()),
            e => AppError::dependency("LLM_FAILED", e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triage_errors_map_to_statuses() {
        let dep: AppError = TriageError::dependency("similarity search", "timeout").into();
        assert_eq!(dep.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(dep.error_code(), "DEPENDENCY_FAILED");

        let comp: AppError = TriageError::Computation("zero weight".into()).into();
        assert_eq!(comp.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let bad: AppError = TriageError::InvalidInput("issue text is empty".into()).into();
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_errors_map_to_statuses() {
        let nf: AppError = StoreError::NotFound("TECH_9".into()).into();
        assert_eq!(nf.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(nf.to_string(), "ticket TECH_9 not found");

        let done: AppError = StoreError::AlreadyResolved("TECH_9".into()).into();
        assert_eq!(done.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn index_errors_map_to_statuses() {
        let parse: AppError = IndexError::Parse("line 3".into()).into();
        assert_eq!(parse.status_code(), StatusCode::BAD_REQUEST);

        let backend: AppError = IndexError::Qdrant("unavailable".into()).into();
        assert_eq!(backend.status_code(), StatusCode::BAD_GATEWAY);
    }
}
