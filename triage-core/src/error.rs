//! Typed error for the triage core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TriageError {
    /// A collaborator (summarizer, search, language model) failed outright.
    #[error("{collaborator} failed: {message}")]
    Dependency {
        collaborator: &'static str,
        message: String,
    },

    /// Vote aggregation could not produce a defined result.
    #[error("computation error: {0}")]
    Computation(String),

    /// Caller passed input the engine cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl TriageError {
    pub fn dependency(collaborator: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Dependency {
            collaborator,
            message: err.to_string(),
        }
    }
}

impl From<ticket_index::IndexError> for TriageError {
    fn from(e: ticket_index::IndexError) -> Self {
        Self::dependency("similarity search", e)
    }
}

impl From<ai_llm_service::AiLlmError> for TriageError {
    fn from(e: ai_llm_service::AiLlmError) -> Self {
        Self::dependency("language model", e)
    }
}
