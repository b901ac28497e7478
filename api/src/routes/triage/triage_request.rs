use serde::Deserialize;
use triage_core::ChatTurn;

#[derive(Debug, Deserialize)]
pub struct TriageRequest {
    /// The customer's description of the problem.
    pub message: String,
    /// Earlier turns, if the client keeps any.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    /// Overrides `TRIAGE_CANDIDATE_LIMIT` for this call.
    pub candidate_limit: Option<usize>,
}
