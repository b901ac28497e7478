//! Data passed between the engine and its collaborators.

use serde::{Deserialize, Serialize};

pub use ai_llm_service::{ChatMessage as ChatTurn, ChatRole};

/// Structured reading of an issue produced by the summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSummary {
    /// One-sentence summary; used as the similarity query.
    pub summary: String,
    pub sentiment: String,
    pub priority: String,
    pub solution: String,
    /// Model reply the record was read from (or the failure text).
    pub raw_response: String,
}

/// A historical ticket returned by the similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarIssue {
    pub id: Option<String>,
    pub issue_text: String,
    pub assigned_team: String,
    pub ticket_open_timestamp: Option<String>,
    pub ticket_resolve_timestamp: Option<String>,
    /// In `[0, 1]`, higher is closer.
    pub similarity_score: f64,
    pub solution: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentSource {
    #[serde(rename = "historical_data")]
    HistoricalData,
    #[serde(rename = "llm")]
    LanguageModel,
}

/// Assignment decided by weighted voting over similar tickets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalAssignment {
    pub assigned_team: String,
    pub estimated_resolution_hours: f64,
    pub confidence_score: f64,
    pub similar_case_count: usize,
    pub similar_issues: Vec<SimilarIssue>,
}

/// Assignment read from the language model reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageModelAssignment {
    pub assigned_team: String,
    /// Taken verbatim from the reply.
    pub estimated_resolution_hours: f64,
    pub reason: String,
}

/// Outcome of one assignment call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssignmentResult {
    HistoricalData(HistoricalAssignment),
    LanguageModel(LanguageModelAssignment),
    /// The model reply carried no usable payload.
    Unparsed { raw_response: String },
}

impl AssignmentResult {
    pub fn source(&self) -> AssignmentSource {
        match self {
            Self::HistoricalData(_) => AssignmentSource::HistoricalData,
            Self::LanguageModel(_) | Self::Unparsed { .. } => AssignmentSource::LanguageModel,
        }
    }

    pub fn parsing_failed(&self) -> bool {
        matches!(self, Self::Unparsed { .. })
    }

    pub fn assigned_team(&self) -> Option<&str> {
        match self {
            Self::HistoricalData(h) => Some(&h.assigned_team),
            Self::LanguageModel(l) => Some(&l.assigned_team),
            Self::Unparsed { .. } => None,
        }
    }

    pub fn estimated_resolution_hours(&self) -> Option<f64> {
        match self {
            Self::HistoricalData(h) => Some(h.estimated_resolution_hours),
            Self::LanguageModel(l) => Some(l.estimated_resolution_hours),
            Self::Unparsed { .. } => None,
        }
    }

    /// Candidates behind a historical decision; empty otherwise.
    pub fn similar_issues(&self) -> &[SimilarIssue] {
        match self {
            Self::HistoricalData(h) => &h.similar_issues,
            _ => &[],
        }
    }
}

/// Summary plus the assignment derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageOutcome {
    pub summary: IssueSummary,
    pub assignment: AssignmentResult,
}
