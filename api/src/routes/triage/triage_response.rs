use serde::Serialize;
use triage_core::{
    AssignmentResult, AssignmentSource, IssueSummary, SimilarIssue, solutions::CommonSolution,
};

#[derive(Debug, Serialize)]
pub struct TriageResponse {
    pub ticket_id: String,
    pub summary: SummaryView,
    pub assignment: AssignmentView,
    /// Assistant message logged on the ticket.
    pub reply: String,
    /// e.g. `"2 days"`.
    pub estimated_resolution_time: String,
    pub common_solutions: Vec<CommonSolution>,
}

#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub summary: String,
    pub sentiment: String,
    pub priority: String,
    pub solution: String,
}

impl From<IssueSummary> for SummaryView {
    fn from(s: IssueSummary) -> Self {
        Self {
            summary: s.summary,
            sentiment: s.sentiment,
            priority: s.priority,
            solution: s.solution,
        }
    }
}

/// Flat view of an [`AssignmentResult`]; fields that a variant lacks are omitted.
#[derive(Debug, PartialEq, Serialize)]
pub struct AssignmentView {
    pub source: AssignmentSource,
    pub parsing_failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_resolution_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similar_case_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub similar_issues: Vec<SimilarIssue>,
}

impl From<&AssignmentResult> for AssignmentView {
    fn from(a: &AssignmentResult) -> Self {
        let mut view = Self {
            source: a.source(),
            parsing_failed: a.parsing_failed(),
            assigned_team: a.assigned_team().map(str::to_string),
            estimated_resolution_hours: a.estimated_resolution_hours(),
            confidence_score: None,
            similar_case_count: None,
            reason: None,
            raw_response: None,
            similar_issues: a.similar_issues().to_vec(),
        };
        match a {
            AssignmentResult::HistoricalData(h) => {
                view.confidence_score = Some(h.confidence_score);
                view.similar_case_count = Some(h.similar_case_count);
            }
            AssignmentResult::LanguageModel(l) => view.reason = Some(l.reason.clone()),
            AssignmentResult::Unparsed { raw_response } => {
                view.raw_response = Some(raw_response.clone());
            }
        }
        view
    }
}
