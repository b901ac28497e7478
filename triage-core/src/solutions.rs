//! Presentation helpers derived from an assignment.

use serde::Serialize;

use crate::engine::GOOD_MATCH_THRESHOLD;
use crate::types::SimilarIssue;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonSolution {
    pub issue: String,
    pub solution: String,
    pub similarity: f64,
}

/// Good matches that carry a solution, most similar first, at most `limit`.
pub fn common_solutions(similar: &[SimilarIssue], limit: usize) -> Vec<CommonSolution> {
    let mut out: Vec<CommonSolution> = similar
        .iter()
        .filter(|s| s.similarity_score >= GOOD_MATCH_THRESHOLD)
        .filter_map(|s| {
            let solution = s.solution.as_deref()?.trim();
            (!solution.is_empty()).then(|| CommonSolution {
                issue: s.issue_text.clone(),
                solution: solution.to_string(),
                similarity: s.similarity_score,
            })
        })
        .collect();
    out.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    out.truncate(limit);
    out
}

/// `"N days"` from 24 hours up, otherwise `"N hours"`; N is rounded up.
pub fn format_resolution_time(hours: f64) -> String {
    if hours >= 24.0 {
        format!("{} days", (hours / 24.0).ceil() as i64)
    } else {
        format!("{} hours", hours.ceil() as i64)
    }
}
