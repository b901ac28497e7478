//! Weighted team voting and resolution-time estimation over similar tickets.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::TriageError;
use crate::types::{HistoricalAssignment, SimilarIssue};

/// Hours assumed for a candidate whose resolution time cannot be computed.
pub const DEFAULT_RESOLUTION_HOURS: f64 = 24.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Parses the timestamp shapes found in ticket exports. Offsets are normalized to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Hours between open and resolve, or [`DEFAULT_RESOLUTION_HOURS`] when a
/// timestamp is missing, unparsable, or the interval is negative.
pub fn resolution_hours(issue: &SimilarIssue) -> f64 {
    let open = issue.ticket_open_timestamp.as_deref().and_then(parse_timestamp);
    let resolved = issue
        .ticket_resolve_timestamp
        .as_deref()
        .and_then(parse_timestamp);

    match (open, resolved) {
        (Some(o), Some(r)) if r >= o => (r - o).num_seconds() as f64 / 3600.0,
        _ => DEFAULT_RESOLUTION_HOURS,
    }
}

/// Computes the historical assignment for a non-empty candidate list.
///
/// - team: highest summed similarity; ties go to the team seen first
/// - hours: similarity-weighted mean of per-candidate resolution hours
/// - confidence: winning weight over total weight
///
/// Hours and confidence are rounded to 2 decimals.
///
/// # Errors
/// [`TriageError::Computation`] when there are no candidates or the total
/// weight is not positive.
pub fn historical_assignment(
    candidates: Vec<SimilarIssue>,
) -> Result<HistoricalAssignment, TriageError> {
    if candidates.is_empty() {
        return Err(TriageError::Computation("no candidates to vote on".into()));
    }

    // Insertion-ordered tally keeps the tie-break deterministic.
    let mut votes: Vec<(&str, f64)> = Vec::new();
    let mut weighted_hours = 0.0;
    let mut total = 0.0;

    for c in &candidates {
        let score = c.similarity_score;
        match votes.iter_mut().find(|(team, _)| *team == c.assigned_team) {
            Some((_, w)) => *w += score,
            None => votes.push((&c.assigned_team, score)),
        }
        weighted_hours += resolution_hours(c) * score;
        total += score;
    }

    if !(total > 0.0) || !total.is_finite() {
        return Err(TriageError::Computation(format!(
            "total vote weight is {total}; confidence is undefined"
        )));
    }

    let (winner, best) = votes
        .iter()
        .fold(votes[0], |acc, &v| if v.1 > acc.1 { v } else { acc });
    debug!(?votes, winner, "team votes tallied");

    let assigned_team = winner.to_string();
    let estimated = weighted_hours / total;
    let confidence = best / total;

    Ok(HistoricalAssignment {
        assigned_team,
        estimated_resolution_hours: round2(estimated),
        confidence_score: round2(confidence),
        similar_case_count: candidates.len(),
        similar_issues: candidates,
    })
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
