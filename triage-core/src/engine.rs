//! Assignment engine: summarize → search → vote, or fall back to the language model.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::error::TriageError;
use crate::parser::parse_structured;
use crate::prompts;
use crate::providers::{LanguageModel, SearchProvider, Summarizer};
use crate::types::{
    AssignmentResult, ChatTurn, LanguageModelAssignment, SimilarIssue, TriageOutcome,
};
use crate::voting::historical_assignment;

pub const DEFAULT_CANDIDATE_LIMIT: usize = 3;

/// A candidate at or above this similarity counts as a good match.
pub const GOOD_MATCH_THRESHOLD: f64 = 0.3;

/// Stateless per call; share one instance behind an `Arc`.
#[derive(Clone)]
pub struct AssignmentEngine {
    summarizer: Arc<dyn Summarizer>,
    search: Arc<dyn SearchProvider>,
    model: Arc<dyn LanguageModel>,
}

impl AssignmentEngine {
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        search: Arc<dyn SearchProvider>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            summarizer,
            search,
            model,
        }
    }

    /// Assigns an issue to a team with a resolution-time estimate.
    ///
    /// # Errors
    /// - [`TriageError::InvalidInput`] for blank issue text
    /// - [`TriageError::Dependency`] when the summarizer or search fails
    /// - [`TriageError::Computation`] when good matches carry zero total weight
    pub async fn assign(
        &self,
        issue_text: &str,
        context: &[ChatTurn],
        candidate_limit: usize,
    ) -> Result<AssignmentResult, TriageError> {
        Ok(self.triage(issue_text, context, candidate_limit).await?.assignment)
    }

    /// Same as [`Self::assign`] but also returns the summary it searched with.
    #[instrument(skip_all, fields(candidate_limit = candidate_limit, context = context.len()))]
    pub async fn triage(
        &self,
        issue_text: &str,
        context: &[ChatTurn],
        candidate_limit: usize,
    ) -> Result<TriageOutcome, TriageError> {
        if issue_text.trim().is_empty() {
            return Err(TriageError::InvalidInput("issue text is empty".into()));
        }
        let limit = candidate_limit.max(1);

        let summary = self.summarizer.summarize(issue_text).await?;
        debug!(query = %summary.summary, "searching with normalized query");

        let candidates = self.search.query(&summary.summary, limit).await?;
        let good = has_good_match(&candidates);
        info!(candidates = candidates.len(), good_match = good, "similar issues retrieved");

        let assignment = if good {
            AssignmentResult::HistoricalData(historical_assignment(candidates)?)
        } else {
            self.language_model_fallback(issue_text, context).await
        };

        Ok(TriageOutcome {
            summary,
            assignment,
        })
    }

    /// One model call; any failure degrades to [`AssignmentResult::Unparsed`].
    async fn language_model_fallback(&self, issue_text: &str, context: &[ChatTurn]) -> AssignmentResult {
        let user = prompts::assignment_user(context, issue_text);
        let system = prompts::assignment_system();

        let raw = match self.model.complete(&user, &system, context).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "language model fallback failed");
                return AssignmentResult::Unparsed {
                    raw_response: format!("Error: {e}"),
                };
            }
        };

        match parse_structured(&raw).and_then(|m| assignment_from_payload(&m)) {
            Some(a) => AssignmentResult::LanguageModel(a),
            None => {
                warn!(reply_len = raw.len(), "language model reply had no usable assignment");
                AssignmentResult::Unparsed { raw_response: raw }
            }
        }
    }
}

pub fn has_good_match(candidates: &[SimilarIssue]) -> bool {
    candidates
        .iter()
        .any(|c| c.similarity_score >= GOOD_MATCH_THRESHOLD)
}

/// Requires a non-empty `assigned_team` and non-negative numeric hours.
fn assignment_from_payload(m: &Map<String, Value>) -> Option<LanguageModelAssignment> {
    let assigned_team = m
        .get("assigned_team")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let hours = match m.get("estimated_resolution_hours")? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !hours.is_finite() || hours < 0.0 {
        return None;
    }

    let reason = match m.get("reason") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    Some(LanguageModelAssignment {
        assigned_team,
        estimated_resolution_hours: hours,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedModel, FixedSearch, FixedSummarizer, issue};
    use crate::types::{AssignmentSource, ChatRole};
    use approx::assert_relative_eq;

    fn engine(search: FixedSearch, model: FixedModel) -> (AssignmentEngine, Arc<FixedModel>) {
        let model = Arc::new(model);
        let e = AssignmentEngine::new(
            Arc::new(FixedSummarizer::new("lights flicker")),
            Arc::new(search),
            model.clone(),
        );
        (e, model)
    }

    #[tokio::test]
    async fn weak_matches_go_to_the_language_model() {
        let search = FixedSearch::new(vec![
            issue("Network", 0.29, None, None),
            issue("Device", 0.1, None, None),
            issue("Device", 0.0, None, None),
        ]);
        let reply = r#"{"assigned_team": "Device", "reason": "hardware", "estimated_resolution_hours": 6}"#;
        let (e, model) = engine(search, FixedModel::replying(reply));

        let out = e.assign("My bulbs flicker", &[], 3).await.unwrap();

        assert_eq!(model.calls(), 1);
        assert_eq!(out.source(), AssignmentSource::LanguageModel);
        match out {
            AssignmentResult::LanguageModel(a) => {
                assert_eq!(a.assigned_team, "Device");
                assert_relative_eq!(a.estimated_resolution_hours, 6.0);
                assert_eq!(a.reason, "hardware");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_candidates_go_to_the_language_model() {
        let (e, model) = engine(FixedSearch::new(vec![]), FixedModel::replying("no json here"));
        let out = e.assign("My bulbs flicker", &[], 3).await.unwrap();
        assert_eq!(model.calls(), 1);
        assert!(out.parsing_failed());
        assert_eq!(out.assigned_team(), None);
        assert_eq!(
            out,
            AssignmentResult::Unparsed {
                raw_response: "no json here".into()
            }
        );
    }

    #[tokio::test]
    async fn good_match_votes_without_calling_the_model() {
        let search = FixedSearch::new(vec![
            issue("A", 0.5, None, None),
            issue("B", 0.2, None, None),
            issue("A", 0.1, None, None),
        ]);
        let (e, model) = engine(search, FixedModel::replying("{}"));

        let out = e.assign("issue", &[], 3).await.unwrap();

        assert_eq!(model.calls(), 0);
        match out {
            AssignmentResult::HistoricalData(h) => {
                assert_eq!(h.assigned_team, "A");
                assert_relative_eq!(h.confidence_score, 0.75);
                assert_relative_eq!(h.estimated_resolution_hours, 24.0);
                assert_eq!(h.similar_case_count, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn search_uses_summary_and_clamped_limit() {
        let search = FixedSearch::new(vec![]);
        let e = AssignmentEngine::new(
            Arc::new(FixedSummarizer::new("normalized")),
            Arc::new(search.clone()),
            Arc::new(FixedModel::replying("x")),
        );
        e.assign("raw words", &[], 0).await.unwrap();
        assert_eq!(search.last_query(), Some(("normalized".to_string(), 1)));
    }

    #[tokio::test]
    async fn repeated_calls_are_identical() {
        let search = FixedSearch::new(vec![
            issue("Network", 0.7, Some("2024-01-01 00:00:00"), Some("2024-01-01 05:00:00")),
            issue("Software", 0.4, None, None),
        ]);
        let (e, _) = engine(search, FixedModel::replying("{}"));
        let ctx = vec![ChatTurn::new(ChatRole::User, "hi")];
        let a = e.triage("wifi drops", &ctx, 3).await.unwrap();
        let b = e.triage("wifi drops", &ctx, 3).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn model_failure_degrades_instead_of_raising() {
        let (e, _) = engine(FixedSearch::new(vec![]), FixedModel::failing("timeout"));
        let out = e.assign("issue", &[], 3).await.unwrap();
        match out {
            AssignmentResult::Unparsed { raw_response } => assert!(raw_response.contains("timeout")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn search_failure_propagates() {
        let (e, _) = engine(FixedSearch::failing(), FixedModel::replying("{}"));
        let err = e.assign("issue", &[], 3).await.unwrap_err();
        assert!(matches!(err, TriageError::Dependency { .. }));
    }

    #[tokio::test]
    async fn blank_issue_is_rejected() {
        let (e, _) = engine(FixedSearch::new(vec![]), FixedModel::replying("{}"));
        assert!(matches!(
            e.assign("   ", &[], 3).await,
            Err(TriageError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn context_reaches_prompt_and_history() {
        let (e, model) = engine(FixedSearch::new(vec![]), FixedModel::replying("{}"));
        let ctx = vec![ChatTurn::new(ChatRole::User, "the app is slow")];
        e.assign("issue", &ctx, 3).await.unwrap();
        let (prompt, history) = model.last_call().unwrap();
        assert!(prompt.contains("user: the app is slow"));
        assert_eq!(history, ctx);
    }

    #[test]
    fn payload_rules() {
        let parse = |s: &str| {
            let m = parse_structured(s).unwrap();
            assignment_from_payload(&m)
        };
        let a = parse(r#"{"assigned_team":"Network","estimated_resolution_hours":"4.5"}"#).unwrap();
        assert_relative_eq!(a.estimated_resolution_hours, 4.5);
        assert_eq!(a.reason, "");
        assert!(parse(r#"{"estimated_resolution_hours":4}"#).is_none());
        assert!(parse(r#"{"assigned_team":"Network"}"#).is_none());
        assert!(parse(r#"{"assigned_team":"Network","estimated_resolution_hours":"soon"}"#).is_none());
        assert!(parse(r#"{"assigned_team":"Network","estimated_resolution_hours":-2}"#).is_none());
    }
}
