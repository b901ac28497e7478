//! Language-model summarizer that always yields a record.

use std::sync::Arc;

use serde_json::Value;
use tracing::{instrument, warn};

use crate::parser::parse_structured;
use crate::prompts;
use crate::providers::{LanguageModel, ProviderFuture, Summarizer};
use crate::types::IssueSummary;

/// Asks the model for `{summary, sentiment, priority, solution}`.
///
/// Unparsable replies and transport failures become placeholder records
/// instead of errors.
pub struct LlmSummarizer {
    model: Arc<dyn LanguageModel>,
}

impl LlmSummarizer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    #[instrument(skip_all, fields(text_len = text.len()))]
    async fn run(&self, text: &str) -> IssueSummary {
        let user = prompts::summary_user(text);
        let system = prompts::summary_system();

        let raw = match self.model.complete(&user, &system, &[]).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "summary request failed");
                let msg = format!("Error: {e}");
                return IssueSummary {
                    summary: msg.clone(),
                    sentiment: "Unknown".into(),
                    priority: "Medium".into(),
                    solution: "Could not generate solution due to error.".into(),
                    raw_response: msg,
                };
            }
        };

        match parse_structured(&raw) {
            Some(m) => {
                let field = |k: &str| match m.get(k) {
                    Some(Value::String(s)) => s.trim().to_string(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                IssueSummary {
                    summary: field("summary"),
                    sentiment: field("sentiment"),
                    priority: field("priority"),
                    solution: field("solution"),
                    raw_response: raw,
                }
            }
            None => {
                warn!("summary reply was not a JSON object");
                IssueSummary {
                    summary: "Error parsing summary".into(),
                    sentiment: "Unknown".into(),
                    priority: "Medium".into(),
                    solution: "Could not generate solution.".into(),
                    raw_response: raw,
                }
            }
        }
    }
}

impl Summarizer for LlmSummarizer {
    fn summarize<'a>(&'a self, text: &'a str) -> ProviderFuture<'a, IssueSummary> {
        Box::pin(async move { Ok(self.run(text).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedModel;

    #[tokio::test]
    async fn reads_fenced_reply() {
        let reply = "```json\n{\"summary\":\"Thermostat offline\",\"sentiment\":\"Urgent\",\"priority\":\"High\",\"solution\":\"Power-cycle it\"}\n```";
        let s = LlmSummarizer::new(Arc::new(FixedModel::replying(reply)));
        let out = s.summarize("my thermostat is dead").await.unwrap();
        assert_eq!(out.summary, "Thermostat offline");
        assert_eq!(out.priority, "High");
        assert_eq!(out.raw_response, reply);
    }

    #[tokio::test]
    async fn prose_reply_becomes_placeholder() {
        let s = LlmSummarizer::new(Arc::new(FixedModel::replying("I cannot help")));
        let out = s.summarize("x").await.unwrap();
        assert_eq!(out.summary, "Error parsing summary");
        assert_eq!(out.sentiment, "Unknown");
        assert_eq!(out.priority, "Medium");
        assert_eq!(out.solution, "Could not generate solution.");
    }

    #[tokio::test]
    async fn transport_failure_becomes_placeholder() {
        let s = LlmSummarizer::new(Arc::new(FixedModel::failing("connection refused")));
        let out = s.summarize("x").await.unwrap();
        assert!(out.summary.starts_with("Error: "));
        assert!(out.summary.contains("connection refused"));
        assert_eq!(out.solution, "Could not generate solution due to error.");
    }

    #[tokio::test]
    async fn missing_keys_become_empty() {
        let s = LlmSummarizer::new(Arc::new(FixedModel::replying(r#"{"summary":"Login loop"}"#)));
        let out = s.summarize("x").await.unwrap();
        assert_eq!(out.summary, "Login loop");
        assert_eq!(out.sentiment, "");
    }
}
