//! Deterministic collaborator stubs shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::TriageError;
use crate::providers::{LanguageModel, ProviderFuture, SearchProvider, Summarizer};
use crate::types::{ChatTurn, IssueSummary, SimilarIssue};

pub fn issue(team: &str, score: f64, open: Option<&str>, resolved: Option<&str>) -> SimilarIssue {
    SimilarIssue {
        id: None,
        issue_text: format!("{team} issue"),
        assigned_team: team.into(),
        ticket_open_timestamp: open.map(str::to_string),
        ticket_resolve_timestamp: resolved.map(str::to_string),
        similarity_score: score,
        solution: Some(format!("{team} fix")),
    }
}

pub struct FixedSummarizer {
    summary: String,
}

impl FixedSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.into(),
        }
    }
}

impl Summarizer for FixedSummarizer {
    fn summarize<'a>(&'a self, _text: &'a str) -> ProviderFuture<'a, IssueSummary> {
        Box::pin(async move {
            Ok(IssueSummary {
                summary: self.summary.clone(),
                sentiment: "Annoyed".into(),
                priority: "High".into(),
                solution: "Restart the hub".into(),
                raw_response: "{}".into(),
            })
        })
    }
}

#[derive(Clone)]
pub struct FixedSearch {
    hits: Vec<SimilarIssue>,
    fail: bool,
    last: Arc<Mutex<Option<(String, usize)>>>,
}

impl FixedSearch {
    pub fn new(hits: Vec<SimilarIssue>) -> Self {
        Self {
            hits,
            fail: false,
            last: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn last_query(&self) -> Option<(String, usize)> {
        self.last.lock().unwrap().clone()
    }
}

impl SearchProvider for FixedSearch {
    fn query<'a>(&'a self, text: &'a str, limit: usize) -> ProviderFuture<'a, Vec<SimilarIssue>> {
        Box::pin(async move {
            *self.last.lock().unwrap() = Some((text.to_string(), limit));
            if self.fail {
                return Err(TriageError::dependency("similarity search", "index offline"));
            }
            Ok(self.hits.iter().take(limit).cloned().collect())
        })
    }
}

pub struct FixedModel {
    reply: Result<String, String>,
    calls: AtomicUsize,
    last: Mutex<Option<(String, Vec<ChatTurn>)>>,
}

impl FixedModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.into()),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.into()),
            ..Self::replying("")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(user_prompt, history)` of the most recent call.
    pub fn last_call(&self) -> Option<(String, Vec<ChatTurn>)> {
        self.last.lock().unwrap().clone()
    }
}

impl LanguageModel for FixedModel {
    fn complete<'a>(
        &'a self,
        user_prompt: &'a str,
        _system_prompt: &'a str,
        history: &'a [ChatTurn],
    ) -> ProviderFuture<'a, String> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((user_prompt.to_string(), history.to_vec()));
            self.reply
                .clone()
                .map_err(|m| TriageError::dependency("language model", m))
        })
    }
}
