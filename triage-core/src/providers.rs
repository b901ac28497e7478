//! Collaborator seams of the assignment engine.
//!
//! Async via boxed futures so the traits stay object-safe and can be shared as
//! `Arc<dyn _>` across request handlers.

use std::{future::Future, pin::Pin};

use crate::error::TriageError;
use crate::types::{ChatTurn, IssueSummary, SimilarIssue};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TriageError>> + Send + 'a>>;

/// Turns raw issue text into a structured summary.
pub trait Summarizer: Send + Sync {
    fn summarize<'a>(&'a self, text: &'a str) -> ProviderFuture<'a, IssueSummary>;
}

/// Returns up to `limit` historical issues similar to `text`, in any order.
pub trait SearchProvider: Send + Sync {
    fn query<'a>(&'a self, text: &'a str, limit: usize) -> ProviderFuture<'a, Vec<SimilarIssue>>;
}

/// Single chat completion without any structured-output guarantee.
pub trait LanguageModel: Send + Sync {
    fn complete<'a>(
        &'a self,
        user_prompt: &'a str,
        system_prompt: &'a str,
        history: &'a [ChatTurn],
    ) -> ProviderFuture<'a, String>;
}
