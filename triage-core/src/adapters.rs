//! Production implementations of the collaborator seams.

use std::sync::Arc;

use ai_llm_service::{LlmServiceProfiles, Profile};
use ticket_index::{EmbeddingsProvider, TicketHit, TicketIndex};
use tracing::debug;

use crate::error::TriageError;
use crate::providers::{LanguageModel, ProviderFuture, SearchProvider};
use crate::types::{ChatTurn, SimilarIssue};

/// A chat profile of the shared LLM service.
#[derive(Clone)]
pub struct LlmProfileModel {
    svc: Arc<LlmServiceProfiles>,
    profile: Profile,
}

impl LlmProfileModel {
    pub fn new(svc: Arc<LlmServiceProfiles>, profile: Profile) -> Self {
        Self { svc, profile }
    }
}

impl LanguageModel for LlmProfileModel {
    fn complete<'a>(
        &'a self,
        user_prompt: &'a str,
        system_prompt: &'a str,
        history: &'a [ChatTurn],
    ) -> ProviderFuture<'a, String> {
        Box::pin(async move {
            let out = self
                .svc
                .chat(self.profile, user_prompt, Some(system_prompt), history)
                .await?;
            Ok(out)
        })
    }
}

/// Similarity search over the historical ticket index.
#[derive(Clone)]
pub struct IndexSearch {
    index: Arc<TicketIndex>,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl IndexSearch {
    pub fn new(index: Arc<TicketIndex>, embedder: Arc<dyn EmbeddingsProvider>) -> Self {
        Self { index, embedder }
    }
}

impl SearchProvider for IndexSearch {
    fn query<'a>(&'a self, text: &'a str, limit: usize) -> ProviderFuture<'a, Vec<SimilarIssue>> {
        Box::pin(async move {
            let hits = self
                .index
                .search(text, limit, self.embedder.as_ref())
                .await
                .map_err(TriageError::from)?;
            debug!(hits = hits.len(), "index search done");
            Ok(hits.into_iter().map(similar_from_hit).collect())
        })
    }
}

pub fn similar_from_hit(hit: TicketHit) -> SimilarIssue {
    SimilarIssue {
        id: hit.ticket_id,
        issue_text: hit.issue_text,
        assigned_team: hit.assigned_team,
        ticket_open_timestamp: hit.ticket_open_date,
        ticket_resolve_timestamp: hit.resolution_date,
        similarity_score: hit.score,
        solution: hit.solution,
    }
}
