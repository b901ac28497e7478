use std::{path::PathBuf, sync::Arc};

use ai_llm_service::{LlmServiceProfiles, Profile, config::default_config::profiles_from_env};
use ticket_index::{EmbeddingsProvider, IndexConfig, ProfileEmbedder, TicketIndex};
use ticket_store::TicketStore;
use tracing::info;
use triage_core::{
    AssignmentEngine, LlmSummarizer, TriageConfig,
    adapters::{IndexSearch, LlmProfileModel},
    providers::LanguageModel,
};

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Summarize, search, vote or fall back to the model.
    pub engine: AssignmentEngine,
    /// Model used for follow-up answers.
    pub chat_model: Arc<dyn LanguageModel>,
    pub store: TicketStore,
    /// Historical ticket index and the embedder used to fill it.
    pub index: Arc<TicketIndex>,
    pub embedder: Arc<dyn EmbeddingsProvider>,
    /// Kept for `/health`.
    pub llm: Arc<LlmServiceProfiles>,
    pub triage: TriageConfig,
}

impl AppState {
    /// Builds every collaborator from environment variables.
    ///
    /// Nothing here talks to the network; providers are contacted lazily.
    pub fn from_env() -> Result<Self, AppError> {
        let (fast, slow, embedding) = profiles_from_env()?;
        let llm = Arc::new(LlmServiceProfiles::new(fast, Some(slow), embedding, Some(5))?);

        let index_cfg = IndexConfig::from_env()?;
        let embedder: Arc<dyn EmbeddingsProvider> =
            Arc::new(ProfileEmbedder::new(llm.clone(), index_cfg.embedding_dim));
        let index = Arc::new(TicketIndex::new(index_cfg)?);

        let fast_model: Arc<dyn LanguageModel> =
            Arc::new(LlmProfileModel::new(llm.clone(), Profile::Fast));
        let slow_model: Arc<dyn LanguageModel> =
            Arc::new(LlmProfileModel::new(llm.clone(), Profile::Slow));

        let engine = AssignmentEngine::new(
            Arc::new(LlmSummarizer::new(fast_model)),
            Arc::new(IndexSearch::new(index.clone(), embedder.clone())),
            slow_model.clone(),
        );

        let db_path = std::env::var("TICKET_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/tickets.json"));
        let store = TicketStore::open(&db_path)?;

        let triage = TriageConfig::from_env();
        info!(
            collection = %index.config().collection,
            db = %db_path.display(),
            candidate_limit = triage.candidate_limit,
            "application state ready"
        );

        Ok(Self {
            engine,
            chat_model: slow_model,
            store,
            index,
            embedder,
            llm,
            triage,
        })
    }
}
