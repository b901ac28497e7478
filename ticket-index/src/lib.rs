//! Historical support-ticket index on Qdrant.
//!
//! - Ingest a JSONL dump of past tickets, embedding rows that carry no vector.
//! - Search by free text and get hits with a similarity in `[0, 1]` plus the
//!   ticket metadata (team, open/resolve dates, solution).

mod config;
mod embed;
mod embed_pool;
mod errors;
mod ingest;
mod io_jsonl;
mod qdrant_facade;
mod record;
mod retrieve;
mod score;

pub use config::{DistanceKind, IndexConfig, VectorSpace};
pub use embed::{EmbeddingsProvider, profiles::ProfileEmbedder};
pub use errors::IndexError;
pub use io_jsonl::read_tickets;
pub use record::{HistoricalTicket, TicketHit};
pub use score::normalize_score;

use std::path::Path;

use tracing::trace;

/// Entry point wiring configuration and the Qdrant client.
pub struct TicketIndex {
    cfg: IndexConfig,
    client: qdrant_facade::QdrantFacade,
}

impl TicketIndex {
    /// # Errors
    /// Returns `IndexError::Config` on invalid config or client build failure.
    pub fn new(cfg: IndexConfig) -> Result<Self, IndexError> {
        trace!("TicketIndex::new collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.cfg
    }

    /// Ingests historical tickets from a JSONL file.
    pub async fn ingest_file(
        &self,
        jsonl_path: impl AsRef<Path>,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<u64, IndexError> {
        ingest::ingest_file(&self.cfg, jsonl_path, provider, &self.client).await
    }

    /// Number of indexed tickets (0 when the collection does not exist).
    pub async fn count(&self) -> Result<u64, IndexError> {
        self.client.count().await
    }

    /// Similar tickets for `text`, best first as ranked by Qdrant.
    pub async fn search(
        &self,
        text: &str,
        limit: usize,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<Vec<TicketHit>, IndexError> {
        trace!(collection = self.client.collection(), "TicketIndex::search");
        retrieve::search(&self.cfg, &self.client, text, limit, provider).await
    }
}
