//! Runtime and collection configuration.

use std::str::FromStr;

use crate::errors::IndexError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine similarity (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

impl FromStr for DistanceKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "dot" => Ok(Self::Dot),
            "euclid" | "euclidean" | "l2" => Ok(Self::Euclid),
            other => Err(IndexError::Config(format!("unknown distance `{other}`"))),
        }
    }
}

/// Describes the vector space of the collection.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    pub size: usize,
    pub distance: DistanceKind,
}

/// Configuration for historical-ticket ingestion and retrieval.
#[derive(Clone, Debug)]
pub struct IndexConfig {
    /// Qdrant endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    pub distance: DistanceKind,
    /// Upsert batch size (typical range: 128..512).
    pub upsert_batch: usize,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    /// Enforced vector size; inferred from the first vector when `None`.
    pub embedding_dim: Option<usize>,
    /// Parallel embedding requests during ingest.
    pub embedding_concurrency: Option<usize>,
}

impl IndexConfig {
    /// Creates a default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            upsert_batch: 256,
            exact_search: false,
            embedding_dim: None,
            embedding_concurrency: None,
        }
    }

    /// Reads `QDRANT_*`, `EMBEDDING_*` and `RAG_EXACT_SEARCH`.
    ///
    /// # Errors
    /// Returns [`IndexError::Config`] for an unknown `QDRANT_DISTANCE`.
    pub fn from_env() -> Result<Self, IndexError> {
        let distance = match std::env::var("QDRANT_DISTANCE") {
            Ok(v) => v.parse()?,
            Err(_) => DistanceKind::Cosine,
        };

        let cfg = Self {
            qdrant_url: env("QDRANT_URL", "http://127.0.0.1:6334"),
            qdrant_api_key: std::env::var("QDRANT_API_KEY").ok().filter(|k| !k.is_empty()),
            collection: env("QDRANT_COLLECTION", "support_tickets"),
            distance,
            upsert_batch: parse("QDRANT_BATCH_SIZE", 256usize),
            exact_search: env("RAG_EXACT_SEARCH", "false") == "true",
            embedding_dim: std::env::var("EMBEDDING_DIM").ok().and_then(|s| s.parse().ok()),
            embedding_concurrency: std::env::var("EMBEDDING_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok()),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(IndexError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(IndexError::Config("collection is empty".into()));
        }
        if self.upsert_batch == 0 {
            return Err(IndexError::Config("upsert_batch must be > 0".into()));
        }
        if self.embedding_dim == Some(0) {
            return Err(IndexError::Config("embedding_dim must be > 0".into()));
        }
        Ok(())
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k).unwrap_or_else(|_| dflt.to_string())
}

fn parse<T: FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(dflt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_fields() {
        let mut cfg = IndexConfig::new_default("http://localhost:6334", "t");
        assert!(cfg.validate().is_ok());
        cfg.collection = "  ".into();
        assert!(matches!(cfg.validate(), Err(IndexError::Config(_))));
        cfg.collection = "t".into();
        cfg.upsert_batch = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn distance_parses_aliases() {
        assert_eq!("Cosine".parse::<DistanceKind>().unwrap(), DistanceKind::Cosine);
        assert_eq!("l2".parse::<DistanceKind>().unwrap(), DistanceKind::Euclid);
        assert!("manhattan".parse::<DistanceKind>().is_err());
    }
}
