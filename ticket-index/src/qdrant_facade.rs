//! Thin adapter around `qdrant-client`.
//!
//! Keeps the builder-heavy client API in one place so the rest of the crate
//! works with plain vectors and JSON payloads.

use std::collections::HashMap;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, SearchParamsBuilder,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QValue, VectorParamsBuilder,
};
use tracing::{debug, info, warn};

use crate::config::{DistanceKind, IndexConfig, VectorSpace};
use crate::errors::IndexError;

pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    distance: DistanceKind,
}

impl QdrantFacade {
    /// Creates a facade from a validated configuration.
    pub fn new(cfg: &IndexConfig) -> Result<Self, IndexError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            distance: cfg.distance,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns whether the collection can be described by the server.
    pub async fn exists(&self) -> bool {
        match self.client.collection_info(&self.collection).await {
            Ok(_) => true,
            Err(err) => {
                debug!(collection = %self.collection, error = %err, "collection not available");
                false
            }
        }
    }

    /// Creates the collection with `space` unless it already exists.
    pub async fn ensure_collection(&self, space: &VectorSpace) -> Result<(), IndexError> {
        if self.exists().await {
            debug!("Collection '{}' already exists", self.collection);
            return Ok(());
        }

        warn!(
            "Collection '{}' not found, creating with size={} distance={:?}",
            self.collection, space.size, space.distance
        );

        let distance = match space.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(space.size as u64, distance)),
            )
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        info!("Collection '{}' created", self.collection);
        Ok(())
    }

    /// Upserts a batch and waits for it to be applied. Returns the batch size.
    pub async fn upsert_points(&self, points: Vec<PointStruct>) -> Result<u64, IndexError> {
        if points.is_empty() {
            return Ok(0);
        }
        let n = points.len() as u64;

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        debug!(points = n, collection = %self.collection, "upsert applied");
        Ok(n)
    }

    /// Exact number of points; a missing collection counts as empty.
    pub async fn count(&self) -> Result<u64, IndexError> {
        if !self.exists().await {
            return Ok(0);
        }
        let res = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;
        Ok(res.result.map(|r| r.count).unwrap_or(0))
    }

    /// Similarity search returning `(raw score, payload)` pairs as Qdrant ranks them.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        exact: bool,
    ) -> Result<Vec<(f32, serde_json::Value)>, IndexError> {
        debug!(
            collection = %self.collection,
            top_k, exact, distance = ?self.distance, "searching"
        );

        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);
        if exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(res
            .result
            .into_iter()
            .map(|r| (r.score, qpayload_to_json(r.payload)))
            .collect())
    }
}

/// Converts a Qdrant payload into a JSON object.
pub(crate) fn qpayload_to_json(p: HashMap<String, QValue>) -> serde_json::Value {
    serde_json::Value::Object(p.into_iter().map(|(k, v)| (k, qvalue_to_json(v))).collect())
}

fn qvalue_to_json(v: QValue) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    match v.kind {
        Some(K::StringValue(s)) => serde_json::Value::String(s),
        Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
        Some(K::DoubleValue(f)) => serde_json::json!(f),
        Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(K::ListValue(l)) => {
            serde_json::Value::Array(l.values.into_iter().map(qvalue_to_json).collect())
        }
        Some(K::StructValue(s)) => qpayload_to_json(s.fields),
        Some(K::NullValue(_)) | None => serde_json::Value::Null,
    }
}
