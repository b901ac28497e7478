//! Ingestion pipeline: read JSONL → embed missing vectors → upsert into Qdrant.
//!
//! Point ids are UUIDv5 of the ticket id, so re-ingesting the same dump
//! overwrites points instead of duplicating them.

use std::collections::HashMap;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use qdrant_client::qdrant::{PointId, PointStruct, Value as QValue, Vector, Vectors, value, vectors};
use services::uuid::stable_uuid;
use tracing::{info, instrument, warn};

use crate::config::{IndexConfig, VectorSpace};
use crate::embed::EmbeddingsProvider;
use crate::embed_pool::embed_missing;
use crate::errors::IndexError;
use crate::io_jsonl::read_tickets;
use crate::qdrant_facade::QdrantFacade;
use crate::record::HistoricalTicket;

/// Ingests historical tickets from a JSONL file and returns the number of points written.
#[instrument(skip_all, fields(path = %jsonl_path.as_ref().display(), collection = %cfg.collection))]
pub async fn ingest_file(
    cfg: &IndexConfig,
    jsonl_path: impl AsRef<Path>,
    provider: &dyn EmbeddingsProvider,
    client: &QdrantFacade,
) -> Result<u64, IndexError> {
    let mut tickets = read_tickets(&jsonl_path)?;
    if tickets.is_empty() {
        warn!("history file has no tickets");
        return Ok(0);
    }

    let conc = cfg.embedding_concurrency.unwrap_or(4);
    embed_missing(&mut tickets, provider, cfg.embedding_dim, conc).await?;

    let vector_size = determine_vector_size(&tickets, cfg.embedding_dim)?;
    client
        .ensure_collection(&VectorSpace {
            size: vector_size,
            distance: cfg.distance,
        })
        .await?;

    let batch_size = cfg.upsert_batch.max(1);
    let pb = ProgressBar::new(tickets.len().div_ceil(batch_size) as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} batches ({eta})",
    ) {
        pb.set_style(style.progress_chars("##-"));
    }

    let mut total: u64 = 0;
    for chunk in tickets.chunks(batch_size) {
        let points = build_points(chunk, vector_size)?;
        total += client.upsert_points(points).await?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(total, "historical tickets ingested");
    Ok(total)
}

/// Uses the configured dimension, else the first vector's length, and checks every row.
fn determine_vector_size(
    tickets: &[HistoricalTicket],
    expected_dim: Option<usize>,
) -> Result<usize, IndexError> {
    let first = tickets
        .iter()
        .find_map(|t| t.embedding.as_ref().map(Vec::len))
        .ok_or_else(|| IndexError::Config("no embeddings available to size the collection".into()))?;
    let want = expected_dim.unwrap_or(first);

    for t in tickets {
        let got = t.embedding.as_ref().map_or(0, Vec::len);
        if got != want {
            return Err(IndexError::VectorSizeMismatch { got, want });
        }
    }
    Ok(want)
}

/// Builds Qdrant points for a batch of embedded tickets.
fn build_points(chunk: &[HistoricalTicket], vector_size: usize) -> Result<Vec<PointStruct>, IndexError> {
    let mut pts = Vec::with_capacity(chunk.len());

    for t in chunk {
        let vector = t.embedding.clone().ok_or(IndexError::VectorSizeMismatch {
            got: 0,
            want: vector_size,
        })?;

        let mut payload: HashMap<String, QValue> = HashMap::new();
        payload.insert("ticket_id".into(), qstring(&t.ticket_id));
        payload.insert("issue_summary".into(), qstring(&t.issue_summary));
        payload.insert("assigned_team".into(), qstring(&t.assigned_team));
        if !t.solution.trim().is_empty() {
            payload.insert("solution".into(), qstring(&t.solution));
        }
        if let Some(open) = &t.ticket_open_date {
            payload.insert("ticket_open_date".into(), qstring(open));
        }
        if let Some(resolved) = &t.resolution_date {
            payload.insert("resolution_date".into(), qstring(resolved));
        }

        let pid: PointId = stable_uuid(&t.ticket_id).to_string().into();
        let vectors = Vectors {
            vectors_options: Some(vectors::VectorsOptions::Vector(Vector {
                data: vector,
                indices: None,
                vectors_count: None,
                vector: None,
            })),
        };

        pts.push(PointStruct {
            id: Some(pid),
            payload,
            vectors: Some(vectors),
            ..Default::default()
        });
    }

    Ok(pts)
}

fn qstring(s: &str) -> QValue {
    QValue {
        kind: Some(value::Kind::StringValue(s.to_string())),
    }
}
