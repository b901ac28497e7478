//! Query path: embed the text, search, normalize scores, map payloads to hits.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::IndexConfig;
use crate::embed::EmbeddingsProvider;
use crate::errors::IndexError;
use crate::qdrant_facade::QdrantFacade;
use crate::record::TicketHit;
use crate::score::normalize_score;

/// Returns up to `limit` (at least 1) similar historical tickets.
///
/// An empty or missing collection yields an empty list.
#[instrument(skip_all, fields(limit = limit))]
pub async fn search(
    cfg: &IndexConfig,
    client: &QdrantFacade,
    text: &str,
    limit: usize,
    provider: &dyn EmbeddingsProvider,
) -> Result<Vec<TicketHit>, IndexError> {
    let limit = limit.max(1);

    if client.count().await? == 0 {
        debug!("collection is empty; no candidates");
        return Ok(Vec::new());
    }

    let qv = provider.embed(text).await?;
    let raw = client.search(qv, limit as u64, cfg.exact_search).await?;

    let hits: Vec<TicketHit> = raw
        .into_iter()
        .map(|(score, payload)| hit_from_payload(normalize_score(cfg.distance, score), &payload))
        .collect();

    debug!(hits = hits.len(), "search completed");
    Ok(hits)
}

pub(crate) fn hit_from_payload(score: f64, payload: &Value) -> TicketHit {
    let s = |k: &str| {
        payload
            .get(k)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    TicketHit {
        score,
        ticket_id: s("ticket_id"),
        issue_text: s("issue_summary").unwrap_or_default(),
        assigned_team: s("assigned_team").unwrap_or_default(),
        ticket_open_date: s("ticket_open_date"),
        resolution_date: s("resolution_date"),
        solution: s("solution"),
    }
}
