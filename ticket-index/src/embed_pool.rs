//! Embedding executor with bounded concurrency and dimension checks.

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::{embed::EmbeddingsProvider, errors::IndexError, record::HistoricalTicket};

/// Fills `embedding` for every ticket that has none.
///
/// At most `concurrency` requests are in flight. When `expected_dim` is set,
/// every produced vector must have that length.
pub async fn embed_missing(
    tickets: &mut [HistoricalTicket],
    provider: &dyn EmbeddingsProvider,
    expected_dim: Option<usize>,
    concurrency: usize,
) -> Result<(), IndexError> {
    let idxs: Vec<usize> = tickets
        .iter()
        .enumerate()
        .filter_map(|(i, t)| t.embedding.is_none().then_some(i))
        .collect();

    if idxs.is_empty() {
        debug!("embed_missing: nothing to embed");
        return Ok(());
    }
    info!(missing = idxs.len(), concurrency, "embedding historical tickets");

    let texts: Vec<(usize, String)> = idxs
        .into_iter()
        .map(|i| (i, tickets[i].issue_summary.clone()))
        .collect();

    let results: Vec<(usize, Vec<f32>)> = stream::iter(texts)
        .map(|(i, text)| async move {
            let v = provider.embed(&text).await?;
            Ok::<(usize, Vec<f32>), IndexError>((i, v))
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, IndexError>>()?;

    for (i, v) in results {
        if let Some(want) = expected_dim {
            if v.len() != want {
                return Err(IndexError::VectorSizeMismatch { got: v.len(), want });
            }
        }
        tickets[i].embedding = Some(v);
    }

    Ok(())
}
