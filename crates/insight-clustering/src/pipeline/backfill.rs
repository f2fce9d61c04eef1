//! Embedding backfill: every insight entering clustering needs a vector of
//! the provider's length.
//!
//! Missing vectors are computed through the embedding provider and written
//! back in the background. Vectors of any other length (left behind by an
//! older model) are recomputed the same way. When the provider cannot report
//! its length yet, the most common stored length stands in for it.

use std::collections::HashMap;
use std::sync::Arc;

use insight_core::errors::InsightResult;
use insight_core::traits::{IEmbeddingProvider, IInsightStore};
use insight_core::Insight;
use insight_observability::events;
use tokio::task::JoinSet;
use tracing::debug;

/// An insight paired with the vector it will be clustered by.
#[derive(Debug, Clone)]
pub struct EmbeddedInsight {
    pub insight: Insight,
    pub embedding: Vec<f32>,
}

/// Embedding write-backs still in flight.
///
/// Persistence failures here never fail the run; [`PendingWrites::drain`]
/// only logs them.
#[derive(Default)]
pub struct PendingWrites {
    tasks: JoinSet<(String, InsightResult<()>)>,
}

impl PendingWrites {
    fn spawn(&mut self, store: Arc<dyn IInsightStore>, insight_id: String, embedding: Vec<f32>) {
        self.tasks.spawn(async move {
            let result = store.update_insight_embedding(&insight_id, &embedding).await;
            (insight_id, result)
        });
    }

    /// Wait for every write. Returns how many succeeded.
    pub async fn drain(mut self) -> usize {
        let mut written = 0;
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok((_, Ok(()))) => written += 1,
                Ok((insight_id, Err(e))) => {
                    events::embedding_write_failed(&insight_id, &e.to_string());
                }
                Err(e) => events::embedding_write_failed("<unknown>", &e.to_string()),
            }
        }
        written
    }
}

/// Most common non-zero vector length among stored embeddings.
/// Ties go to the longer length.
fn majority_length<'a>(vectors: impl Iterator<Item = &'a Vec<f32>>) -> Option<usize> {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for v in vectors.filter(|v| !v.is_empty()) {
        *counts.entry(v.len()).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by_key(|&(len, count)| (count, len))
        .map(|(len, _)| len)
}

/// Ensure every insight has a usable embedding.
///
/// Insights whose embedding cannot be computed are logged and left out of
/// the returned set. Computed vectors are queued on the returned
/// [`PendingWrites`].
pub async fn backfill_embeddings(
    form_id: &str,
    insights: Vec<Insight>,
    embedder: &dyn IEmbeddingProvider,
    store: &Arc<dyn IInsightStore>,
) -> (Vec<EmbeddedInsight>, PendingWrites) {
    let target = match embedder.dimensions() {
        0 => majority_length(insights.iter().filter_map(|i| i.embedding.as_ref())),
        dims => Some(dims),
    };
    let mut writes = PendingWrites::default();
    let mut embedded = Vec::with_capacity(insights.len());

    for mut insight in insights {
        let usable = insight
            .embedding
            .take()
            .filter(|v| !v.is_empty() && Some(v.len()) == target);

        let vector = match usable {
            Some(v) => v,
            None => match embedder.embed(&insight.embedding_text()).await {
                Ok(v) => {
                    events::embedding_backfilled(&insight.id, v.len());
                    writes.spawn(Arc::clone(store), insight.id.clone(), v.clone());
                    v
                }
                Err(e) => {
                    events::embedding_failed(form_id, &insight.id, &e.to_string());
                    continue;
                }
            },
        };
        embedded.push(EmbeddedInsight {
            insight,
            embedding: vector,
        });
    }

    // A provider that returns something other than its reported length would
    // leave mixed lengths; keep only the dominant one.
    if let Some(len) = majority_length(embedded.iter().map(|e| &e.embedding)) {
        embedded.retain(|e| {
            let keep = e.embedding.len() == len;
            if !keep {
                debug!(insight_id = %e.insight.id, len = e.embedding.len(), expected = len, "dropping off-length embedding");
            }
            keep
        });
    }

    (embedded, writes)
}
