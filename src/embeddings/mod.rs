
pub mod ollama;

use anyhow::{Context, Result};
use tracing::{debug, warn};

pub use ollama::OllamaClient;

/// External embedding capability, invoked one bounded batch at a time.
///
/// Implementations must either return one vector per input text or fail;
/// partial answers are handled by [`embed_in_batches`].
pub trait EmbeddingProvider {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Embed `texts` in successive batches of at most `batch_size`.
///
/// The output always has one slot per input text, in input order. A batch
/// whose response count does not match its request count is a non-fatal
/// partial failure: every text in that batch gets `None` and a warning is
/// recorded. Transport-level errors propagate so the caller's retry policy
/// can apply.
pub fn embed_in_batches(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
    batch_size: usize,
) -> Result<Vec<Option<Vec<f32>>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let batch_size = batch_size.max(1);
    let mut results = Vec::with_capacity(texts.len());

    for (batch_index, batch) in texts.chunks(batch_size).enumerate() {
        let vectors = provider
            .embed_batch(batch)
            .with_context(|| format!("Failed to embed batch {} of {} texts", batch_index, batch.len()))?;

        if vectors.len() == batch.len() {
            results.extend(vectors.into_iter().map(Some));
        } else {
            warn!(
                "Embedding batch {} returned {} vectors for {} texts; excluding batch",
                batch_index,
                vectors.len(),
                batch.len()
            );
            results.extend(std::iter::repeat_with(|| None).take(batch.len()));
        }
    }

    let embedded = results.iter().filter(|r| r.is_some()).count();
    debug!("Embedded {}/{} texts", embedded, texts.len());

    Ok(results)
}
