
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::assemble::assemble_chunks;
use crate::boundary::{compute_distances, detect_boundaries, distance_stats, retain_embedded};
use crate::cache::ChunkCache;
use crate::config::{ChunkingConfig, RetryConfig};
use crate::embeddings::{EmbeddingProvider, embed_in_batches};
use crate::extract::TextExtractor;
use crate::segment::SentenceSegmenter;
use crate::window::build_windows;

/// Bounded retry with a fixed inter-attempt delay, applied to the
/// transient-failure-prone stages only.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    #[inline]
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: Duration::from_millis(config.delay_ms),
        }
    }

    pub fn run<T>(&self, stage: &str, mut op: impl FnMut() -> Result<T>) -> Result<T> {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(
                        "Stage {} failed on attempt {}/{}: {:#}",
                        stage, attempt, self.max_attempts, e
                    );
                    last_error = Some(e);

                    if attempt < self.max_attempts {
                        std::thread::sleep(self.delay);
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow::anyhow!("stage {} produced no result", stage))
            .context(format!(
                "Stage {} failed after {} attempts",
                stage, self.max_attempts
            )))
    }
}

/// Terminal state of one document's run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Chunked and cached on this run
    Completed,
    /// Served from the cache; every downstream stage was skipped
    Cached,
    /// No text could be extracted; an empty chunk set was recorded
    Empty,
    /// All retries exhausted; the batch continued without this document
    Failed,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentStatus::Completed => "completed",
            DocumentStatus::Cached => "cached",
            DocumentStatus::Empty => "empty",
            DocumentStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Caller-visible result for one document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub name: String,
    pub status: DocumentStatus,
    pub chunks: Vec<String>,
    /// Re-computed chunk embeddings, present only when `embed_chunks` is on
    /// and the document was processed (not served from cache). One slot per
    /// chunk; `None` marks a chunk whose re-embedding batch failed softly.
    pub chunk_embeddings: Vec<Option<Vec<f32>>>,
    pub elapsed_seconds: f64,
}

/// Aggregate over one batch of documents.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
    pub elapsed_seconds: f64,
}

impl BatchReport {
    /// Total chunks across all documents, cached and fresh alike.
    pub fn total_chunk_count(&self) -> usize {
        self.documents.iter().map(|d| d.chunks.len()).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.status == DocumentStatus::Failed)
            .count()
    }

    /// All chunks in batch order, flattened for downstream consumers.
    pub fn all_chunks(&self) -> impl Iterator<Item = &str> {
        self.documents
            .iter()
            .flat_map(|d| d.chunks.iter().map(String::as_str))
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Sequences the per-document stages and aggregates a batch.
///
/// Collaborators are injected so tests can substitute doubles; the
/// orchestrator owns no global state. Documents are processed one after
/// another; failure is isolated at document granularity.
pub struct Pipeline {
    extractor: Arc<dyn TextExtractor + Send + Sync>,
    segmenter: Arc<dyn SentenceSegmenter + Send + Sync>,
    embedder: Arc<dyn EmbeddingProvider + Send + Sync>,
    cache: ChunkCache,
    chunking: ChunkingConfig,
    retry: RetryPolicy,
}

impl Pipeline {
    #[inline]
    pub fn new(
        extractor: Arc<dyn TextExtractor + Send + Sync>,
        segmenter: Arc<dyn SentenceSegmenter + Send + Sync>,
        embedder: Arc<dyn EmbeddingProvider + Send + Sync>,
        cache: ChunkCache,
        chunking: ChunkingConfig,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            extractor,
            segmenter,
            embedder,
            cache,
            chunking,
            retry,
        }
    }

    /// Process one document to a terminal status. Never panics or aborts the
    /// caller's batch; errors land in a `Failed` report.
    pub async fn process_document(&self, locator: &str) -> DocumentReport {
        let started = Instant::now();

        match self.run_document(locator).await {
            Ok((status, chunks, chunk_embeddings)) => {
                info!(
                    "Document {} {}: {} chunks in {:.2}s",
                    locator,
                    status,
                    chunks.len(),
                    started.elapsed().as_secs_f64()
                );
                DocumentReport {
                    name: locator.to_string(),
                    status,
                    chunks,
                    chunk_embeddings,
                    elapsed_seconds: started.elapsed().as_secs_f64(),
                }
            }
            Err(e) => {
                error!("Document {} failed: {:#}", locator, e);
                DocumentReport {
                    name: locator.to_string(),
                    status: DocumentStatus::Failed,
                    chunks: Vec::new(),
                    chunk_embeddings: Vec::new(),
                    elapsed_seconds: started.elapsed().as_secs_f64(),
                }
            }
        }
    }

    /// Process documents sequentially, isolating failures per document.
    pub async fn process_batch(&self, locators: &[String]) -> BatchReport {
        let started = Instant::now();
        let mut documents = Vec::with_capacity(locators.len());

        for locator in locators {
            documents.push(self.process_document(locator).await);
        }

        let report = BatchReport {
            documents,
            elapsed_seconds: started.elapsed().as_secs_f64(),
        };

        info!(
            "Batch finished: {} documents, {} chunks, {} failed, {:.2}s",
            report.documents.len(),
            report.total_chunk_count(),
            report.failed_count(),
            report.elapsed_seconds
        );

        report
    }

    async fn run_document(
        &self,
        locator: &str,
    ) -> Result<(DocumentStatus, Vec<String>, Vec<Option<Vec<f32>>>)> {
        // CACHE_CHECK: a hit short-circuits everything downstream, including
        // re-embedding. An unreachable cache downgrades to a miss.
        match self.cache.get(locator).await {
            Ok(Some(chunks)) => {
                debug!("Serving {} from cache ({} chunks)", locator, chunks.len());
                return Ok((DocumentStatus::Cached, chunks, Vec::new()));
            }
            Ok(None) => {}
            Err(e) => {
                warn!(
                    "Cache unavailable for {}: {:#}; proceeding uncached",
                    locator, e
                );
            }
        }

        // EXTRACT: no text is a skip, not an error. The empty result is
        // cached explicitly so the next run hits.
        let text = self.extractor.extract(locator);
        if text.trim().is_empty() {
            warn!("No text extracted from {}; recording empty chunk set", locator);
            self.write_cache(locator, &[]).await;
            return Ok((DocumentStatus::Empty, Vec::new(), Vec::new()));
        }

        // SEGMENT -> WINDOW
        let sentences = self.segmenter.segment(&text);
        let mut windows = build_windows(&sentences, self.chunking.window_size)?;
        debug!(
            "Document {}: {} sentences, {} windows",
            locator,
            sentences.len(),
            windows.len()
        );

        // EMBED: retry-wrapped; a mismatched batch degrades to exclusion
        // inside embed_in_batches rather than failing the document.
        let texts: Vec<String> = windows.iter().map(|w| w.text.clone()).collect();
        let embeddings = self.retry.run("embed-windows", || {
            embed_in_batches(
                self.embedder.as_ref(),
                &texts,
                self.chunking.window_batch_size,
            )
        })?;

        for (window, embedding) in windows.iter_mut().zip(embeddings) {
            window.embedding = embedding;
        }
        let mut windows = retain_embedded(windows);

        // BOUND: document-local threshold over this document's own distance
        // distribution.
        let distances = compute_distances(&mut windows)?;
        if let Some((min, max)) = distance_stats(&distances) {
            debug!(
                "Document {}: {} distances in [{:.4}, {:.4}]",
                locator,
                distances.len(),
                min,
                max
            );
        }
        let boundaries = detect_boundaries(&distances, self.chunking.boundary_percentile);

        // ASSEMBLE
        let chunks = assemble_chunks(&windows, &boundaries);

        // RE_EMBED: optional; chunk texts are long, so batches stay small.
        let chunk_embeddings = if self.chunking.embed_chunks && !chunks.is_empty() {
            self.retry.run("embed-chunks", || {
                embed_in_batches(
                    self.embedder.as_ref(),
                    &chunks,
                    self.chunking.chunk_batch_size,
                )
            })?
        } else {
            Vec::new()
        };

        // CACHE_WRITE: non-fatal; the result is returned either way.
        self.write_cache(locator, &chunks).await;

        Ok((DocumentStatus::Completed, chunks, chunk_embeddings))
    }

    async fn write_cache(&self, locator: &str, chunks: &[String]) {
        if let Err(e) = self.cache.put(locator, chunks).await {
            warn!("Failed to cache chunks for {}: {:#}", locator, e);
        }
    }
}
