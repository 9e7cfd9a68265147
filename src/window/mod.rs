
use std::collections::VecDeque;

use anyhow::{Result, ensure};
use tracing::debug;

/// A sliding window of consecutive sentences; the base granularity for
/// adjacent-distance computation.
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceWindow {
    /// Space-joined text of the windowed sentences
    pub text: String,
    /// Source sentence indices; always a consecutive, gap-free run
    pub sentence_indices: Vec<usize>,
    /// Embedding vector, attached after the embedding stage
    pub embedding: Option<Vec<f32>>,
    /// Cosine distance to the following window, attached by the boundary
    /// detector
    pub distance_to_next: Option<f32>,
}

impl SentenceWindow {
    #[inline]
    pub fn new(text: String, sentence_indices: Vec<usize>) -> Self {
        Self {
            text,
            sentence_indices,
            embedding: None,
            distance_to_next: None,
        }
    }
}

/// Build overlapping sentence windows with stride 1.
///
/// Maintains a FIFO buffer of sentences; whenever the buffer reaches
/// `window_size`, the buffered sentences are emitted as one window and the
/// oldest sentence is dropped. Produces `max(0, N - window_size + 1)` windows
/// for `N` input sentences. Pure function of its input.
#[inline]
pub fn build_windows(sentences: &[String], window_size: usize) -> Result<Vec<SentenceWindow>> {
    ensure!(window_size > 0, "window size must be at least 1");

    let mut windows = Vec::new();
    let mut buffer: VecDeque<(usize, &str)> = VecDeque::with_capacity(window_size);

    for (index, sentence) in sentences.iter().enumerate() {
        buffer.push_back((index, sentence.as_str()));

        if buffer.len() == window_size {
            let text = buffer
                .iter()
                .map(|(_, s)| *s)
                .collect::<Vec<_>>()
                .join(" ");
            let indices = buffer.iter().map(|(i, _)| *i).collect();
            windows.push(SentenceWindow::new(text, indices));
            buffer.pop_front();
        }
    }

    debug!(
        "Built {} windows from {} sentences (window size {})",
        windows.len(),
        sentences.len(),
        window_size
    );

    Ok(windows)
}
