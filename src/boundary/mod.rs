
use anyhow::{Result, ensure};
use itertools::Itertools;
use tracing::debug;

use crate::window::SentenceWindow;

/// Cosine similarity as the normalized dot product.
///
/// A zero-magnitude vector is a data-quality error in the embedding output
/// and is surfaced rather than silently mapped to zero distance.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    ensure!(
        a.len() == b.len(),
        "embedding dimensions differ: {} vs {}",
        a.len(),
        b.len()
    );

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }

    ensure!(
        norm_a > 0.0 && norm_b > 0.0,
        "cannot compute cosine similarity against a zero-magnitude embedding"
    );

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())) as f32)
}

/// Compute the adjacent cosine distance series over embedded windows.
///
/// `distances[i]` is `1 - cos(windows[i], windows[i+1])`; the same value is
/// recorded on `windows[i].distance_to_next`. Every window must carry an
/// embedding (windows without one are excluded upstream). Output length is
/// `windows.len() - 1`, or empty for fewer than two windows.
pub fn compute_distances(windows: &mut [SentenceWindow]) -> Result<Vec<f32>> {
    if windows.len() < 2 {
        return Ok(Vec::new());
    }

    let mut distances = Vec::with_capacity(windows.len() - 1);

    for i in 0..windows.len() - 1 {
        let a = windows[i]
            .embedding
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("window {} has no embedding", i))?;
        let b = windows[i + 1]
            .embedding
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("window {} has no embedding", i + 1))?;

        let distance = 1.0 - cosine_similarity(a, b)?;
        windows[i].distance_to_next = Some(distance);
        distances.push(distance);
    }

    Ok(distances)
}

/// Percentile via the standard linear-interpolation definition.
///
/// Returns `None` for an empty input. `p` is expected in `(0, 100)`.
#[inline]
pub fn percentile(values: &[f32], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted: Vec<f64> = values.iter().map(|v| f64::from(*v)).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        return Some(sorted[lower]);
    }

    let fraction = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Indices whose distance strictly exceeds the document-local percentile
/// threshold, ascending. Index `i` marks a boundary between windows `i` and
/// `i + 1`.
pub fn detect_boundaries(distances: &[f32], boundary_percentile: f64) -> Vec<usize> {
    let Some(threshold) = percentile(distances, boundary_percentile) else {
        return Vec::new();
    };

    let boundaries: Vec<usize> = distances
        .iter()
        .enumerate()
        .filter(|(_, d)| f64::from(**d) > threshold)
        .map(|(i, _)| i)
        .collect();

    debug!(
        "Detected {} boundaries over {} distances (p{} threshold {:.4})",
        boundaries.len(),
        distances.len(),
        boundary_percentile,
        threshold
    );

    boundaries
}

/// Drop windows that received no embedding, preserving order.
///
/// Distances are then computed over the surviving adjacency, so texts are
/// never paired with another window's vector.
pub fn retain_embedded(windows: Vec<SentenceWindow>) -> Vec<SentenceWindow> {
    let (kept, skipped): (Vec<_>, Vec<_>) =
        windows.into_iter().partition(|w| w.embedding.is_some());

    if !skipped.is_empty() {
        debug!(
            "Excluding {} windows without embeddings ({} remain)",
            skipped.len(),
            kept.len()
        );
    }

    kept
}

/// Convenience summary of a distance series for logging.
pub fn distance_stats(distances: &[f32]) -> Option<(f32, f32)> {
    distances
        .iter()
        .copied()
        .minmax()
        .into_option()
}
