#[cfg(test)]
mod tests;

use tracing::debug;

use crate::window::SentenceWindow;

/// Partition windows into contiguous chunks at the given boundaries.
///
/// Boundary index `x` closes the current chunk after `windows[x]`; the next
/// chunk starts at `windows[x + 1]`. A trailing chunk collects whatever
/// remains after the last boundary. Chunk texts are the space-joined window
/// texts, trimmed. Every window lands in exactly one chunk, in document
/// order, so chunk count = boundary count + 1 for non-empty input.
pub fn assemble_chunks(windows: &[SentenceWindow], boundaries: &[usize]) -> Vec<String> {
    if windows.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::with_capacity(boundaries.len() + 1);
    let mut start = 0;

    for &boundary in boundaries {
        if boundary >= windows.len() {
            break;
        }
        chunks.push(join_windows(&windows[start..=boundary]));
        start = boundary + 1;
    }

    if start < windows.len() {
        chunks.push(join_windows(&windows[start..]));
    }

    debug!(
        "Assembled {} chunks from {} windows at {} boundaries",
        chunks.len(),
        windows.len(),
        boundaries.len()
    );

    chunks
}

fn join_windows(windows: &[SentenceWindow]) -> String {
    windows
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
