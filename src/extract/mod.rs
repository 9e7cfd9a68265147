#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Produces the full text of a document from its canonical locator.
///
/// Failures are non-fatal "no content": implementations log and return an
/// empty string rather than erroring, and the pipeline skips the document.
pub trait TextExtractor {
    fn extract(&self, locator: &str) -> String;
}

/// Extractor for plain-text document files addressed by filesystem path.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, locator: &str) -> String {
        match std::fs::read_to_string(Path::new(locator)) {
            Ok(text) => {
                debug!("Extracted {} chars from {}", text.len(), locator);
                text
            }
            Err(e) => {
                warn!("Failed to read document {}: {}", locator, e);
                String::new()
            }
        }
    }
}

/// A document addressable page by page.
///
/// `page_text` must be a pure function of the page index so pages can be
/// extracted on any worker in any order.
pub trait PageSource: Sync {
    fn page_count(&self) -> usize;
    fn page_text(&self, index: usize) -> Result<String>;
}

/// Extract every page of `source` across a fixed-size pool of worker
/// threads, rejoined in page order.
///
/// An optimization only: the result is identical to extracting pages
/// sequentially. Workers take disjoint page-index slices and return plain
/// `(index, text)` values; no state is shared between them.
pub fn extract_pages<S: PageSource>(source: &S, workers: usize) -> Result<String> {
    let page_count = source.page_count();
    if page_count == 0 {
        return Ok(String::new());
    }

    let workers = workers.clamp(1, page_count);

    if workers == 1 {
        let mut pages = Vec::with_capacity(page_count);
        for index in 0..page_count {
            pages.push(
                source
                    .page_text(index)
                    .with_context(|| format!("Failed to extract page {index}"))?,
            );
        }
        return Ok(pages.join("\n"));
    }

    let (tx, rx) = mpsc::channel::<(usize, Result<String>)>();

    thread::scope(|scope| {
        for worker in 0..workers {
            let tx = tx.clone();
            scope.spawn(move || {
                // Strided assignment keeps the slices disjoint without
                // precomputing ranges
                for index in (worker..page_count).step_by(workers) {
                    let result = source.page_text(index);
                    if tx.send((index, result)).is_err() {
                        return;
                    }
                }
            });
        }
    });
    drop(tx);

    let mut pages: Vec<Option<String>> = vec![None; page_count];
    for (index, result) in rx {
        let text = result.with_context(|| format!("Failed to extract page {index}"))?;
        pages[index] = Some(text);
    }

    debug!(
        "Extracted {} pages across {} workers",
        page_count, workers
    );

    let mut ordered = Vec::with_capacity(page_count);
    for (index, page) in pages.into_iter().enumerate() {
        ordered.push(page.with_context(|| format!("Page {index} missing from extraction"))?);
    }

    Ok(ordered.join("\n"))
}
