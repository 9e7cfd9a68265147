
use tracing::debug;

/// Splits extracted document text into ordered sentences.
///
/// The model-backed segmenter used in production runs behind this seam; the
/// pipeline only depends on receiving sentences in document order.
pub trait SentenceSegmenter {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Rule-based segmenter splitting on terminal punctuation followed by
/// whitespace or end of input.
///
/// Single forward pass over the char stream, so multi-million-character
/// documents are handled without intermediate allocations beyond the output
/// sentences themselves.
#[derive(Debug, Clone, Default)]
pub struct RuleSegmenter;

impl RuleSegmenter {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl SentenceSegmenter for RuleSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            current.push(c);

            if matches!(c, '.' | '!' | '?') {
                // A terminator only closes a sentence when followed by
                // whitespace or the end of the text, so "3.14" and "e.g."
                // stay intact mid-token.
                let closes = match chars.peek() {
                    None => true,
                    Some(next) => next.is_whitespace(),
                };

                if closes {
                    let trimmed = current.trim();
                    if !trimmed.is_empty() {
                        sentences.push(trimmed.to_string());
                    }
                    current.clear();
                }
            }
        }

        let trailing = current.trim();
        if !trailing.is_empty() {
            sentences.push(trailing.to_string());
        }

        debug!(
            "Segmented {} bytes into {} sentences",
            text.len(),
            sentences.len()
        );

        sentences
    }
}
