use std::io::Write;

use tempfile::NamedTempFile;

use super::*;

struct FixturePages {
    pages: Vec<String>,
    fail_at: Option<usize>,
}

impl PageSource for FixturePages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        if self.fail_at == Some(index) {
            anyhow::bail!("page {index} unreadable");
        }
        Ok(self.pages[index].clone())
    }
}

fn fixture(n: usize) -> FixturePages {
    FixturePages {
        pages: (0..n).map(|i| format!("Page {i} text.")).collect(),
        fail_at: None,
    }
}

#[test]
fn plain_text_extractor_reads_file() {
    let mut file = NamedTempFile::new().expect("can create temp file");
    write!(file, "Document body. Second sentence.").expect("can write temp file");

    let extractor = PlainTextExtractor::new();
    let text = extractor.extract(&file.path().to_string_lossy());

    assert_eq!(text, "Document body. Second sentence.");
}

#[test]
fn missing_file_degrades_to_empty_string() {
    let extractor = PlainTextExtractor::new();
    let text = extractor.extract("/nonexistent/path/to/document.txt");
    assert!(text.is_empty());
}

#[test]
fn pages_rejoined_in_order() {
    let source = fixture(7);
    let text = extract_pages(&source, 3).expect("extraction should succeed");

    let expected = (0..7)
        .map(|i| format!("Page {i} text."))
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(text, expected);
}

#[test]
fn parallel_output_matches_sequential() {
    let source = fixture(12);
    let sequential = extract_pages(&source, 1).expect("sequential extraction");

    for workers in [2, 3, 4, 8, 64] {
        let parallel = extract_pages(&source, workers).expect("parallel extraction");
        assert_eq!(parallel, sequential, "workers={workers}");
    }
}

#[test]
fn zero_pages_yields_empty_string() {
    let source = fixture(0);
    let text = extract_pages(&source, 4).expect("extraction should succeed");
    assert!(text.is_empty());
}

#[test]
fn single_page() {
    let source = fixture(1);
    let text = extract_pages(&source, 4).expect("extraction should succeed");
    assert_eq!(text, "Page 0 text.");
}

#[test]
fn failing_page_propagates() {
    let source = FixturePages {
        pages: (0..5).map(|i| format!("Page {i}.")).collect(),
        fail_at: Some(3),
    };

    assert!(extract_pages(&source, 2).is_err());
    assert!(extract_pages(&source, 1).is_err());
}
