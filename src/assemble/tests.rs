use super::*;

fn windows(texts: &[&str]) -> Vec<SentenceWindow> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| SentenceWindow::new(t.to_string(), vec![i]))
        .collect()
}

#[test]
fn no_boundaries_single_chunk() {
    let input = windows(&["A B C", "B C D", "C D E"]);
    let chunks = assemble_chunks(&input, &[]);

    assert_eq!(chunks, vec!["A B C B C D C D E"]);
}

#[test]
fn boundary_splits_at_index() {
    let input = windows(&["w0", "w1", "w2", "w3"]);
    // Boundary at 1 closes after w1
    let chunks = assemble_chunks(&input, &[1]);

    assert_eq!(chunks, vec!["w0 w1", "w2 w3"]);
}

#[test]
fn chunk_count_is_boundary_count_plus_one() {
    let input = windows(&["w0", "w1", "w2", "w3", "w4", "w5"]);
    let chunks = assemble_chunks(&input, &[0, 2, 4]);

    assert_eq!(chunks.len(), 4);
    assert_eq!(chunks, vec!["w0", "w1 w2", "w3 w4", "w5"]);
}

#[test]
fn concatenation_reconstructs_all_windows() {
    let input = windows(&["alpha", "beta", "gamma", "delta", "epsilon"]);
    let boundaries = vec![1, 3];

    let chunks = assemble_chunks(&input, &boundaries);
    let rejoined = chunks.join(" ");
    let expected = input
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    assert_eq!(rejoined, expected);
}

#[test]
fn boundary_at_last_gap() {
    let input = windows(&["w0", "w1", "w2"]);
    let chunks = assemble_chunks(&input, &[1]);
    assert_eq!(chunks, vec!["w0 w1", "w2"]);

    // Boundary index equal to the final window closes it; nothing trails
    let chunks = assemble_chunks(&input, &[2]);
    assert_eq!(chunks, vec!["w0 w1 w2"]);
}

#[test]
fn empty_windows_yield_no_chunks() {
    assert!(assemble_chunks(&[], &[]).is_empty());
    assert!(assemble_chunks(&[], &[0, 1]).is_empty());
}

#[test]
fn out_of_range_boundaries_ignored() {
    let input = windows(&["w0", "w1"]);
    let chunks = assemble_chunks(&input, &[0, 9]);

    assert_eq!(chunks, vec!["w0", "w1"]);
}

#[test]
fn chunk_text_is_trimmed() {
    let input = vec![SentenceWindow::new(" padded ".to_string(), vec![0])];
    let chunks = assemble_chunks(&input, &[]);

    assert_eq!(chunks, vec!["padded"]);
}
