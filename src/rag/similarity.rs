use std::collections::HashSet;

/// Textual relevance between two free-form strings, in `[0.0, 1.0]`.
///
/// Both inputs are lowercased and trimmed before comparison. Equal
/// normalized strings score 1.0; otherwise the score is the Jaccard
/// overlap of their whitespace token sets. Blank input on either side
/// scores 0.0; this never fails, whatever the caller passes.
pub fn score(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let tokens_a: HashSet<&str> = a.split_whitespace().collect();
    let tokens_b: HashSet<&str> = b.split_whitespace().collect();

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();

    intersection as f64 / union as f64
}
