//! Which of a question's words an answer uses.

use crate::games::text::{normalize_for_match, term_used, tokenize, variant_set};

/// Local word-usage check run before an answer is sent for grading.
pub struct WordUsageMatcher;

impl WordUsageMatcher {
    /// Indices into `words` that `sentence` uses, ascending.
    ///
    /// Inflected forms count (`studied` uses `study`), and a multi-word
    /// entry counts when it appears verbatim or all its words appear.
    #[must_use]
    pub fn used_indices(words: &[String], sentence: &str) -> Vec<usize> {
        let normalized = normalize_for_match(sentence);
        if normalized.is_empty() || words.is_empty() {
            return Vec::new();
        }
        let stems = variant_set(&tokenize(&normalized));
        words
            .iter()
            .enumerate()
            .filter(|(_, word)| term_used(word, &normalized, &stems))
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether `sentence` uses at least one of `words`.
    #[must_use]
    pub fn uses_any(words: &[String], sentence: &str) -> bool {
        !Self::used_indices(words, sentence).is_empty()
    }
}
