//! Local constraint check for Refiner answers.

use rustc_hash::FxHashSet;

use super::model::RefinerConstraints;
use crate::games::text::{normalize_for_match, stem_variants, term_used, tokenize, variant_set, TokenSpan};

/// How a sentence fares against a question's constraints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstraintReport {
    pub word_count: usize,
    pub banned_words_satisfied: bool,
    pub word_limit_satisfied: bool,
    pub required_word_satisfied: bool,
    /// Every constraint holds and the sentence has at least one word.
    pub all_satisfied: bool,
    /// Tokens that hit a banned word, for highlighting.
    pub banned_ranges: Vec<TokenSpan>,
}

/// Checks a draft against [`RefinerConstraints`].
pub struct ConstraintValidator;

impl ConstraintValidator {
    #[must_use]
    pub fn validate(constraints: &RefinerConstraints, sentence: &str) -> ConstraintReport {
        let spans = tokenize(sentence);
        let stems = variant_set(&spans);

        let banned = banned_stems(&constraints.banned_words);
        let banned_ranges: Vec<TokenSpan> = spans
            .iter()
            .filter(|span| span.variants.iter().any(|v| banned.contains(v)))
            .cloned()
            .collect();

        let word_count = spans.len();
        let banned_words_satisfied = banned_ranges.is_empty();
        let word_limit_satisfied = constraints
            .word_limit
            .map_or(true, |limit| limit.allows(word_count));
        let required_word_satisfied = !constraints.has_required_word()
            || term_used(
                &constraints.required_word,
                &normalize_for_match(sentence),
                &stems,
            );

        ConstraintReport {
            word_count,
            banned_words_satisfied,
            word_limit_satisfied,
            required_word_satisfied,
            all_satisfied: word_count > 0
                && banned_words_satisfied
                && word_limit_satisfied
                && required_word_satisfied,
            banned_ranges,
        }
    }
}

/// Variants of every banned word; phrases contribute each of their words.
fn banned_stems(banned_words: &[String]) -> FxHashSet<String> {
    banned_words
        .iter()
        .map(|word| normalize_for_match(word))
        .flat_map(|word| {
            word.split(' ')
                .flat_map(|part| stem_variants(part).into_iter())
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::refiner::WordLimit;

    #[test]
    fn test_banned_words_with_ranges() {
        let constraints = RefinerConstraints::new(["very"], None, "");
        let report = ConstraintValidator::validate(&constraints, "It is very, Very cold");

        assert!(!report.banned_words_satisfied);
        assert!(!report.all_satisfied);
        let ranges: Vec<(usize, usize)> = report.banned_ranges.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(ranges, vec![(6, 10), (12, 16)]);
    }

    #[test]
    fn test_banned_inflection() {
        let constraints = RefinerConstraints::new(["want"], None, "");
        let report = ConstraintValidator::validate(&constraints, "She wanted tea");
        assert!(!report.banned_words_satisfied);
        assert_eq!(report.banned_ranges[0].token, "wanted");
    }

    #[test]
    fn test_word_limit_modes() {
        let max = RefinerConstraints::new(Vec::<String>::new(), Some(WordLimit::max(3)), "");
        assert!(ConstraintValidator::validate(&max, "Could I, please?").all_satisfied);
        assert!(!ConstraintValidator::validate(&max, "Could I have one please").word_limit_satisfied);

        let exact = RefinerConstraints::new(Vec::<String>::new(), Some(WordLimit::exact(2)), "");
        assert!(ConstraintValidator::validate(&exact, "Thanks, friend").all_satisfied);
        assert!(!ConstraintValidator::validate(&exact, "Thanks").all_satisfied);
    }

    #[test]
    fn test_required_word() {
        let constraints = RefinerConstraints::new(Vec::<String>::new(), None, "appreciate");
        let report = ConstraintValidator::validate(&constraints, "I'd really appreciated it");
        assert!(report.required_word_satisfied);
        assert!(report.all_satisfied);

        let report = ConstraintValidator::validate(&constraints, "Thanks a lot");
        assert!(!report.required_word_satisfied);
    }

    #[test]
    fn test_empty_sentence_never_satisfies() {
        let constraints = RefinerConstraints::new(["very"], None, "");
        let report = ConstraintValidator::validate(&constraints, " 42 ");
        assert_eq!(report.word_count, 0);
        assert!(report.banned_words_satisfied);
        assert!(!report.all_satisfied);
    }
}
