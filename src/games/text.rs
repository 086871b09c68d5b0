//! Word matching shared by the local answer checks.
//!
//! Matching is deliberately light: ASCII-lowercased tokens, a handful of
//! suffix strips (`'s`, `ing`, `ied`→`y`, `ed`, `es`, `s`, `ly`), and phrase
//! matching by substring or by every part appearing somewhere.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Surface forms a token may stand for, most specific first.
pub type StemVariants = SmallVec<[String; 6]>;

/// One word in a sentence, with its byte range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
    pub token: String,
    /// First (most specific) variant.
    pub stem: String,
    pub variants: StemVariants,
}

/// Lowercase, map everything but letters, apostrophes and whitespace to a
/// space, and collapse runs of whitespace.
#[must_use]
pub fn normalize_for_match(raw: &str) -> String {
    let mapped: String = raw
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c == '\'' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The token itself plus its suffix-stripped forms, deduplicated.
#[must_use]
pub fn stem_variants(raw: &str) -> StemVariants {
    let token = raw.trim().to_ascii_lowercase();
    let mut variants = StemVariants::new();
    if token.is_empty() {
        return variants;
    }

    let len = token.len();
    let mut candidates: SmallVec<[String; 8]> = SmallVec::new();
    candidates.push(token.clone());
    if let Some(base) = token.strip_suffix("'s").filter(|_| len > 2) {
        candidates.push(base.to_string());
    }
    if let Some(base) = token.strip_suffix("ing").filter(|_| len > 4) {
        candidates.push(base.to_string());
    }
    if let Some(base) = token.strip_suffix("ied").filter(|_| len > 4) {
        candidates.push(format!("{base}y"));
    }
    if let Some(base) = token.strip_suffix("ed").filter(|_| len > 3) {
        candidates.push(base.to_string());
        candidates.push(format!("{base}e"));
    }
    if let Some(base) = token.strip_suffix("es").filter(|_| len > 3) {
        candidates.push(base.to_string());
        candidates.push(format!("{base}e"));
    }
    if let Some(base) = token.strip_suffix('s').filter(|_| len > 2) {
        candidates.push(base.to_string());
    }
    if let Some(base) = token.strip_suffix("ly").filter(|_| len > 3) {
        candidates.push(base.to_string());
    }

    for candidate in candidates {
        let clean: String = candidate
            .chars()
            .filter(|c| c.is_ascii_lowercase() || *c == '\'')
            .collect();
        if !clean.is_empty() && !variants.contains(&clean) {
            variants.push(clean);
        }
    }
    variants
}

/// Every run of ASCII letters and apostrophes in `sentence`.
#[must_use]
pub fn tokenize(sentence: &str) -> Vec<TokenSpan> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    let mut close = |start: usize, end: usize, spans: &mut Vec<TokenSpan>| {
        let token = &sentence[start..end];
        let variants = stem_variants(token);
        if let Some(stem) = variants.first().cloned() {
            spans.push(TokenSpan {
                start,
                end,
                token: token.to_string(),
                stem,
                variants,
            });
        }
    };

    for (i, c) in sentence.char_indices() {
        let in_word = c.is_ascii_alphabetic() || c == '\'';
        match (in_word, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                close(s, i, &mut spans);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        close(s, sentence.len(), &mut spans);
    }
    spans
}

/// Union of all variants of all tokens.
#[must_use]
pub fn variant_set(spans: &[TokenSpan]) -> FxHashSet<String> {
    spans
        .iter()
        .flat_map(|span| span.variants.iter().cloned())
        .collect()
}

/// Whether any variant of `word` is among `stems`.
#[must_use]
pub fn shares_variant(word: &str, stems: &FxHashSet<String>) -> bool {
    stem_variants(word).iter().any(|v| stems.contains(v))
}

/// Whether `term` (a word or a phrase) appears in a sentence.
///
/// `normalized_sentence` must come from [`normalize_for_match`] and `stems`
/// from [`variant_set`] over the same sentence. A phrase matches as a
/// substring, or when every one of its words matches on its own.
#[must_use]
pub fn term_used(term: &str, normalized_sentence: &str, stems: &FxHashSet<String>) -> bool {
    let term = normalize_for_match(term);
    if term.is_empty() {
        return false;
    }
    if term.contains(' ') {
        if normalized_sentence.contains(&term) {
            return true;
        }
        return term.split(' ').all(|part| shares_variant(part, stems));
    }
    shares_variant(&term, stems)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_for_match() {
        assert_eq!(normalize_for_match("  Hello,   WORLD! it's 9am "), "hello world it's am");
        assert_eq!(normalize_for_match("¿Qué?"), "qu");
        assert_eq!(normalize_for_match(""), "");
    }

    #[test]
    fn test_stem_variants() {
        assert_eq!(
            stem_variants("Running").as_slice(),
            ["running".to_string(), "runn".to_string()]
        );
        assert!(stem_variants("studied").contains(&"study".to_string()));
        assert!(stem_variants("baked").contains(&"bake".to_string()));
        assert!(stem_variants("boxes").contains(&"box".to_string()));
        assert!(stem_variants("quickly").contains(&"quick".to_string()));
        assert!(stem_variants("mom's").contains(&"mom".to_string()));
        assert!(stem_variants("   ").is_empty());
    }

    #[test]
    fn test_short_tokens_keep_their_suffix() {
        assert_eq!(stem_variants("is").as_slice(), ["is".to_string()]);
        assert_eq!(stem_variants("bed").as_slice(), ["bed".to_string()]);
    }

    #[test]
    fn test_tokenize_ranges() {
        let spans = tokenize("I don't like 3 apples.");
        let tokens: Vec<&str> = spans.iter().map(|s| s.token.as_str()).collect();
        assert_eq!(tokens, vec!["I", "don't", "like", "apples"]);
        assert_eq!((spans[3].start, spans[3].end), (15, 21));
        assert_eq!(spans[0].stem, "i");
    }

    #[test]
    fn test_term_used_single_and_phrase() {
        let sentence = "She was looking after the kids yesterday";
        let normalized = normalize_for_match(sentence);
        let stems = variant_set(&tokenize(sentence));

        assert!(term_used("kid", &normalized, &stems));
        assert!(term_used("look after", &normalized, &stems));
        assert!(term_used("Yesterday", &normalized, &stems));
        assert!(!term_used("tomorrow", &normalized, &stems));
        assert!(!term_used("  ", &normalized, &stems));
    }
}
