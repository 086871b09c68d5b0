//! Minefield questions and evaluations.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::core::Metric;
use crate::error::ValidationError;
use crate::rules::{Assessment, Exercise};

/// Word-count bounds of a Minefield question.
pub const MIN_WORDS: usize = 6;
pub const MAX_WORDS: usize = 8;

/// Selected difficulty. Harder levels plant more mines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MinefieldDifficulty {
    #[default]
    Easy,
    Normal,
    Hard,
    Expert,
}

impl MinefieldDifficulty {
    pub const ALL: [MinefieldDifficulty; 4] = [
        MinefieldDifficulty::Easy,
        MinefieldDifficulty::Normal,
        MinefieldDifficulty::Hard,
        MinefieldDifficulty::Expert,
    ];

    /// Number of required (mine) words a question must carry.
    #[must_use]
    pub fn required_word_count(self) -> usize {
        match self {
            MinefieldDifficulty::Easy | MinefieldDifficulty::Normal => 1,
            MinefieldDifficulty::Hard | MinefieldDifficulty::Expert => 2,
        }
    }

    /// Parse a case-insensitive name, falling back on anything unknown.
    #[must_use]
    pub fn from_raw(raw: &str, fallback: Self) -> Self {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(raw))
            .unwrap_or(fallback)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MinefieldDifficulty::Easy => "EASY",
            MinefieldDifficulty::Normal => "NORMAL",
            MinefieldDifficulty::Hard => "HARD",
            MinefieldDifficulty::Expert => "EXPERT",
        }
    }
}

/// A situation, a question about it, and 6-8 words to answer with.
///
/// Some of the words are required ("mines"); an answer that leaves a mine
/// out is penalized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinefieldQuestion {
    pub situation: String,
    pub question: String,
    pub words: Vec<String>,
    pub required_word_indices: Vec<usize>,
    #[serde(default)]
    pub difficulty: MinefieldDifficulty,
}

impl MinefieldQuestion {
    /// Build a question, trimming text, dropping blank and repeated words
    /// (case-insensitive) and dropping out-of-range or repeated indices.
    #[must_use]
    pub fn new(
        situation: impl Into<String>,
        question: impl Into<String>,
        words: impl IntoIterator<Item = impl Into<String>>,
        required_word_indices: impl IntoIterator<Item = usize>,
        difficulty: MinefieldDifficulty,
    ) -> Self {
        let words = clean_words(words.into_iter().map(Into::into));
        let required_word_indices = clean_indices(required_word_indices, words.len(), usize::MAX);
        Self {
            situation: situation.into().trim().to_string(),
            question: question.into().trim().to_string(),
            words,
            required_word_indices,
            difficulty,
        }
    }

    /// The question reshaped for a round played at `difficulty`: cleaned as
    /// in [`new`](Self::new), indices cut down to the difficulty's required
    /// count, and the difficulty forced.
    #[must_use]
    pub fn normalized_for(self, difficulty: MinefieldDifficulty) -> Self {
        let words = clean_words(self.words);
        let required_word_indices = clean_indices(
            self.required_word_indices,
            words.len(),
            difficulty.required_word_count(),
        );
        Self {
            situation: self.situation.trim().to_string(),
            question: self.question.trim().to_string(),
            words,
            required_word_indices,
            difficulty,
        }
    }

    /// The required words, in index order.
    pub fn required_words(&self) -> impl Iterator<Item = &str> + '_ {
        self.required_word_indices
            .iter()
            .filter_map(|&i| self.words.get(i).map(String::as_str))
    }
}

fn clean_words(words: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut cleaned = Vec::new();
    for word in words {
        let trimmed = word.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        cleaned.push(trimmed.to_string());
    }
    cleaned
}

fn clean_indices(indices: impl IntoIterator<Item = usize>, len: usize, keep: usize) -> Vec<usize> {
    let mut cleaned: Vec<usize> = Vec::new();
    for index in indices {
        if index < len && !cleaned.contains(&index) {
            cleaned.push(index);
        }
    }
    cleaned.truncate(keep);
    cleaned
}

impl Exercise for MinefieldQuestion {
    fn signature(&self) -> String {
        let mut signature = self.situation.to_lowercase();
        signature.push('|');
        signature.push_str(&self.question.to_lowercase());
        for word in &self.words {
            signature.push('|');
            signature.push_str(&word.to_lowercase());
        }
        for index in &self.required_word_indices {
            signature.push('|');
            signature.push_str(&index.to_string());
        }
        signature
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.situation.trim().is_empty() {
            return Err(ValidationError::EmptyField("situation"));
        }
        if self.question.trim().is_empty() {
            return Err(ValidationError::EmptyField("question"));
        }
        let count = self.words.len();
        if !(MIN_WORDS..=MAX_WORDS).contains(&count) {
            return Err(ValidationError::CountOutOfRange {
                field: "words",
                count,
                min: MIN_WORDS,
                max: MAX_WORDS,
            });
        }
        let required = self.difficulty.required_word_count();
        if self.required_word_indices.len() < required {
            return Err(ValidationError::CountOutOfRange {
                field: "required_word_indices",
                count: self.required_word_indices.len(),
                min: required,
                max: count,
            });
        }
        if let Some(&index) = self.required_word_indices.iter().find(|&&i| i >= count) {
            return Err(ValidationError::IndexOutOfRange {
                field: "required_word_indices",
                index,
                len: count,
            });
        }
        Ok(())
    }
}

/// Collaborator grading of one Minefield answer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinefieldEvaluation {
    // === Sub-scores (0..=100) ===
    pub grammar_score: i64,
    pub naturalness_score: i64,
    pub word_usage_score: i64,

    // === Word usage ===
    pub used_word_count: u32,
    pub total_word_count: u32,
    pub used_words: Vec<String>,
    pub unused_words: Vec<String>,
    pub missing_required_words: Vec<String>,
    pub advanced_transform_used: bool,

    // === Feedback text ===
    pub strengths_comment: String,
    pub improvement_comment: String,
    pub improved_sentence: String,
    pub example_basic: String,
    pub example_intermediate: String,
    pub example_advanced: String,
}

impl MinefieldEvaluation {
    /// Whether every word of the question made it into the answer.
    #[must_use]
    pub fn used_all_words(&self) -> bool {
        self.used_word_count >= self.total_word_count
    }

    /// Whether a required word was left out.
    #[must_use]
    pub fn missed_a_mine(&self) -> bool {
        !self.missing_required_words.is_empty()
    }
}

fn trimmed(text: String) -> String {
    text.trim().to_string()
}

fn non_blank(list: Vec<String>) -> Vec<String> {
    list.into_iter()
        .map(trimmed)
        .filter(|s| !s.is_empty())
        .collect()
}

impl Assessment for MinefieldEvaluation {
    fn normalized(self) -> Self {
        Self {
            grammar_score: self.grammar_score.clamp(0, 100),
            naturalness_score: self.naturalness_score.clamp(0, 100),
            word_usage_score: self.word_usage_score.clamp(0, 100),
            used_word_count: self.used_word_count,
            total_word_count: self.total_word_count,
            used_words: non_blank(self.used_words),
            unused_words: non_blank(self.unused_words),
            missing_required_words: non_blank(self.missing_required_words),
            advanced_transform_used: self.advanced_transform_used,
            strengths_comment: trimmed(self.strengths_comment),
            improvement_comment: trimmed(self.improvement_comment),
            improved_sentence: trimmed(self.improved_sentence),
            example_basic: trimmed(self.example_basic),
            example_intermediate: trimmed(self.example_intermediate),
            example_advanced: trimmed(self.example_advanced),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.total_word_count == 0 {
            return Err(ValidationError::Inconsistent("total_word_count must be positive"));
        }
        if self.used_word_count > self.total_word_count {
            return Err(ValidationError::Inconsistent(
                "used_word_count exceeds total_word_count",
            ));
        }
        let texts = [
            ("strengths_comment", &self.strengths_comment),
            ("improvement_comment", &self.improvement_comment),
            ("improved_sentence", &self.improved_sentence),
            ("example_basic", &self.example_basic),
            ("example_intermediate", &self.example_intermediate),
            ("example_advanced", &self.example_advanced),
        ];
        match texts.iter().find(|(_, text)| text.trim().is_empty()) {
            Some((field, _)) => Err(ValidationError::EmptyField(*field)),
            None => Ok(()),
        }
    }

    fn metrics(&self) -> SmallVec<[(Metric, i64); 4]> {
        smallvec![
            (Metric::Grammar, self.grammar_score),
            (Metric::Naturalness, self.naturalness_score),
            (Metric::WordUsage, self.word_usage_score),
        ]
    }
}
