//! Refiner questions, constraints and evaluations.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::core::Metric;
use crate::error::ValidationError;
use crate::rules::{Assessment, Exercise};

/// Selected difficulty, passed through to question generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefinerDifficulty {
    #[default]
    Easy,
    Normal,
    Hard,
    Expert,
}

/// CEFR level an answer was graded at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RefinerLevel {
    #[default]
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl RefinerLevel {
    pub const ALL: [RefinerLevel; 6] = [
        RefinerLevel::A1,
        RefinerLevel::A2,
        RefinerLevel::B1,
        RefinerLevel::B2,
        RefinerLevel::C1,
        RefinerLevel::C2,
    ];

    /// Levels an evaluation must show an example for.
    pub const EXAMPLE_LEVELS: [RefinerLevel; 5] = [
        RefinerLevel::A2,
        RefinerLevel::B1,
        RefinerLevel::B2,
        RefinerLevel::C1,
        RefinerLevel::C2,
    ];

    /// Points for an answer graded at this level.
    #[must_use]
    pub fn base_score(self) -> i64 {
        match self {
            RefinerLevel::A1 => 100,
            RefinerLevel::A2 => 150,
            RefinerLevel::B1 => 200,
            RefinerLevel::B2 => 270,
            RefinerLevel::C1 => 350,
            RefinerLevel::C2 => 450,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            RefinerLevel::A1 => "A1",
            RefinerLevel::A2 => "A2",
            RefinerLevel::B1 => "B1",
            RefinerLevel::B2 => "B2",
            RefinerLevel::C1 => "C1",
            RefinerLevel::C2 => "C2",
        }
    }

    /// Parse a case-insensitive level name, falling back on anything unknown.
    #[must_use]
    pub fn from_raw(raw: &str, fallback: Self) -> Self {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(raw))
            .unwrap_or(fallback)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WordLimitMode {
    /// At most `value` words.
    #[default]
    Max,
    /// Exactly `value` words.
    Exact,
}

impl WordLimitMode {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            WordLimitMode::Max => "MAX",
            WordLimitMode::Exact => "EXACT",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordLimit {
    pub mode: WordLimitMode,
    /// Never below 1.
    pub value: u32,
}

impl WordLimit {
    #[must_use]
    pub fn new(mode: WordLimitMode, value: u32) -> Self {
        Self {
            mode,
            value: value.max(1),
        }
    }

    #[must_use]
    pub fn max(value: u32) -> Self {
        Self::new(WordLimitMode::Max, value)
    }

    #[must_use]
    pub fn exact(value: u32) -> Self {
        Self::new(WordLimitMode::Exact, value)
    }

    /// Whether `word_count` is within the limit.
    #[must_use]
    pub fn allows(&self, word_count: usize) -> bool {
        let value = self.value.max(1) as usize;
        match self.mode {
            WordLimitMode::Max => word_count <= value,
            WordLimitMode::Exact => word_count == value,
        }
    }
}

/// Rules a rewrite must follow. Each part is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinerConstraints {
    pub banned_words: Vec<String>,
    pub word_limit: Option<WordLimit>,
    /// Empty when the question has no required word.
    pub required_word: String,
}

impl RefinerConstraints {
    /// Trim everything; drop blank and repeated (case-insensitive) banned words.
    #[must_use]
    pub fn new(
        banned_words: impl IntoIterator<Item = impl Into<String>>,
        word_limit: Option<WordLimit>,
        required_word: impl Into<String>,
    ) -> Self {
        Self {
            banned_words: clean_banned(banned_words.into_iter().map(Into::into)),
            word_limit: word_limit.map(|limit| WordLimit::new(limit.mode, limit.value)),
            required_word: required_word.into().trim().to_string(),
        }
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        Self::new(self.banned_words, self.word_limit, self.required_word)
    }

    #[must_use]
    pub fn has_required_word(&self) -> bool {
        !self.required_word.trim().is_empty()
    }

    /// How many of the three constraint kinds are in play.
    #[must_use]
    pub fn active_count(&self) -> usize {
        usize::from(!self.banned_words.is_empty())
            + usize::from(self.word_limit.is_some())
            + usize::from(self.has_required_word())
    }

    /// `B:w1,w2,` then `|W:MODE:n` then `|R:word`, each only when present.
    #[must_use]
    pub fn signature(&self) -> String {
        let mut signature = String::new();
        if !self.banned_words.is_empty() {
            signature.push_str("B:");
            for word in &self.banned_words {
                signature.push_str(&word.to_lowercase());
                signature.push(',');
            }
        }
        if let Some(limit) = &self.word_limit {
            signature.push_str(&format!("|W:{}:{}", limit.mode.name(), limit.value));
        }
        if self.has_required_word() {
            signature.push_str("|R:");
            signature.push_str(&self.required_word.to_lowercase());
        }
        signature
    }
}

fn clean_banned(words: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for word in words {
        let trimmed = word.trim();
        if trimmed.is_empty() || cleaned.iter().any(|w| w.eq_ignore_ascii_case(trimmed)) {
            continue;
        }
        cleaned.push(trimmed.to_string());
    }
    cleaned
}

/// A sentence to rewrite in a given style, under constraints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinerQuestion {
    pub source_sentence: String,
    pub style_context: String,
    #[serde(default)]
    pub constraints: RefinerConstraints,
    pub hint: String,
    #[serde(default)]
    pub difficulty: RefinerDifficulty,
}

impl RefinerQuestion {
    #[must_use]
    pub fn new(
        source_sentence: impl Into<String>,
        style_context: impl Into<String>,
        constraints: RefinerConstraints,
        hint: impl Into<String>,
        difficulty: RefinerDifficulty,
    ) -> Self {
        Self {
            source_sentence: source_sentence.into(),
            style_context: style_context.into(),
            constraints,
            hint: hint.into(),
            difficulty,
        }
        .normalized()
    }

    /// Trimmed text and cleaned constraints.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            source_sentence: self.source_sentence.trim().to_string(),
            style_context: self.style_context.trim().to_string(),
            constraints: self.constraints.normalized(),
            hint: self.hint.trim().to_string(),
            difficulty: self.difficulty,
        }
    }
}

impl Exercise for RefinerQuestion {
    fn signature(&self) -> String {
        format!(
            "{}|{}|{}",
            self.source_sentence.to_lowercase(),
            self.style_context.to_lowercase(),
            self.constraints.signature()
        )
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.source_sentence.trim().is_empty() {
            return Err(ValidationError::EmptyField("source_sentence"));
        }
        if self.style_context.trim().is_empty() {
            return Err(ValidationError::EmptyField("style_context"));
        }
        if self.hint.trim().is_empty() {
            return Err(ValidationError::EmptyField("hint"));
        }
        let active = self.constraints.active_count();
        if !(1..=2).contains(&active) {
            return Err(ValidationError::CountOutOfRange {
                field: "constraints",
                count: active,
                min: 1,
                max: 2,
            });
        }
        Ok(())
    }

    fn hint(&self) -> Option<&str> {
        Some(self.hint.as_str()).filter(|hint| !hint.is_empty())
    }
}

/// The answer rewritten at one CEFR level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelExample {
    pub level: RefinerLevel,
    pub sentence: String,
    pub comment: String,
}

impl LevelExample {
    #[must_use]
    pub fn new(level: RefinerLevel, sentence: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            level,
            sentence: sentence.into(),
            comment: comment.into(),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.sentence.trim().is_empty() && !self.comment.trim().is_empty()
    }
}

/// Collaborator grading of one rewrite.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinerEvaluation {
    pub level: RefinerLevel,

    // === Sub-scores (0..=100) ===
    pub lexical_score: i64,
    pub syntax_score: i64,
    pub naturalness_score: i64,
    pub compliance_score: i64,

    /// The required word was used in an inventive way.
    pub creative_required_word_use: bool,
    pub insight: String,
    pub level_examples: Vec<LevelExample>,
}

impl RefinerEvaluation {
    /// Example for `level`, if present.
    #[must_use]
    pub fn example(&self, level: RefinerLevel) -> Option<&LevelExample> {
        self.level_examples.iter().find(|e| e.level == level)
    }
}

impl Assessment for RefinerEvaluation {
    fn normalized(self) -> Self {
        Self {
            level: self.level,
            lexical_score: self.lexical_score.clamp(0, 100),
            syntax_score: self.syntax_score.clamp(0, 100),
            naturalness_score: self.naturalness_score.clamp(0, 100),
            compliance_score: self.compliance_score.clamp(0, 100),
            creative_required_word_use: self.creative_required_word_use,
            insight: self.insight.trim().to_string(),
            level_examples: self
                .level_examples
                .into_iter()
                .map(|e| LevelExample::new(e.level, e.sentence.trim(), e.comment.trim()))
                .collect(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.insight.trim().is_empty() {
            return Err(ValidationError::EmptyField("insight"));
        }
        if self.level_examples.iter().any(|e| !e.is_complete()) {
            return Err(ValidationError::EmptyField("level_examples"));
        }
        match RefinerLevel::EXAMPLE_LEVELS
            .into_iter()
            .find(|&level| self.example(level).is_none())
        {
            Some(level) => Err(ValidationError::MissingLevelExample(level.name())),
            None => Ok(()),
        }
    }

    fn metrics(&self) -> SmallVec<[(Metric, i64); 4]> {
        smallvec![
            (Metric::Lexical, self.lexical_score),
            (Metric::Syntax, self.syntax_score),
            (Metric::Naturalness, self.naturalness_score),
            (Metric::Compliance, self.compliance_score),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn examples() -> Vec<LevelExample> {
        RefinerLevel::EXAMPLE_LEVELS
            .into_iter()
            .map(|level| LevelExample::new(level, format!("{} sentence", level.name()), "why"))
            .collect()
    }

    fn question(constraints: RefinerConstraints) -> RefinerQuestion {
        RefinerQuestion::new(
            "I want coffee.",
            "Polite request to a barista",
            constraints,
            "Try 'could'",
            RefinerDifficulty::Normal,
        )
    }

    #[test]
    fn test_level_base_scores() {
        let scores: Vec<i64> = RefinerLevel::ALL.iter().map(|l| l.base_score()).collect();
        assert_eq!(scores, vec![100, 150, 200, 270, 350, 450]);
        assert_eq!(RefinerLevel::from_raw("b2", RefinerLevel::A1), RefinerLevel::B2);
        assert_eq!(RefinerLevel::from_raw("D1", RefinerLevel::A1), RefinerLevel::A1);
    }

    #[test]
    fn test_word_limit() {
        assert!(WordLimit::max(5).allows(5));
        assert!(!WordLimit::max(5).allows(6));
        assert!(WordLimit::exact(3).allows(3));
        assert!(!WordLimit::exact(3).allows(2));
        assert_eq!(WordLimit::max(0).value, 1);
    }

    #[test]
    fn test_constraints_clean_and_count() {
        let c = RefinerConstraints::new([" very ", "Very", "", "really"], None, "  ");
        assert_eq!(c.banned_words, vec!["very", "really"]);
        assert!(!c.has_required_word());
        assert_eq!(c.active_count(), 1);

        let c = RefinerConstraints::new(Vec::<String>::new(), Some(WordLimit::max(8)), "kindly");
        assert_eq!(c.active_count(), 2);
    }

    #[test]
    fn test_constraint_signature() {
        let c = RefinerConstraints::new(["Very", "really"], Some(WordLimit::max(10)), "Kindly");
        assert_eq!(c.signature(), "B:very,really,|W:MAX:10|R:kindly");

        let c = RefinerConstraints::new(Vec::<String>::new(), Some(WordLimit::exact(6)), "");
        assert_eq!(c.signature(), "|W:EXACT:6");
    }

    #[test]
    fn test_question_signature_and_hint() {
        let q = question(RefinerConstraints::new(["want"], None, ""));
        assert_eq!(
            q.signature(),
            "i want coffee.|polite request to a barista|B:want,"
        );
        assert_eq!(q.hint(), Some("Try 'could'"));
    }

    #[test]
    fn test_question_validation() {
        assert!(question(RefinerConstraints::new(["want"], None, "")).is_valid());

        let none = question(RefinerConstraints::default());
        assert!(matches!(
            none.validate(),
            Err(ValidationError::CountOutOfRange { count: 0, .. })
        ));

        let three = question(RefinerConstraints::new(["want"], Some(WordLimit::max(8)), "please"));
        assert!(three.validate().is_err());

        let mut q = question(RefinerConstraints::new(["want"], None, ""));
        q.hint = " ".to_string();
        assert_eq!(q.validate(), Err(ValidationError::EmptyField("hint")));
    }

    #[test]
    fn test_evaluation_validation() {
        let mut e = RefinerEvaluation {
            level: RefinerLevel::B1,
            insight: "Nice pivot to a question.".to_string(),
            level_examples: examples(),
            ..RefinerEvaluation::default()
        };
        assert!(e.validate().is_ok());

        e.level_examples.retain(|x| x.level != RefinerLevel::C1);
        assert_eq!(e.validate(), Err(ValidationError::MissingLevelExample("C1")));

        let mut e = RefinerEvaluation {
            insight: "ok".to_string(),
            level_examples: examples(),
            ..RefinerEvaluation::default()
        };
        e.level_examples[0].comment = " ".to_string();
        assert!(e.validate().is_err());

        e.insight.clear();
        assert_eq!(e.validate(), Err(ValidationError::EmptyField("insight")));
    }

    #[test]
    fn test_evaluation_normalized_clamps() {
        let e = RefinerEvaluation {
            lexical_score: 130,
            syntax_score: -1,
            insight: "  spaced  ".to_string(),
            ..RefinerEvaluation::default()
        }
        .normalized();
        assert_eq!(e.lexical_score, 100);
        assert_eq!(e.syntax_score, 0);
        assert_eq!(e.insight, "spaced");
        assert_eq!(e.metrics().len(), 4);
    }

    #[test]
    fn test_evaluation_json() {
        let json = r#"{
            "level": "C1",
            "lexical_score": 80,
            "insight": "x",
            "level_examples": [{"level": "A2", "sentence": "s", "comment": "c"}]
        }"#;
        let e: RefinerEvaluation = serde_json::from_str(json).unwrap();
        assert_eq!(e.level, RefinerLevel::C1);
        assert!(e.example(RefinerLevel::A2).is_some());
        assert!(!e.creative_required_word_use);
    }
}
