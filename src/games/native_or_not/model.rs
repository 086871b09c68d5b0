//! NativeOrNot questions, tags and round details.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::rules::Exercise;

/// Options shown per question.
pub const OPTION_COUNT: usize = 3;
/// Reason choices shown per question.
pub const REASON_COUNT: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NativeOrNotDifficulty {
    #[default]
    Easy,
    Normal,
    Hard,
    Expert,
}

/// Streak from which questions are requested at `Normal` or harder.
pub const STREAK_FOR_NORMAL: u32 = 3;

impl NativeOrNotDifficulty {
    /// Difficulty earned by the current streak alone. The next question is
    /// requested at the harder of this and the selected difficulty.
    #[must_use]
    pub fn for_streak(streak: u32) -> Self {
        if streak >= STREAK_FOR_NORMAL {
            NativeOrNotDifficulty::Normal
        } else {
            NativeOrNotDifficulty::Easy
        }
    }
}

/// What makes the awkward option awkward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NativeOrNotTag {
    Collocation,
    Spoken,
    LiteralTranslation,
    #[default]
    Register,
    RegionalVariant,
    TenseSense,
}

impl NativeOrNotTag {
    /// Declaration order; weak-tag ties resolve to the earliest.
    pub const ALL: [NativeOrNotTag; 6] = [
        NativeOrNotTag::Collocation,
        NativeOrNotTag::Spoken,
        NativeOrNotTag::LiteralTranslation,
        NativeOrNotTag::Register,
        NativeOrNotTag::RegionalVariant,
        NativeOrNotTag::TenseSense,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            NativeOrNotTag::Collocation => "COLLOCATION",
            NativeOrNotTag::Spoken => "SPOKEN",
            NativeOrNotTag::LiteralTranslation => "LITERAL_TRANSLATION",
            NativeOrNotTag::Register => "REGISTER",
            NativeOrNotTag::RegionalVariant => "REGIONAL_VARIANT",
            NativeOrNotTag::TenseSense => "TENSE_SENSE",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            NativeOrNotTag::Collocation => "Collocation",
            NativeOrNotTag::Spoken => "Spoken style",
            NativeOrNotTag::LiteralTranslation => "Literal translation",
            NativeOrNotTag::Register => "Register",
            NativeOrNotTag::RegionalVariant => "Regional variant",
            NativeOrNotTag::TenseSense => "Tense sense",
        }
    }

    /// Parse a tag name case-insensitively. Unknown names map to `Register`.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(raw))
            .unwrap_or_default()
    }
}

/// Pick the natural sentence out of three, then say why the awkward one is
/// awkward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeOrNotQuestion {
    pub situation: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub awkward_option_index: usize,
    pub reason_choices: Vec<String>,
    pub reason_answer_index: usize,
    pub explanation: String,
    pub learning_point: String,
    #[serde(default)]
    pub tag: NativeOrNotTag,
    pub hint: String,
    #[serde(default)]
    pub difficulty: NativeOrNotDifficulty,
}

impl NativeOrNotQuestion {
    /// The option the reason phase asks about ("" if out of range).
    #[must_use]
    pub fn awkward_sentence(&self) -> &str {
        self.options
            .get(self.awkward_option_index)
            .map_or("", String::as_str)
    }

    /// Every text field trimmed.
    #[must_use]
    pub fn normalized(self) -> Self {
        let trim_all = |list: Vec<String>| -> Vec<String> {
            list.into_iter().map(|s| s.trim().to_string()).collect()
        };
        Self {
            situation: self.situation.trim().to_string(),
            options: trim_all(self.options),
            reason_choices: trim_all(self.reason_choices),
            explanation: self.explanation.trim().to_string(),
            learning_point: self.learning_point.trim().to_string(),
            hint: self.hint.trim().to_string(),
            ..self
        }
    }
}

fn exact_count(field: &'static str, count: usize, expected: usize) -> Result<(), ValidationError> {
    if count == expected {
        Ok(())
    } else {
        Err(ValidationError::CountOutOfRange {
            field,
            count,
            min: expected,
            max: expected,
        })
    }
}

fn in_range(field: &'static str, index: usize, len: usize) -> Result<(), ValidationError> {
    if index < len {
        Ok(())
    } else {
        Err(ValidationError::IndexOutOfRange { field, index, len })
    }
}

impl Exercise for NativeOrNotQuestion {
    fn signature(&self) -> String {
        let mut signature = self.situation.trim().to_lowercase();
        for option in &self.options {
            signature.push('|');
            signature.push_str(&option.trim().to_lowercase());
        }
        signature
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.situation.trim().is_empty() {
            return Err(ValidationError::EmptyField("situation"));
        }
        exact_count("options", self.options.len(), OPTION_COUNT)?;
        in_range("correct_index", self.correct_index, self.options.len())?;
        in_range("awkward_option_index", self.awkward_option_index, self.options.len())?;
        if self.correct_index == self.awkward_option_index {
            return Err(ValidationError::Conflict("correct_index and awkward_option_index"));
        }
        exact_count("reason_choices", self.reason_choices.len(), REASON_COUNT)?;
        in_range("reason_answer_index", self.reason_answer_index, self.reason_choices.len())?;
        for (field, text) in [
            ("explanation", &self.explanation),
            ("learning_point", &self.learning_point),
            ("hint", &self.hint),
        ] {
            if text.trim().is_empty() {
                return Err(ValidationError::EmptyField(field));
            }
        }
        Ok(())
    }

    fn hint(&self) -> Option<&str> {
        Some(self.hint.as_str()).filter(|hint| !hint.is_empty())
    }
}

/// Wrong regular picks per tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrongTagCounts {
    counts: FxHashMap<NativeOrNotTag, u32>,
}

impl WrongTagCounts {
    pub fn record(&mut self, tag: NativeOrNotTag) {
        *self.counts.entry(tag).or_insert(0) += 1;
    }

    #[must_use]
    pub fn get(&self, tag: NativeOrNotTag) -> u32 {
        self.counts.get(&tag).copied().unwrap_or(0)
    }

    /// Most-missed tag; ties go to the earliest in declaration order.
    #[must_use]
    pub fn weak_tag(&self) -> Option<NativeOrNotTag> {
        let mut best: Option<(NativeOrNotTag, u32)> = None;
        for tag in NativeOrNotTag::ALL {
            let count = self.get(tag);
            if count > 0 && best.map_or(true, |(_, top)| count > top) {
                best = Some((tag, count));
            }
        }
        best.map(|(tag, _)| tag)
    }
}

/// NativeOrNot part of a round result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeOrNotDetails {
    /// Correct regular picks.
    pub correct_answers: u32,
    pub highest_streak: u32,
    /// `None` when nothing was missed.
    pub weak_tag: Option<NativeOrNotTag>,
}

impl NativeOrNotDetails {
    /// `round(correct * 100 / total)`, 0 for an empty round.
    #[must_use]
    pub fn accuracy_percent(&self, total_questions: u32) -> u32 {
        if total_questions == 0 {
            return 0;
        }
        let percent = f64::from(self.correct_answers) * 100.0 / f64::from(total_questions);
        percent.round() as u32
    }
}

#[cfg(test)]
pub(crate) fn sample_question() -> NativeOrNotQuestion {
    NativeOrNotQuestion {
        situation: "Ordering at a cafe".to_string(),
        options: vec![
            "Can I get a latte?".to_string(),
            "Give me one latte drink.".to_string(),
            "I'd like a latte, please.".to_string(),
        ],
        correct_index: 0,
        awkward_option_index: 1,
        reason_choices: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        reason_answer_index: 2,
        explanation: "Natives ask.".to_string(),
        learning_point: "Can I get ...".to_string(),
        tag: NativeOrNotTag::Collocation,
        hint: "Think about how baristas hear it.".to_string(),
        difficulty: NativeOrNotDifficulty::Easy,
    }
}
