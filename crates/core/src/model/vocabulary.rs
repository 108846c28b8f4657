use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{TopicId, VocabularyId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VocabularyError {
    #[error("word cannot be empty")]
    EmptyWord,

    #[error("word must be at most {max} characters")]
    WordTooLong { max: usize },

    #[error("meaning cannot be empty")]
    EmptyMeaning,

    #[error("pronunciation must be at most {max} characters")]
    PronunciationTooLong { max: usize },

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

pub const WORD_MAX_CHARS: usize = 100;
pub const PRONUNCIATION_MAX_CHARS: usize = 200;

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(VocabularyError::UnknownDifficulty(s.to_owned())),
        }
    }
}

//
// ─── VOCABULARY ITEM ───────────────────────────────────────────────────────────
//

/// A single word with its meaning, as loaded for a learning or quiz session.
///
/// Immutable for the lifetime of the session that loaded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: VocabularyId,
    #[serde(default, alias = "topic", skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
    pub word: String,
    #[serde(default)]
    pub pronunciation: String,
    pub meaning: String,
    #[serde(default)]
    pub example: String,
    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated vocabulary input from an admin form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VocabularyDraft {
    pub word: String,
    pub pronunciation: String,
    pub meaning: String,
    pub example: String,
    pub difficulty: Difficulty,
}

impl VocabularyDraft {
    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `VocabularyError` for blank or oversized fields.
    pub fn validate(self) -> Result<Self, VocabularyError> {
        let word = self.word.trim().to_owned();
        if word.is_empty() {
            return Err(VocabularyError::EmptyWord);
        }
        if word.chars().count() > WORD_MAX_CHARS {
            return Err(VocabularyError::WordTooLong {
                max: WORD_MAX_CHARS,
            });
        }
        let meaning = self.meaning.trim().to_owned();
        if meaning.is_empty() {
            return Err(VocabularyError::EmptyMeaning);
        }
        let pronunciation = self.pronunciation.trim().to_owned();
        if pronunciation.chars().count() > PRONUNCIATION_MAX_CHARS {
            return Err(VocabularyError::PronunciationTooLong {
                max: PRONUNCIATION_MAX_CHARS,
            });
        }

        Ok(Self {
            word,
            pronunciation,
            meaning,
            example: self.example.trim().to_owned(),
            difficulty: self.difficulty,
        })
    }
}
