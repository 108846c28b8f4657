use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::TopicId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("topic name cannot be empty")]
    EmptyName,

    #[error("topic name must be at most {max} characters")]
    NameTooLong { max: usize },

    #[error("enter a valid hex color code (e.g. #3B82F6)")]
    InvalidColor,
}

pub const TOPIC_NAME_MAX_CHARS: usize = 100;
pub const DEFAULT_TOPIC_COLOR: &str = "#3B82F6";

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// A named collection of vocabulary items sharing a theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: TopicId,
    pub name: String,
    pub description: String,
    pub color: String,
    pub vocabulary_count: u32,
    pub created_at: Option<DateTime<Utc>>,
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated topic input from an admin form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopicDraft {
    pub name: String,
    pub description: String,
    pub color: Option<String>,
}

/// Topic fields that passed local validation and can be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTopic {
    name: String,
    description: String,
    color: String,
}

impl TopicDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            color: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Validate the draft before it is sent to the backend.
    ///
    /// # Errors
    ///
    /// Returns `TopicError` when the name is blank or too long, or the color
    /// is not a `#RRGGBB` hex code.
    pub fn validate(self) -> Result<ValidTopic, TopicError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(TopicError::EmptyName);
        }
        if name.chars().count() > TOPIC_NAME_MAX_CHARS {
            return Err(TopicError::NameTooLong {
                max: TOPIC_NAME_MAX_CHARS,
            });
        }

        let color = self
            .color
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_TOPIC_COLOR.to_owned());
        if !is_hex_color(&color) {
            return Err(TopicError::InvalidColor);
        }

        Ok(ValidTopic {
            name,
            description: self.description.trim().to_owned(),
            color,
        })
    }
}

impl ValidTopic {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }
}

fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_defaults_color() {
        let valid = TopicDraft::new("  Travel ", "Words for trips")
            .validate()
            .unwrap();
        assert_eq!(valid.name(), "Travel");
        assert_eq!(valid.color(), DEFAULT_TOPIC_COLOR);
    }

    #[test]
    fn draft_rejects_blank_name() {
        let err = TopicDraft::new("   ", "").validate().unwrap_err();
        assert_eq!(err, TopicError::EmptyName);
    }

    #[test]
    fn draft_rejects_long_name() {
        let err = TopicDraft::new("x".repeat(101), "").validate().unwrap_err();
        assert!(matches!(err, TopicError::NameTooLong { max: 100 }));
    }

    #[test]
    fn draft_rejects_bad_colors() {
        for color in ["3B82F6", "#3B82F", "#GGGGGG", "#3B82F600"] {
            let err = TopicDraft::new("Food", "")
                .with_color(color)
                .validate()
                .unwrap_err();
            assert_eq!(err, TopicError::InvalidColor, "{color}");
        }
        assert!(TopicDraft::new("Food", "").with_color("#a1b2c3").validate().is_ok());
    }
}
