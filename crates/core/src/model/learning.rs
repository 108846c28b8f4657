use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::progress::{percent, round_percent};
use crate::model::vocabulary::VocabularyItem;
use crate::time::elapsed_secs;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LearningError {
    #[error("topic has no vocabulary to learn")]
    NoVocabulary,

    #[error("learning pass is already complete")]
    AlreadyComplete,

    #[error("learning pass is not complete yet")]
    NotComplete,
}

/// Label shown at the end of a flashcard pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningTier {
    Excellent,
    GoodJob,
    KeepPracticing,
}

impl LearningTier {
    #[must_use]
    pub fn from_accuracy(accuracy: u32) -> Self {
        if accuracy >= 80 {
            Self::Excellent
        } else if accuracy >= 60 {
            Self::GoodJob
        } else {
            Self::KeepPracticing
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            LearningTier::Excellent => "Excellent!",
            LearningTier::GoodJob => "Good Job!",
            LearningTier::KeepPracticing => "Keep Practicing!",
        }
    }
}

/// Statistics for a finished flashcard pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearningSummary {
    pub total: u32,
    pub correct: u32,
    /// Rounded percentage.
    pub accuracy: u32,
    pub total_time_secs: u32,
    /// Floored seconds per card.
    pub average_time_secs: u32,
    pub tier: LearningTier,
}

/// One pass through a topic's flashcards.
///
/// The learner flips each card and reports whether they knew it. Recording
/// the answer for the last card completes the pass.
#[derive(Debug, Clone)]
pub struct LearningSession {
    items: Vec<VocabularyItem>,
    index: usize,
    correct: u32,
    answered: u32,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl LearningSession {
    /// # Errors
    ///
    /// Returns `LearningError::NoVocabulary` for an empty topic.
    pub fn new(items: Vec<VocabularyItem>, started_at: DateTime<Utc>) -> Result<Self, LearningError> {
        if items.is_empty() {
            return Err(LearningError::NoVocabulary);
        }
        Ok(Self {
            items,
            index: 0,
            correct: 0,
            answered: 0,
            started_at,
            finished_at: None,
        })
    }

    #[must_use]
    pub fn current(&self) -> Option<&VocabularyItem> {
        if self.is_complete() {
            return None;
        }
        self.items.get(self.index)
    }

    /// Zero-based position of the current card.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.finished_at.is_some()
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    /// Record whether the learner knew the current card and move on.
    ///
    /// Returns the item that was answered.
    ///
    /// # Errors
    ///
    /// Returns `LearningError::AlreadyComplete` once every card is answered.
    pub fn record(&mut self, correct: bool, at: DateTime<Utc>) -> Result<&VocabularyItem, LearningError> {
        if self.is_complete() {
            return Err(LearningError::AlreadyComplete);
        }
        let answered_index = self.index;
        self.answered = self.answered.saturating_add(1);
        if correct {
            self.correct = self.correct.saturating_add(1);
        }
        if self.index + 1 >= self.items.len() {
            self.finished_at = Some(at);
        } else {
            self.index += 1;
        }
        self.items
            .get(answered_index)
            .ok_or(LearningError::AlreadyComplete)
    }

    /// Start the same cards again from the first one.
    pub fn restart(&mut self, at: DateTime<Utc>) {
        self.index = 0;
        self.correct = 0;
        self.answered = 0;
        self.started_at = at;
        self.finished_at = None;
    }

    /// # Errors
    ///
    /// Returns `LearningError::NotComplete` while cards remain.
    pub fn summary(&self) -> Result<LearningSummary, LearningError> {
        let finished_at = self.finished_at.ok_or(LearningError::NotComplete)?;
        let total_time_secs = elapsed_secs(self.started_at, finished_at);
        let accuracy = round_percent(percent(self.correct, self.answered));
        Ok(LearningSummary {
            total: self.answered,
            correct: self.correct,
            accuracy,
            total_time_secs,
            average_time_secs: total_time_secs.checked_div(self.answered).unwrap_or(0),
            tier: LearningTier::from_accuracy(accuracy),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::VocabularyId;
    use crate::model::vocabulary::Difficulty;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn items(n: usize) -> Vec<VocabularyItem> {
        (0..n)
            .map(|i| VocabularyItem {
                id: VocabularyId::new(i.to_string()),
                topic_id: None,
                word: format!("word{i}"),
                pronunciation: String::new(),
                meaning: "m".into(),
                example: String::new(),
                image_url: None,
                difficulty: Difficulty::Easy,
            })
            .collect()
    }

    #[test]
    fn empty_topic_cannot_start() {
        assert_eq!(
            LearningSession::new(Vec::new(), fixed_now()).unwrap_err(),
            LearningError::NoVocabulary
        );
    }

    #[test]
    fn last_record_completes_pass() {
        let start = fixed_now();
        let mut session = LearningSession::new(items(3), start).unwrap();
        session.record(true, start).unwrap();
        session.record(false, start).unwrap();
        assert!(session.summary().is_err());
        let last = session.record(true, start + Duration::seconds(100)).unwrap();
        assert_eq!(last.word, "word2");

        assert!(session.is_complete());
        assert!(session.current().is_none());
        assert_eq!(
            session.record(true, start).unwrap_err(),
            LearningError::AlreadyComplete
        );

        let summary = session.summary().unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.accuracy, 67);
        assert_eq!(summary.average_time_secs, 33);
        assert_eq!(summary.tier, LearningTier::GoodJob);
    }

    #[test]
    fn restart_resets_counters() {
        let start = fixed_now();
        let mut session = LearningSession::new(items(1), start).unwrap();
        session.record(true, start).unwrap();
        session.restart(start);
        assert!(!session.is_complete());
        assert_eq!(session.correct(), 0);
        assert_eq!(session.current().map(|v| v.word.as_str()), Some("word0"));
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(LearningTier::from_accuracy(80), LearningTier::Excellent);
        assert_eq!(LearningTier::from_accuracy(79), LearningTier::GoodJob);
        assert_eq!(LearningTier::from_accuracy(59).message(), "Keep Practicing!");
    }
}
