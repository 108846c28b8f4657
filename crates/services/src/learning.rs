use std::sync::Arc;

use storage::repository::{ProgressRepository, VocabularyRepository};
use wordify_core::Clock;
use wordify_core::model::{LearningSession, Topic, User};

use crate::error::LearningFlowError;

/// Outcome of flipping one flashcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardOutcome {
    pub word: String,
    pub correct: bool,
    /// Whether the backend accepted the progress update.
    pub progress_saved: bool,
    pub is_complete: bool,
}

/// Drives a flashcard pass and reports each answer as progress.
#[derive(Clone)]
pub struct LearningLoopService {
    clock: Clock,
    vocabulary: Arc<dyn VocabularyRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl LearningLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        vocabulary: Arc<dyn VocabularyRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            vocabulary,
            progress,
        }
    }

    /// Load a topic's vocabulary and start a pass over it.
    ///
    /// # Errors
    ///
    /// Returns `LearningFlowError::Storage` if the vocabulary cannot be
    /// fetched and `LearningFlowError::Learning` for an empty topic.
    pub async fn start(&self, topic: &Topic) -> Result<LearningSession, LearningFlowError> {
        let items = self.vocabulary.list_by_topic(&topic.id).await?;
        Ok(LearningSession::new(items, self.clock.now())?)
    }

    /// Record whether the learner knew the current card.
    ///
    /// The progress update is best-effort: a failure is logged and the pass
    /// continues.
    ///
    /// # Errors
    ///
    /// Returns `LearningFlowError::Learning` once the pass is complete.
    pub async fn record_answer(
        &self,
        user: &User,
        session: &mut LearningSession,
        correct: bool,
    ) -> Result<CardOutcome, LearningFlowError> {
        let item = session.record(correct, self.clock.now())?.clone();
        let progress_saved = match self
            .progress
            .update_progress(&user.id, &item.id, correct)
            .await
        {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(vocabulary = %item.id, error = %err, "failed to update progress");
                false
            }
        };
        Ok(CardOutcome {
            word: item.word,
            correct,
            progress_saved,
            is_complete: session.is_complete(),
        })
    }

    /// Start the same cards again.
    pub fn restart(&self, session: &mut LearningSession) {
        session.restart(self.clock.now());
    }
}
