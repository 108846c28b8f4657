use thiserror::Error;

use crate::model::{AccountError, LearningError, QuizError, TopicError, VocabularyError};

/// Any domain validation failure raised by this crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Topic(#[from] TopicError),
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Learning(#[from] LearningError),
    #[error(transparent)]
    Account(#[from] AccountError),
}
