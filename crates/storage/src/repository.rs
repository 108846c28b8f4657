use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use wordify_core::model::{
    PasswordChange, ProfileUpdate, ProgressRecord, QuizQuestion, QuizSessionId, QuizSessionRecord,
    Registration, StatusAction, Topic, TopicId, User, UserId, UserStats, ValidTopic,
    VocabularyDraft, VocabularyId, VocabularyItem,
};

use crate::memory::InMemoryRepository;

/// Errors surfaced by storage adapters.
///
/// Every variant carries enough text for a human-readable message; see
/// [`StorageError::user_message`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl StorageError {
    /// Message suitable for showing to the person who triggered the action.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            StorageError::Transport(_) => {
                "Could not reach the server. Check your connection and try again.".to_owned()
            }
            StorageError::Timeout => "The server took too long to respond. Please try again.".to_owned(),
            StorageError::Decode(_) => "The server sent an unexpected response.".to_owned(),
            StorageError::Validation(message)
            | StorageError::Unauthorized(message)
            | StorageError::Forbidden(message)
            | StorageError::NotFound(message)
            | StorageError::Server { message, .. } => message.clone(),
        }
    }

    /// Whether re-triggering the same action might succeed.
    ///
    /// Callers never retry on their own; this only informs the message shown.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StorageError::Transport(_) | StorageError::Timeout | StorageError::Server { .. }
        )
    }
}

/// Token pair and profile returned by login and registration.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub refresh: Option<String>,
    pub user: User,
}

/// Answered quiz sent to the backend for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSubmission {
    pub topic_id: TopicId,
    pub questions: Vec<QuizQuestion>,
    pub time_spent_secs: u32,
}

//
// ─── LEARNER RESOURCES ─────────────────────────────────────────────────────────
//

#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// List every topic with its vocabulary count.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the topics cannot be fetched.
    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_topic(&self, id: &TopicId) -> Result<Topic, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::Validation` for a duplicate name.
    async fn create_topic(&self, topic: &ValidTopic) -> Result<Topic, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` or `StorageError::Validation`.
    async fn update_topic(&self, id: &TopicId, topic: &ValidTopic) -> Result<Topic, StorageError>;

    /// Delete a topic and, with it, its vocabulary.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn delete_topic(&self, id: &TopicId) -> Result<(), StorageError>;
}

#[async_trait]
pub trait VocabularyRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the vocabulary cannot be fetched.
    async fn list_by_topic(&self, topic_id: &TopicId) -> Result<Vec<VocabularyItem>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::Validation` when the word already exists in the topic.
    async fn create_vocabulary(
        &self,
        topic_id: &TopicId,
        draft: &VocabularyDraft,
    ) -> Result<VocabularyItem, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` or `StorageError::Validation`.
    async fn update_vocabulary(
        &self,
        id: &VocabularyId,
        draft: &VocabularyDraft,
    ) -> Result<VocabularyItem, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn delete_vocabulary(&self, id: &VocabularyId) -> Result<(), StorageError>;
}

/// Per-learner progress. The REST backend identifies the learner from the
/// bearer token; `user` selects the learner for local backends.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if progress cannot be fetched.
    async fn progress_for_topic(
        &self,
        user: &UserId,
        topic_id: &TopicId,
    ) -> Result<Vec<ProgressRecord>, StorageError>;

    /// Record one answer and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for unknown vocabulary.
    async fn update_progress(
        &self,
        user: &UserId,
        vocabulary_id: &VocabularyId,
        is_correct: bool,
    ) -> Result<ProgressRecord, StorageError>;
}

#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Ask the backend for up to `question_count` multiple-choice questions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown topic and
    /// `StorageError::Validation` when the topic has no vocabulary.
    async fn generate_quiz(
        &self,
        topic_id: &TopicId,
        question_count: u32,
    ) -> Result<Vec<QuizQuestion>, StorageError>;

    /// Persist an answered quiz. The backend also updates per-item progress.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn submit_quiz(
        &self,
        user: &UserId,
        submission: &QuizSubmission,
    ) -> Result<QuizSessionRecord, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be fetched.
    async fn quiz_history(&self, user: &UserId) -> Result<Vec<QuizSessionRecord>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the session does not belong to `user`.
    async fn quiz_session(
        &self,
        user: &UserId,
        id: &QuizSessionId,
    ) -> Result<QuizSessionRecord, StorageError>;
}

//
// ─── ACCOUNTS ──────────────────────────────────────────────────────────────────
//

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Authenticate and remember the returned token for later requests.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Validation` for bad credentials or an inactive account.
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::Validation` when the email is taken.
    async fn register(&self, registration: &Registration) -> Result<AuthSession, StorageError>;

    /// Continue a session from a token issued by an earlier login.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unauthorized` when the token is unknown or expired.
    async fn resume(&self, token: &str) -> Result<User, StorageError>;

    /// Forget the remembered token.
    async fn logout(&self);

    /// # Errors
    ///
    /// Returns `StorageError::Unauthorized` without a valid session.
    async fn profile(&self, user: &UserId) -> Result<User, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::Unauthorized` without a valid session.
    async fn update_profile(&self, user: &UserId, update: &ProfileUpdate) -> Result<User, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::Validation` when the current password is wrong.
    async fn change_password(&self, user: &UserId, change: &PasswordChange) -> Result<(), StorageError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::Forbidden` for non-admin callers.
    async fn list_users(&self) -> Result<Vec<User>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn get_user(&self, id: &UserId) -> Result<User, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn set_user_status(&self, id: &UserId, action: StatusAction) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::Validation` when deleting an admin account.
    async fn delete_user(&self, id: &UserId) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::Forbidden` for non-admin callers.
    async fn user_stats(&self) -> Result<UserStats, StorageError>;
}

/// Aggregates every repository behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub topics: Arc<dyn TopicRepository>,
    pub vocabulary: Arc<dyn VocabularyRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Wrap one repository that implements every resource trait.
    #[must_use]
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: TopicRepository
            + VocabularyRepository
            + ProgressRepository
            + QuizRepository
            + AccountRepository
            + UserRepository
            + Clone
            + 'static,
    {
        let topics: Arc<dyn TopicRepository> = Arc::new(repo.clone());
        let vocabulary: Arc<dyn VocabularyRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let accounts: Arc<dyn AccountRepository> = Arc::new(repo.clone());
        let users: Arc<dyn UserRepository> = Arc::new(repo);
        Self {
            topics,
            vocabulary,
            progress,
            quizzes,
            accounts,
            users,
        }
    }
}
