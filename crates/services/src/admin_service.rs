use std::sync::Arc;

use storage::repository::{TopicRepository, UserRepository, VocabularyRepository};
use wordify_core::model::{
    StatusAction, Topic, TopicDraft, TopicId, User, UserId, UserQuery, UserStats,
    VocabularyDraft, VocabularyId, VocabularyItem,
};

use crate::context::AppContext;
use crate::error::AdminError;

/// Topic, vocabulary and account management for administrators.
///
/// Every call checks the signed-in user first; the backend enforces the
/// same rule and answers 403 otherwise.
#[derive(Clone)]
pub struct AdminService {
    context: AppContext,
    topics: Arc<dyn TopicRepository>,
    vocabulary: Arc<dyn VocabularyRepository>,
    users: Arc<dyn UserRepository>,
}

impl AdminService {
    #[must_use]
    pub fn new(
        context: AppContext,
        topics: Arc<dyn TopicRepository>,
        vocabulary: Arc<dyn VocabularyRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            context,
            topics,
            vocabulary,
            users,
        }
    }

    fn authorize(&self) -> Result<User, AdminError> {
        Ok(self.context.require_admin()?)
    }

    // ─── TOPICS ────────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `AdminError::Auth` for non-admins or `AdminError::Storage`.
    pub async fn list_topics(&self) -> Result<Vec<Topic>, AdminError> {
        self.authorize()?;
        Ok(self.topics.list_topics().await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Validation` for an invalid draft before any
    /// request is made, or `AdminError::Storage` (e.g. duplicate name).
    pub async fn create_topic(&self, draft: TopicDraft) -> Result<Topic, AdminError> {
        self.authorize()?;
        let topic = draft.validate().map_err(wordify_core::Error::from)?;
        let created = self.topics.create_topic(&topic).await?;
        tracing::info!(topic = %created.id, name = %created.name, "topic created");
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Validation`, `AdminError::Auth` or `AdminError::Storage`.
    pub async fn update_topic(&self, id: &TopicId, draft: TopicDraft) -> Result<Topic, AdminError> {
        self.authorize()?;
        let topic = draft.validate().map_err(wordify_core::Error::from)?;
        Ok(self.topics.update_topic(id, &topic).await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Auth` or `AdminError::Storage`.
    pub async fn delete_topic(&self, id: &TopicId) -> Result<(), AdminError> {
        self.authorize()?;
        self.topics.delete_topic(id).await?;
        tracing::info!(topic = %id, "topic deleted");
        Ok(())
    }

    // ─── VOCABULARY ────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `AdminError::Auth` or `AdminError::Storage`.
    pub async fn list_vocabulary(&self, topic_id: &TopicId) -> Result<Vec<VocabularyItem>, AdminError> {
        self.authorize()?;
        Ok(self.vocabulary.list_by_topic(topic_id).await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Validation`, `AdminError::Auth` or `AdminError::Storage`.
    pub async fn create_vocabulary(
        &self,
        topic_id: &TopicId,
        draft: VocabularyDraft,
    ) -> Result<VocabularyItem, AdminError> {
        self.authorize()?;
        let draft = draft.validate().map_err(wordify_core::Error::from)?;
        Ok(self.vocabulary.create_vocabulary(topic_id, &draft).await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Validation`, `AdminError::Auth` or `AdminError::Storage`.
    pub async fn update_vocabulary(
        &self,
        id: &VocabularyId,
        draft: VocabularyDraft,
    ) -> Result<VocabularyItem, AdminError> {
        self.authorize()?;
        let draft = draft.validate().map_err(wordify_core::Error::from)?;
        Ok(self.vocabulary.update_vocabulary(id, &draft).await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Auth` or `AdminError::Storage`.
    pub async fn delete_vocabulary(&self, id: &VocabularyId) -> Result<(), AdminError> {
        self.authorize()?;
        Ok(self.vocabulary.delete_vocabulary(id).await?)
    }

    // ─── USERS ─────────────────────────────────────────────────────────────────

    /// Fetch every account and filter locally.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Auth` or `AdminError::Storage`.
    pub async fn list_users(&self, query: &UserQuery) -> Result<Vec<User>, AdminError> {
        self.authorize()?;
        let users = self.users.list_users().await?;
        Ok(query.apply(&users).into_iter().cloned().collect())
    }

    /// # Errors
    ///
    /// Returns `AdminError::Auth` or `AdminError::Storage`.
    pub async fn user(&self, id: &UserId) -> Result<User, AdminError> {
        self.authorize()?;
        Ok(self.users.get_user(id).await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Auth` or `AdminError::Storage`.
    pub async fn set_user_status(&self, id: &UserId, action: StatusAction) -> Result<(), AdminError> {
        let admin = self.authorize()?;
        self.users.set_user_status(id, action).await?;
        tracing::info!(admin = %admin.id, user = %id, action = action.as_str(), "user status changed");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AdminError::Auth` or `AdminError::Storage` (admins cannot be deleted).
    pub async fn delete_user(&self, id: &UserId) -> Result<(), AdminError> {
        let admin = self.authorize()?;
        self.users.delete_user(id).await?;
        tracing::info!(admin = %admin.id, user = %id, "user deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AdminError::Auth` or `AdminError::Storage`.
    pub async fn user_stats(&self) -> Result<UserStats, AdminError> {
        self.authorize()?;
        Ok(self.users.user_stats().await?)
    }
}
