use async_trait::async_trait;
use reqwest::Method;
use wordify_core::model::{TopicId, VocabularyDraft, VocabularyId, VocabularyItem};

use super::RestRepository;
use super::wire::{ListBody, VocabularyBody};
use crate::repository::{StorageError, VocabularyRepository};

#[async_trait]
impl VocabularyRepository for RestRepository {
    async fn list_by_topic(&self, topic_id: &TopicId) -> Result<Vec<VocabularyItem>, StorageError> {
        let list: ListBody<VocabularyItem> = self
            .get_json(self.endpoint(&format!("vocabulary/topic/{topic_id}/"))?)
            .await?;
        Ok(list.into_vec())
    }

    async fn create_vocabulary(
        &self,
        topic_id: &TopicId,
        draft: &VocabularyDraft,
    ) -> Result<VocabularyItem, StorageError> {
        self.send_json(
            Method::POST,
            self.endpoint("vocabulary/")?,
            &VocabularyBody::new(Some(topic_id), draft),
        )
        .await
    }

    async fn update_vocabulary(
        &self,
        id: &VocabularyId,
        draft: &VocabularyDraft,
    ) -> Result<VocabularyItem, StorageError> {
        self.send_json(
            Method::PATCH,
            self.endpoint(&format!("vocabulary/{id}/"))?,
            &VocabularyBody::new(None, draft),
        )
        .await
    }

    async fn delete_vocabulary(&self, id: &VocabularyId) -> Result<(), StorageError> {
        self.send_unit::<()>(Method::DELETE, self.endpoint(&format!("vocabulary/{id}/"))?, None)
            .await
    }
}
