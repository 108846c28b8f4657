use async_trait::async_trait;
use reqwest::Method;
use wordify_core::model::{ProgressRecord, TopicId, UserId, VocabularyId};

use super::RestRepository;
use super::wire::{ListBody, ProgressDto, ProgressUpdateBody, ProgressUpdateResponse};
use crate::repository::{ProgressRepository, StorageError};

// The backend scopes progress to the token's owner; `_user` is not sent.
#[async_trait]
impl ProgressRepository for RestRepository {
    async fn progress_for_topic(
        &self,
        _user: &UserId,
        topic_id: &TopicId,
    ) -> Result<Vec<ProgressRecord>, StorageError> {
        let mut url = self.endpoint("progress/")?;
        url.query_pairs_mut().append_pair("topic_id", topic_id.as_str());
        let list: ListBody<ProgressDto> = self.get_json(url).await?;
        Ok(list.into_vec().into_iter().map(ProgressRecord::from).collect())
    }

    async fn update_progress(
        &self,
        _user: &UserId,
        vocabulary_id: &VocabularyId,
        is_correct: bool,
    ) -> Result<ProgressRecord, StorageError> {
        let response: ProgressUpdateResponse = self
            .send_json(
                Method::POST,
                self.endpoint("progress/update/")?,
                &ProgressUpdateBody {
                    vocabulary_id,
                    is_correct,
                },
            )
            .await?;
        Ok(response.progress.into())
    }
}
