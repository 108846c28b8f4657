use async_trait::async_trait;
use reqwest::Method;
use wordify_core::model::{Topic, TopicId, ValidTopic};

use super::RestRepository;
use super::wire::{ListBody, TopicBody, TopicDto};
use crate::repository::{StorageError, TopicRepository};

fn body(topic: &ValidTopic) -> TopicBody<'_> {
    TopicBody {
        name: topic.name(),
        description: topic.description(),
        color: topic.color(),
    }
}

#[async_trait]
impl TopicRepository for RestRepository {
    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError> {
        let list: ListBody<TopicDto> = self.get_json(self.endpoint("topics/")?).await?;
        Ok(list.into_vec().into_iter().map(Topic::from).collect())
    }

    async fn get_topic(&self, id: &TopicId) -> Result<Topic, StorageError> {
        let dto: TopicDto = self.get_json(self.endpoint(&format!("topics/{id}/"))?).await?;
        Ok(dto.into())
    }

    async fn create_topic(&self, topic: &ValidTopic) -> Result<Topic, StorageError> {
        let dto: TopicDto = self
            .send_json(Method::POST, self.endpoint("topics/")?, &body(topic))
            .await?;
        Ok(dto.into())
    }

    async fn update_topic(&self, id: &TopicId, topic: &ValidTopic) -> Result<Topic, StorageError> {
        let dto: TopicDto = self
            .send_json(Method::PATCH, self.endpoint(&format!("topics/{id}/"))?, &body(topic))
            .await?;
        Ok(dto.into())
    }

    async fn delete_topic(&self, id: &TopicId) -> Result<(), StorageError> {
        self.send_unit::<()>(Method::DELETE, self.endpoint(&format!("topics/{id}/"))?, None)
            .await
    }
}
