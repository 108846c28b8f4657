use async_trait::async_trait;
use reqwest::Method;
use wordify_core::model::{StatusAction, User, UserId, UserStats};

use super::RestRepository;
use super::wire::{ListBody, StatusBody, UserDto};
use crate::repository::{StorageError, UserRepository};

#[async_trait]
impl UserRepository for RestRepository {
    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let list: ListBody<UserDto> = self.get_json(self.endpoint("users/")?).await?;
        Ok(list.into_vec().into_iter().map(User::from).collect())
    }

    async fn get_user(&self, id: &UserId) -> Result<User, StorageError> {
        let dto: UserDto = self.get_json(self.endpoint(&format!("users/{id}/"))?).await?;
        Ok(dto.into())
    }

    async fn set_user_status(&self, id: &UserId, action: StatusAction) -> Result<(), StorageError> {
        self.send_unit(
            Method::PATCH,
            self.endpoint(&format!("users/{id}/status/"))?,
            Some(&StatusBody { action }),
        )
        .await
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), StorageError> {
        self.send_unit::<()>(Method::DELETE, self.endpoint(&format!("users/{id}/delete/"))?, None)
            .await
    }

    async fn user_stats(&self) -> Result<UserStats, StorageError> {
        self.get_json(self.endpoint("users/stats/")?).await
    }
}
