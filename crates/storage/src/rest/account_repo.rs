use async_trait::async_trait;
use reqwest::Method;
use wordify_core::model::{PasswordChange, ProfileUpdate, Registration, User, UserId};

use super::RestRepository;
use super::wire::{AuthResponse, LoginBody, UserDto};
use crate::repository::{AccountRepository, AuthSession, StorageError};

impl RestRepository {
    fn remember(&self, response: AuthResponse) -> AuthSession {
        self.set_token(Some(response.token.clone()));
        AuthSession {
            token: response.token,
            refresh: response.refresh,
            user: response.user.into(),
        }
    }
}

#[async_trait]
impl AccountRepository for RestRepository {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, StorageError> {
        let response: AuthResponse = self
            .send_json(
                Method::POST,
                self.endpoint("auth/login/")?,
                &LoginBody {
                    email: email.trim(),
                    password,
                },
            )
            .await?;
        Ok(self.remember(response))
    }

    async fn register(&self, registration: &Registration) -> Result<AuthSession, StorageError> {
        let response: AuthResponse = self
            .send_json(Method::POST, self.endpoint("auth/register/")?, registration)
            .await?;
        Ok(self.remember(response))
    }

    async fn resume(&self, token: &str) -> Result<User, StorageError> {
        self.set_token(Some(token.trim().to_owned()));
        match self.get_json::<UserDto>(self.endpoint("auth/profile/")?).await {
            Ok(dto) => Ok(dto.into()),
            Err(err) => {
                self.set_token(None);
                Err(err)
            }
        }
    }

    async fn logout(&self) {
        self.set_token(None);
    }

    async fn profile(&self, _user: &UserId) -> Result<User, StorageError> {
        let dto: UserDto = self.get_json(self.endpoint("auth/profile/")?).await?;
        Ok(dto.into())
    }

    async fn update_profile(&self, _user: &UserId, update: &ProfileUpdate) -> Result<User, StorageError> {
        let dto: UserDto = self
            .send_json(Method::PATCH, self.endpoint("auth/profile/")?, update)
            .await?;
        Ok(dto.into())
    }

    async fn change_password(&self, _user: &UserId, change: &PasswordChange) -> Result<(), StorageError> {
        self.send_unit(Method::POST, self.endpoint("auth/change-password/")?, Some(change))
            .await
    }
}
