use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use super::RestRepository;
use super::error_body::{error_message, should_log, status_error};
use crate::repository::StorageError;

/// Map a client-side `reqwest` failure to the storage taxonomy.
pub(crate) fn transport_error(err: &reqwest::Error) -> StorageError {
    if err.is_timeout() {
        StorageError::Timeout
    } else if err.is_decode() {
        StorageError::Decode(err.to_string())
    } else {
        StorageError::Transport(err.to_string())
    }
}

/// Decode a success body. Empty and non-JSON bodies read as `{}`.
pub(crate) fn decode_body<T: DeserializeOwned>(
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<T, StorageError> {
    let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));
    let value = if is_json && !bytes.is_empty() {
        serde_json::from_slice::<Value>(bytes).map_err(|e| StorageError::Decode(e.to_string()))?
    } else {
        Value::Object(Map::new())
    };
    serde_json::from_value(value).map_err(|e| StorageError::Decode(e.to_string()))
}

impl RestRepository {
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, StorageError> {
        self.base_url
            .join(path)
            .map_err(|e| StorageError::Transport(format!("invalid endpoint {path}: {e}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder, path: &str) -> Result<Response, StorageError> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(path, error = %e, "request failed before a response arrived");
            transport_error(&e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if should_log(status, &body) {
            tracing::error!(status = status.as_u16(), path, body = %body, "API error response");
        }
        Err(status_error(status, error_message(status, &body)))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StorageError> {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await.map_err(|e| transport_error(&e))?;
        decode_body(content_type.as_deref(), &bytes)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, StorageError> {
        let path = url.path().to_owned();
        let response = self.execute(self.request(Method::GET, url), &path).await?;
        Self::decode(response).await
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, url: Url, body: &B) -> Result<T, StorageError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let path = url.path().to_owned();
        let response = self
            .execute(self.request(method, url).json(body), &path)
            .await?;
        Self::decode(response).await
    }

    /// Send a request whose success body is ignored.
    pub(crate) async fn send_unit<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<(), StorageError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let path = url.path().to_owned();
        let mut builder = self.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(builder, &path).await.map(|_| ())
    }
}
