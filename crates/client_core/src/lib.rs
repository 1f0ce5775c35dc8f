//! HTTP client for the remote user collection.
//!
//! [`UserApi`] is the seam the UI controller talks to; [`UserApiClient`] is
//! the reqwest-backed implementation. Each operation issues exactly one
//! request and never retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{UserId, UserRecord},
    protocol::{MutationResponse, UserDraft, UserListResponse},
};
use tracing::{debug, warn};
use url::Url;

pub mod error;

pub use error::{ClientError, ClientResult};

#[async_trait]
pub trait UserApi: Send + Sync {
    async fn list(&self) -> ClientResult<UserListResponse>;
    async fn create(&self, draft: &UserDraft) -> ClientResult<UserRecord>;
    async fn update(&self, id: &UserId, draft: &UserDraft) -> ClientResult<UserRecord>;
    async fn delete(&self, id: &UserId) -> ClientResult<()>;
}

#[derive(Debug, Clone)]
pub struct UserApiClient {
    http: Client,
    base_url: Url,
}

impl UserApiClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url, None)
    }

    /// `timeout` bounds each whole request; `None` leaves requests unbounded.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        let base_url = parse_base_url(base_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn item_url(&self, id: &UserId) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot carry path segments".to_string(),
            })?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "sending user api request");
        self.http.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<reqwest::Response> {
        let response = request.send().await.map_err(|err| {
            warn!("user api transport failure: {err}");
            ClientError::from(err)
        })?;
        let status = response.status();
        if !status.is_success() {
            let err = ClientError::from_status(status);
            warn!(url = %response.url(), "user api returned failure: {err}");
            return Err(err);
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.send(request).await?;
        let body = response.text().await.map_err(|err| {
            warn!("failed to read user api response body: {err}");
            ClientError::from(err)
        })?;
        serde_json::from_str(&body).map_err(|err| {
            warn!("user api response was not the expected JSON: {err}");
            ClientError::from(err)
        })
    }
}

fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|err| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "URL cannot carry path segments".to_string(),
        });
    }
    Ok(url)
}

#[async_trait]
impl UserApi for UserApiClient {
    async fn list(&self) -> ClientResult<UserListResponse> {
        self.send_json(self.request(Method::GET, self.base_url.clone()))
            .await
    }

    async fn create(&self, draft: &UserDraft) -> ClientResult<UserRecord> {
        let request = self.request(Method::POST, self.base_url.clone()).json(draft);
        let response: MutationResponse = self.send_json(request).await?;
        Ok(response.into_record())
    }

    async fn update(&self, id: &UserId, draft: &UserDraft) -> ClientResult<UserRecord> {
        let request = self.request(Method::PUT, self.item_url(id)?).json(draft);
        let response: MutationResponse = self.send_json(request).await?;
        Ok(response.into_record())
    }

    /// The reply body is ignored; many deployments answer `204 No Content`.
    async fn delete(&self, id: &UserId) -> ClientResult<()> {
        self.send(self.request(Method::DELETE, self.item_url(id)?))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
