//! HTTP boundary to the hero API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CACHE_CONTROL, Client, RequestBuilder, Response};
use shared::{
    domain::HeroRecord,
    error::ApiErrorBody,
    protocol::{CreateHeroRequest, SUPERHEROES_PATH},
};
use tracing::{debug, info};

use crate::error::{HeroError, CREATE_FAILED_MESSAGE, LIST_FAILED_MESSAGE};

#[async_trait]
pub trait HeroCollectionClient: Send + Sync {
    async fn list_heroes(&self) -> Result<Vec<HeroRecord>, HeroError>;
    async fn create_hero(&self, request: &CreateHeroRequest) -> Result<(), HeroError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpClientOptions {
    /// Unset means requests may wait forever.
    pub request_timeout: Option<Duration>,
}

/// reqwest-backed client. Keeps a cookie jar so session cookies set by the
/// API ride along on later calls, and asks every hop not to cache.
#[derive(Debug, Clone)]
pub struct HttpHeroClient {
    http: Client,
    base_url: String,
}

impl HttpHeroClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, HeroError> {
        Self::with_options(base_url, HttpClientOptions::default())
    }

    pub fn with_options(
        base_url: impl Into<String>,
        options: HttpClientOptions,
    ) -> Result<Self, HeroError> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn superheroes_url(&self) -> String {
        format!("{}{SUPERHEROES_PATH}", self.base_url)
    }

    fn no_store(request: RequestBuilder) -> RequestBuilder {
        request.header(CACHE_CONTROL, "no-store")
    }

    async fn create_failure(response: Response) -> HeroError {
        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                debug!(status, %err, "failed to read create error body");
                return HeroError::remote(status, CREATE_FAILED_MESSAGE);
            }
        };
        let message = ApiErrorBody::parse(&body)
            .and_then(|parsed| parsed.message().map(str::to_string))
            .unwrap_or_else(|| CREATE_FAILED_MESSAGE.to_string());
        HeroError::remote(status, message)
    }
}

#[async_trait]
impl HeroCollectionClient for HttpHeroClient {
    async fn list_heroes(&self) -> Result<Vec<HeroRecord>, HeroError> {
        let response = Self::no_store(self.http.get(self.superheroes_url()))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(HeroError::remote(
                response.status().as_u16(),
                LIST_FAILED_MESSAGE,
            ));
        }
        let heroes: Vec<HeroRecord> = response.json().await?;
        info!(count = heroes.len(), "fetched hero list");
        Ok(heroes)
    }

    async fn create_hero(&self, request: &CreateHeroRequest) -> Result<(), HeroError> {
        let response = Self::no_store(self.http.post(self.superheroes_url()))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::create_failure(response).await);
        }
        info!(name = %request.name, "created hero");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
