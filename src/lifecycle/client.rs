//! HTTP client for the host's lifecycle API.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::types::{ActionOutcome, ResourceList, RestartAll};
use super::{LifecycleApi, LifecycleError};
use crate::config::LifecycleConfig;

#[derive(Debug, Clone)]
pub struct LifecycleClient {
    http: Client,
    base_url: String,
    token: String,
}

impl LifecycleClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, LifecycleError> {
        let http = Client::builder().build().map_err(LifecycleError::Request)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Client for the configured API, `None` when lifecycle sync is disabled.
    pub fn from_config(config: &LifecycleConfig) -> Result<Option<Self>, LifecycleError> {
        if !config.enable {
            return Ok(None);
        }
        let url = config.url.as_deref().unwrap_or_default();
        let token = config.resolve_token().unwrap_or_default();
        Self::new(url, token).map(Some)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, LifecycleError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(LifecycleError::classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LifecycleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(LifecycleError::Request)
    }

    async fn action(&self, path: &str, name: &str) -> Result<ActionOutcome, LifecycleError> {
        let request = self.http.post(self.url(path)).query(&[("resource", name)]);
        self.send(request).await
    }
}

impl LifecycleApi for LifecycleClient {
    async fn list(&self) -> Result<Vec<String>, LifecycleError> {
        let list: ResourceList = self.send(self.http.get(self.url("resources"))).await?;
        Ok(list.resources)
    }

    async fn restart(&self, name: &str) -> Result<ActionOutcome, LifecycleError> {
        self.action("restart", name).await
    }

    async fn start(&self, name: &str) -> Result<ActionOutcome, LifecycleError> {
        self.action("start", name).await
    }

    async fn restart_all(&self) -> Result<RestartAll, LifecycleError> {
        self.send(self.http.post(self.url("restart"))).await
    }
}
