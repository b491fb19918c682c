use super::{BackendService, GENERATE_IMAGE_PATH, GENERATE_TEXT_PATH};
use crate::models::{
    ApiErrorBody, Config, ImageGenerationRequest, ImageGenerationResponse,
    TextGenerationRequest, TextGenerationResponse,
};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub const API_KEY_HEADER: &str = "X-API-KEY";

/// HTTP client for the generation backend.
pub struct BackendClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new_with_client(base_url, api_key, client))
    }

    pub fn new_with_client(base_url: String, api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: crate::models::normalize_base_url(&base_url),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.backend_url.clone(),
            config.api_key.clone(),
            config.request_timeout,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to backend: {}", e);
                e
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Backend error (status {}): {}", status, body);
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .unwrap_or_default()
                .detail
                .filter(|detail| !detail.is_empty());
            return Err(Error::Api {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse backend response: {}\nBody: {}", e, body);
            Error::Serialization(e)
        })
    }
}

#[async_trait]
impl BackendService for BackendClient {
    async fn generate_text(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<TextGenerationResponse> {
        self.post(GENERATE_TEXT_PATH, request).await
    }

    async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse> {
        self.post(GENERATE_IMAGE_PATH, request).await
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Image download failed (status {}): {}", status, url);
            return Err(Error::Api {
                status: status.as_u16(),
                detail: None,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
