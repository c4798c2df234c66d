//! reqwest client for the content API.

use crate::config::AdminConfig;
use crate::port::{ApiError, ContentApi, ImageUpload};
use async_trait::async_trait;
use protief_content::WireContent;
use reqwest::{multipart, Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct UploadBody {
    path: String,
}

pub struct HttpContentApi {
    base_url: String,
    health_timeout: Duration,
    http_client: Client,
}

impl HttpContentApi {
    pub fn new(config: &AdminConfig) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            base_url: config.api_base().to_string(),
            health_timeout: config.health_timeout(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Passes successful responses through; turns the rest into
    /// [`ApiError::Status`] carrying the server's `error` message.
    async fn check(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("HTTP error! status: {}", status.as_u16()),
        };
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(err.to_string())
    }
}

#[async_trait]
impl ContentApi for HttpContentApi {
    async fn is_available(&self) -> bool {
        let result = self
            .http_client
            .get(self.url("health"))
            .timeout(self.health_timeout)
            .send()
            .await;
        match result {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!("API health check failed: {e}");
                false
            }
        }
    }

    async fn fetch_content(&self) -> Result<Value, ApiError> {
        let resp = self
            .http_client
            .get(self.url("content"))
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn save_content(&self, content: &WireContent) -> Result<(), ApiError> {
        let resp = self
            .http_client
            .post(self.url("content"))
            .json(content)
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn upload_image(&self, upload: &ImageUpload) -> Result<String, ApiError> {
        let part = multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.original_name.clone())
            .mime_str(&upload.mime_type)
            .map_err(|e| ApiError::Transport(format!("failed to set image mime type: {e}")))?;
        let form = multipart::Form::new()
            .text("fileName", upload.file_name.clone())
            .part("image", part);

        let resp = self
            .http_client
            .post(self.url("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let body: UploadBody = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(body.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_base() {
        let config = AdminConfig {
            api_url: "http://localhost:3001/api/".into(),
            ..AdminConfig::default()
        };
        let api = HttpContentApi::new(&config).unwrap();
        assert_eq!(api.base_url(), "http://localhost:3001/api");
        assert_eq!(api.url("content"), "http://localhost:3001/api/content");
    }

    #[tokio::test]
    async fn test_unreachable_api_is_unavailable() {
        let config = AdminConfig {
            api_url: "http://127.0.0.1:9/api".into(),
            health_timeout_ms: 200,
            request_timeout_ms: 200,
            ..AdminConfig::default()
        };
        let api = HttpContentApi::new(&config).unwrap();
        assert!(!api.is_available().await);
        assert!(api.fetch_content().await.is_err());
    }
}
