use crate::credential::ApiKeyStore;
use crate::models::{
    GenerateContentRequest, GenerateContentResponse, MediaDownload, VideoOperation, VideoRequest,
};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

/// Message the service uses when a key cannot reach the requested model
pub const ENTITY_NOT_FOUND: &str = "Requested entity was not found";

/// Error type for client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("JSON error: {0}")]
    Json(String),
    #[error("Server returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("No API key selected")]
    MissingApiKey,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Only the service's own message counts; a plain 404 (e.g. a wrong model
    /// name) says nothing about the key.
    pub fn is_entity_not_found(&self) -> bool {
        match self {
            ClientError::Status { message, .. } => message.contains(ENTITY_NOT_FOUND),
            _ => false,
        }
    }

    /// True if the failure means the selected key is absent or was refused
    pub fn is_credential_rejection(&self) -> bool {
        match self {
            ClientError::MissingApiKey => true,
            ClientError::Status { status, message } => {
                self.is_entity_not_found()
                    || *status == 401
                    || *status == 403
                    || message.contains("API key not valid")
            }
            _ => false,
        }
    }
}

/// Transport seam for the generative capabilities
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// One request/response round trip against `model`
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClientError>;

    /// Start an image-to-video job
    async fn submit_video(
        &self,
        model: &str,
        request: &VideoRequest,
    ) -> Result<VideoOperation, ClientError>;

    /// Re-fetch the state of a video job
    async fn poll_video(&self, operation: &VideoOperation) -> Result<VideoOperation, ClientError>;

    /// Fetch a media locator. A non-success status is returned, not raised.
    async fn download_media(&self, locator: &str) -> Result<MediaDownload, ClientError>;
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            request_timeout_secs: 120,
            user_agent: "StyleSync/0.1.0".to_string(),
        }
    }
}

/// reqwest implementation of [`GenerativeBackend`]
pub struct GeminiService {
    config: GeminiConfig,
    keys: ApiKeyStore,
    client: reqwest::Client,
}

impl GeminiService {
    pub fn new(config: GeminiConfig, keys: ApiKeyStore) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .tcp_keepalive(Duration::from_secs(30))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::Network(format!("Client build failed: {}", e)))?;

        Ok(Self {
            config,
            keys,
            client,
        })
    }

    fn base(&self) -> &str {
        self.config.api_base.trim_end_matches('/')
    }

    fn model_endpoint(&self, model: &str, method: &str) -> String {
        let model = model.trim();
        if model.starts_with("models/") {
            format!("{}/{}:{}", self.base(), model, method)
        } else {
            format!("{}/models/{}:{}", self.base(), model, method)
        }
    }

    fn operation_endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base(), name.trim_start_matches('/'))
    }

    fn api_key(&self) -> Result<String, ClientError> {
        self.keys.get().ok_or(ClientError::MissingApiKey)
    }

    async fn error_from_response(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(body);
        ClientError::Status { status, message }
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request
            .header("x-goog-api-key", self.api_key()?)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Json(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl GenerativeBackend for GeminiService {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClientError> {
        let url = self.model_endpoint(model, "generateContent");
        log::debug!(
            "generateContent {} with {} parts",
            url,
            request.parts().len()
        );
        self.send_json(self.client.post(&url).json(request)).await
    }

    async fn submit_video(
        &self,
        model: &str,
        request: &VideoRequest,
    ) -> Result<VideoOperation, ClientError> {
        let url = self.model_endpoint(model, "predictLongRunning");
        log::debug!(
            "predictLongRunning {} ({}, {})",
            url,
            request.resolution,
            request.aspect_ratio
        );
        self.send_json(self.client.post(&url).json(&request.to_wire()))
            .await
    }

    async fn poll_video(&self, operation: &VideoOperation) -> Result<VideoOperation, ClientError> {
        let url = self.operation_endpoint(&operation.name);
        self.send_json(self.client.get(&url)).await
    }

    async fn download_media(&self, locator: &str) -> Result<MediaDownload, ClientError> {
        let url = append_api_key(locator, &self.api_key()?)?;
        log::debug!("Downloading media from {}", redact_locator(locator));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Download failed: {}", e)))?;

        let status = response.status().as_u16();
        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !response.status().is_success() {
            return Ok(MediaDownload {
                status,
                mime_type,
                bytes: Vec::new(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read media: {}", e)))?;

        Ok(MediaDownload {
            status,
            mime_type,
            bytes: bytes.to_vec(),
        })
    }
}

/// Append the access key as `key=` query parameter to a media locator
pub fn append_api_key(locator: &str, key: &str) -> Result<Url, ClientError> {
    let mut url =
        Url::parse(locator).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", locator, e)))?;
    url.query_pairs_mut().append_pair("key", key);
    Ok(url)
}

/// Locator without its query string, safe for logs
pub fn redact_locator(locator: &str) -> String {
    locator.split('?').next().unwrap_or(locator).to_string()
}
