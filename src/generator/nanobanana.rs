//! Nano Banana text-to-image provider.
//!
//! Sends a JSON request with a bearer token and returns the raw response
//! body as image bytes.

use super::{GenerateOptions, GeneratedImage, GeneratorError, ImageGenerator};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.nanobanana.im/v1/generate";
pub const DEFAULT_MODEL: &str = "nano-banana-pro-v1";
pub const DEFAULT_SIZE: u32 = 1024;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const PROVIDER_NAME: &str = "nano-banana-pro";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    negative_prompt: &'a str,
    width: u32,
    height: u32,
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<&'a str>,
}

/// HTTP client for the Nano Banana generation API.
#[derive(Clone)]
pub struct NanoBananaProvider {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for NanoBananaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NanoBananaProvider")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl NanoBananaProvider {
    /// Create a provider using the default endpoint and a 60 second timeout.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Client` if the HTTP client cannot be created
    /// (e.g., TLS configuration issues).
    pub fn new(api_key: impl Into<String>) -> Result<Self, GeneratorError> {
        Ok(Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: build_client(DEFAULT_TIMEOUT)?,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Replace the client with one using `timeout` for the whole request.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, GeneratorError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, GeneratorError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(GeneratorError::Client)
}

#[async_trait]
impl ImageGenerator for NanoBananaProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GeneratedImage, GeneratorError> {
        let request = GenerateRequest {
            prompt,
            negative_prompt: options.negative_prompt.as_deref().unwrap_or_default(),
            width: options.width.unwrap_or(DEFAULT_SIZE),
            height: options.height.unwrap_or(DEFAULT_SIZE),
            model: options.model.as_deref().unwrap_or(DEFAULT_MODEL),
            aspect_ratio: options.aspect_ratio.as_deref(),
        };

        tracing::debug!(
            provider = PROVIDER_NAME,
            endpoint = %self.endpoint,
            width = request.width,
            height = request.height,
            model = request.model,
            "Sending generation request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(USER_AGENT, concat!("genmark/", env!("CARGO_PKG_VERSION")))
            .json(&request)
            .send()
            .await
            .map_err(GeneratorError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let data = response.bytes().await.map_err(GeneratorError::Body)?.to_vec();

        tracing::info!(
            provider = PROVIDER_NAME,
            bytes = data.len(),
            content_type = %content_type,
            "Image generated"
        );

        Ok(GeneratedImage { data, content_type })
    }
}
