//! Image generation providers.
//!
//! A provider turns a text prompt into encoded image bytes plus the
//! content type reported by the remote service. The watermark pipeline never
//! talks to a provider directly; callers fetch bytes here and hand them to
//! [`crate::watermark::apply`].

pub mod nanobanana;

pub use nanobanana::NanoBananaProvider;

use crate::watermark::{self, Format, WatermarkError};
use async_trait::async_trait;

/// Errors returned by image generation providers.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("api request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("api returned error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Per-request generation options. Unset fields use the provider's
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub aspect_ratio: Option<String>,
    pub negative_prompt: Option<String>,
    pub model: Option<String>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(ratio.into());
        self
    }

    pub fn with_negative_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(prompt.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Raw output of a generation call.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub data: Vec<u8>,
    /// `Content-Type` header of the response; empty if the server sent none.
    pub content_type: String,
}

impl std::fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("bytes", &self.data.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl GeneratedImage {
    /// Container format of the image. The content type is trusted when it
    /// names PNG or JPEG; otherwise the bytes are sniffed.
    pub fn format(&self) -> Result<Format, WatermarkError> {
        Format::from_content_type(&self.content_type)
            .or_else(|_| watermark::sniff_format(&self.data))
    }
}

/// A text-to-image backend.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Stable identifier of the provider.
    fn name(&self) -> &str;

    /// Generate an image for `prompt`.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GeneratedImage, GeneratorError>;
}
