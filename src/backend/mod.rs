//! Backend service integration for text and image generation
//!
//! Provides the interface to the generation backend's two JSON endpoints and
//! to the image assets it serves.

pub mod client;
pub mod mock;

pub use client::BackendClient;
pub use mock::MockBackendClient;

use crate::models::{
    ImageGenerationRequest, ImageGenerationResponse, TextGenerationRequest,
    TextGenerationResponse,
};
use crate::Result;
use async_trait::async_trait;

pub const GENERATE_TEXT_PATH: &str = "/api/ai/generate-text";
pub const GENERATE_IMAGE_PATH: &str = "/api/ai/generate-image";

#[async_trait]
pub trait BackendService: Send + Sync {
    async fn generate_text(&self, request: &TextGenerationRequest)
        -> Result<TextGenerationResponse>;
    async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse>;
    /// Downloads a generated image by absolute URL.
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>>;
}
