// src/services/mod.rs
pub mod gemini;
pub mod generation;
pub mod history;
pub mod image_processor;
pub mod sessions;

pub use gemini::GeminiService;
pub use generation::{GenerationInput, prepare_generation};
pub use history::{HistoryBackend, HistoryService, MemoryHistoryBackend, RedisHistoryBackend};
pub use image_processor::ImageProcessor;
pub use sessions::SessionRegistry;

use crate::errors::PaintError;
use crate::models::GeneratedImage;
use crate::prompt::{ImagePrompt, ReferenceImageInput};
use async_trait::async_trait;

/// Remote multimodal model behind the analyze and generate endpoints.
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Turns an image into a candidate document. The result has passed the
    /// schema validator.
    async fn analyze(&self, image_base64: &str, mime_type: &str) -> Result<ImagePrompt, PaintError>;

    /// Renders an image from a text instruction plus optional visual references.
    async fn generate(
        &self,
        instruction: &str,
        references: &[ReferenceImageInput],
    ) -> Result<GeneratedImage, PaintError>;
}
