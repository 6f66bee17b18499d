//! # gutlog ai
//!
//! Vision-model collaborator boundary for gutlog.
//!
//! The analysis orchestrator only needs one capability from an AI provider:
//! "describe this image as free text, following these instructions". The
//! [`VisionModel`] trait captures that seam so the orchestrator can be tested
//! with a substitute collaborator, and so the two supported providers (Gemini
//! `generateContent` and OpenAI chat completions) stay interchangeable.
//!
//! No retries, no backoff: a failed call surfaces as an [`AiError`] and the
//! caller decides what to do with it.

mod error;
mod gemini;
mod openai;
mod types;

pub use error::{AiError, AiResult};
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

use async_trait::async_trait;

/// MIME type assumed for uploaded images.
///
/// Uploads are accepted as opaque base64 with no format sniffing, so every
/// image is labelled JPEG when forwarded to a provider.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Prompt material for a single vision call.
///
/// `instructions` carries the format template the reply must follow;
/// `request` is the short per-call ask. Providers that distinguish system
/// and user roles send them separately, providers that take one text blob
/// join them.
#[derive(Debug, Clone)]
pub struct ModelPrompt {
    pub instructions: String,
    pub request: String,
}

impl ModelPrompt {
    pub fn new(instructions: impl Into<String>, request: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            request: request.into(),
        }
    }

    /// Instructions and request joined into one text blob, for providers
    /// without a separate system role.
    pub fn combined_text(&self) -> String {
        if self.request.trim().is_empty() {
            self.instructions.clone()
        } else {
            format!("{}\n\n{}", self.instructions, self.request)
        }
    }
}

/// A multimodal model that can be asked to describe an image as free text.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Sends `prompt` plus the raw `image` bytes to the model and returns
    /// the model's text reply.
    ///
    /// # Errors
    ///
    /// Returns an [`AiError`] if the request fails, the provider answers
    /// with a non-success status, or the reply carries no text content.
    async fn describe_image(&self, prompt: &ModelPrompt, image: &[u8]) -> AiResult<String>;
}
