//! Wire types for the supported vision providers.
//!
//! Only the fields gutlog actually sends and reads are modelled; both APIs
//! tolerate absent optional fields.

use serde::{Deserialize, Serialize};

// --- Gemini generateContent ---

/// Request to the Gemini API to generate content
#[derive(Serialize, Debug)]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// Content structure for Gemini requests and responses
#[derive(Serialize, Clone, Debug, Deserialize)]
pub(crate) struct Content {
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Part structure for a piece of Gemini content
#[derive(Serialize, Clone, Debug, Deserialize)]
pub(crate) struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }

    pub fn inline_data(mime_type: String, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData { mime_type, data }),
        }
    }
}

/// Base64-encoded media attached to a Gemini request
#[derive(Serialize, Clone, Debug, Deserialize)]
pub(crate) struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

/// Generation configuration options
#[derive(Serialize, Debug, Default)]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
}

/// Response from the Gemini API
#[derive(Deserialize, Debug)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Candidate in a Gemini response
#[derive(Deserialize, Debug)]
pub(crate) struct Candidate {
    pub content: Option<Content>,
}

// --- OpenAI chat completions ---

/// Request to the OpenAI chat completions API
#[derive(Serialize, Debug)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// One chat message; content is either plain text or multimodal parts
#[derive(Serialize, Debug)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: ChatContent,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
pub(crate) enum ChatContent {
    Text(String),
    Parts(Vec<ChatContentPart>),
}

#[derive(Serialize, Debug)]
pub(crate) struct ChatContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<ImageUrl>,
}

impl ChatContentPart {
    pub fn text(text: String) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text),
            image_url: None,
        }
    }

    pub fn image_url(url: String) -> Self {
        Self {
            kind: "image_url".to_string(),
            text: None,
            image_url: Some(ImageUrl { url }),
        }
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct ImageUrl {
    pub url: String,
}

/// Response from the OpenAI chat completions API
#[derive(Deserialize, Debug)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ChatResponseMessage {
    pub content: Option<String>,
}
