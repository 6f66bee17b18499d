//! OpenAI chat-completions vision client.
//!
//! Images are attached as `data:` URIs inside a multimodal user message,
//! which is how the chat completions API accepts inline images.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;

use crate::error::{AiError, AiResult};
use crate::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatContent, ChatContentPart, ChatMessage,
};
use crate::{ModelPrompt, VisionModel, IMAGE_MIME_TYPE};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4-vision-preview";
const MAX_TOKENS: u32 = 1000;

/// Client for the OpenAI chat completions API
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model_name: String,
}

impl OpenAiClient {
    /// Create a new OpenAI API client
    ///
    /// # Errors
    ///
    /// Returns [`AiError::ConfigError`] if the API key is empty.
    pub fn new(api_key: String, model_name: Option<String>) -> AiResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AiError::ConfigError(
                "API key is required to initialize the OpenAI client".to_string(),
            ));
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            model_name: model_name.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    fn build_request(&self, prompt: &ModelPrompt, image: &[u8]) -> ChatCompletionRequest {
        let data_uri = format!(
            "data:{};base64,{}",
            IMAGE_MIME_TYPE,
            general_purpose::STANDARD.encode(image)
        );

        let mut user_parts = Vec::new();
        if !prompt.request.trim().is_empty() {
            user_parts.push(ChatContentPart::text(prompt.request.clone()));
        }
        user_parts.push(ChatContentPart::image_url(data_uri));

        ChatCompletionRequest {
            model: self.model_name.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: ChatContent::Text(prompt.instructions.clone()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: ChatContent::Parts(user_parts),
                },
            ],
            max_tokens: Some(MAX_TOKENS),
        }
    }
}

#[async_trait]
impl VisionModel for OpenAiClient {
    async fn describe_image(&self, prompt: &ModelPrompt, image: &[u8]) -> AiResult<String> {
        let request = self.build_request(prompt, image);

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                AiError::ResponseError(format!("Failed to read error response: {}", e))
            })?;

            return Err(AiError::HttpError {
                status_code: status.as_u16(),
                message: format!("API request failed: {}", error_body),
            });
        }

        let response_body = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| AiError::ResponseError(format!("Failed to parse response: {}", e)))?;

        let content = response_body
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(AiError::ResponseError(
                "No analysis received from the model".to_string(),
            ));
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_api_key() {
        assert!(matches!(
            OpenAiClient::new(String::new(), None),
            Err(AiError::ConfigError(_))
        ));
    }

    #[test]
    fn test_build_request_attaches_image_as_data_uri() {
        let client = OpenAiClient::new("key".to_string(), None).unwrap();
        let prompt = ModelPrompt::new("Follow the format.", "Analyze this sample.");

        let request = client.build_request(&prompt, &[0xff, 0xd8]);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-4-vision-preview");
        assert_eq!(value["max_tokens"], 1000);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], "Follow the format.");
        assert_eq!(value["messages"][1]["content"][0]["text"], "Analyze this sample.");
        let url = value["messages"][1]["content"][1]["image_url"]["url"]
            .as_str()
            .unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_build_request_with_empty_request_sends_image_only() {
        let client = OpenAiClient::new("key".to_string(), None).unwrap();
        let prompt = ModelPrompt::new("Instructions.", "");

        let request = client.build_request(&prompt, &[1, 2, 3]);
        let value = serde_json::to_value(&request).unwrap();

        let parts = value["messages"][1]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0]["type"], "image_url");
    }
}
