//! Gemini `generateContent` vision client.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;

use crate::error::{AiError, AiResult};
use crate::types::{Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part};
use crate::{ModelPrompt, VisionModel, IMAGE_MIME_TYPE};

const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Client for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model_name: String,
}

impl GeminiClient {
    /// Create a new Gemini API client
    ///
    /// # Errors
    ///
    /// Returns [`AiError::ConfigError`] if the API key is empty.
    pub fn new(api_key: String, model_name: Option<String>) -> AiResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AiError::ConfigError(
                "API key is required to initialize the Gemini client".to_string(),
            ));
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            model_name: model_name.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    fn request_url(&self) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model_name, self.api_key
        )
    }

    fn extract_text(response: &GenerateContentResponse) -> AiResult<String> {
        let candidate: &Candidate = response.candidates.first().ok_or_else(|| {
            AiError::ResponseError("No candidates in response".to_string())
        })?;

        let content: &Content = candidate
            .content
            .as_ref()
            .ok_or_else(|| AiError::ResponseError("Candidate has no content".to_string()))?;

        let text = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(AiError::ResponseError(
                "No text parts in response".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn describe_image(&self, prompt: &ModelPrompt, image: &[u8]) -> AiResult<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::text(prompt.combined_text()),
                    Part::inline_data(
                        IMAGE_MIME_TYPE.to_string(),
                        general_purpose::STANDARD.encode(image),
                    ),
                ],
                role: Some("user".to_string()),
            }],
            generation_config: None,
        };

        let response = self
            .client
            .post(self.request_url())
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
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| AiError::ResponseError(format!("Failed to parse response: {}", e)))?;

        Self::extract_text(&response_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_rejects_empty_api_key() {
        assert!(matches!(
            GeminiClient::new("  ".to_string(), None),
            Err(AiError::ConfigError(_))
        ));
    }

    #[test]
    fn test_request_url_includes_model_and_key() {
        let client = GeminiClient::new("key123".to_string(), None).unwrap();
        let url = client.request_url();
        assert!(url.contains("gemini-1.5-flash:generateContent"));
        assert!(url.ends_with("key=key123"));
    }

    #[test]
    fn test_model_name_override() {
        let client =
            GeminiClient::new("key".to_string(), Some("gemini-2.0-flash".to_string())).unwrap();
        assert!(client.request_url().contains("gemini-2.0-flash"));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "a"}, {"text": "b"}]}}]
        }))
        .unwrap();
        assert_eq!(GeminiClient::extract_text(&response).unwrap(), "ab");
    }

    #[test]
    fn test_extract_text_without_candidates_errors() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            GeminiClient::extract_text(&response),
            Err(AiError::ResponseError(_))
        ));
    }
}
