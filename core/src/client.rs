use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::GeminiConfig;
use crate::errors::{GeminiError, GeminiResult};
use crate::types::*;

/// Default Gemini REST endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Anything that can turn a prompt and an output schema into structured text.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Makes exactly one generation call constrained by `schema` and returns
    /// the model's serialized output.
    async fn generate_structured(&self, prompt: &str, schema: &Value) -> GeminiResult<String>;
}

/// Client for interacting with the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    model: GeminiModel,
}

impl GeminiClient {
    /// Create a new Gemini API client
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|_| config.has_api_key())
            .ok_or_else(|| {
                GeminiError::ConfigError(
                    "API key is required to initialize the Gemini client".to_string(),
                )
            })?;

        let model = GeminiModel::new(api_key, config.model_name.clone());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs()))
            .build()
            .map_err(|e| GeminiError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            model,
        })
    }

    /// Name of the model requests are sent to
    pub fn model_name(&self) -> &str {
        &self.model.model_name
    }

    /// Get the generateContent URL for the configured model
    fn get_generate_url(&self) -> String {
        let base = self
            .config
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/');
        format!("{}/models/{}:generateContent", base, self.model.model_name)
    }

    /// Generate content using the Gemini API
    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = self.get_generate_url();

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.model.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                GeminiError::ResponseError(format!("Failed to read error response: {}", e))
            })?;

            return Err(error_from_body(status.as_u16(), &error_body));
        }

        let response_body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GeminiError::ParsingError(format!("Failed to parse response: {}", e)))?;

        Ok(response_body)
    }

    /// Builds a single-turn request whose output must be JSON matching `schema`.
    pub fn create_structured_request(&self, prompt: &str, schema: &Value) -> GenerateContentRequest {
        let user_content = Content {
            parts: vec![Part::text(prompt.to_string())],
            role: Some("user".to_string()),
        };

        GenerateContentRequest {
            contents: vec![user_content],
            generation_config: Some(GenerationConfig {
                temperature: self.config.temperature,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema.clone()),
            }),
        }
    }

    /// Helper method to extract text from a response
    pub fn extract_text_from_response(
        &self,
        response: &GenerateContentResponse,
    ) -> GeminiResult<String> {
        let candidate = response.candidates.first().ok_or_else(|| {
            GeminiError::ResponseError("No candidates in response".to_string())
        })?;

        let content = candidate
            .content
            .as_ref()
            .ok_or_else(|| GeminiError::ResponseError("No content in candidate".to_string()))?;

        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        if text.is_empty() {
            return Err(GeminiError::ResponseError("No text in content".to_string()));
        }

        Ok(text)
    }
}

/// Maps a failed generateContent reply to an error.
///
/// Gemini reports failures as `{"error": {"code", "message", "status"}}`; a body
/// in that shape becomes `ApiError`, anything else `HttpError`.
fn error_from_body(status_code: u16, body: &str) -> GeminiError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(reply) => GeminiError::ApiError(format!(
            "{} ({}): {}",
            reply.error.status.unwrap_or_default(),
            status_code,
            reply.error.message
        )),
        Err(_) => GeminiError::HttpError {
            status_code,
            message: format!("API request failed: {}", body),
        },
    }
}

#[async_trait]
impl StructuredGenerator for GeminiClient {
    async fn generate_structured(&self, prompt: &str, schema: &Value) -> GeminiResult<String> {
        let request = self.create_structured_request(prompt, schema);
        debug!(model = %self.model.model_name, prompt_len = prompt.len(), "Sending structured generation request");
        let response = self.generate_content(request).await?;
        self.extract_text_from_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_with_key() -> GeminiConfig {
        GeminiConfig {
            api_key: Some("test-key".to_string()),
            ..GeminiConfig::default()
        }
    }

    #[test]
    fn test_error_from_api_body() {
        let body = json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "status": "RESOURCE_EXHAUSTED"
            }
        })
        .to_string();
        match error_from_body(429, &body) {
            GeminiError::ApiError(message) => {
                assert!(message.contains("RESOURCE_EXHAUSTED"));
                assert!(message.contains("Resource has been exhausted"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = error_from_body(502, "<html>Bad Gateway</html>");
        assert!(matches!(err, GeminiError::HttpError { status_code: 502, .. }));
        assert_eq!(err.category(), "upstream_api_error");
    }

    #[test]
    fn test_new_requires_api_key() {
        let result = GeminiClient::new(GeminiConfig::default());
        assert!(matches!(result, Err(GeminiError::ConfigError(_))));

        let blank = GeminiConfig {
            api_key: Some("   ".to_string()),
            ..GeminiConfig::default()
        };
        assert!(matches!(GeminiClient::new(blank), Err(GeminiError::ConfigError(_))));
    }

    #[test]
    fn test_generate_url() {
        let client = GeminiClient::new(config_with_key()).unwrap();
        assert_eq!(
            client.get_generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(!client.get_generate_url().contains("test-key"));
    }

    #[test]
    fn test_structured_request_carries_schema() {
        let client = GeminiClient::new(config_with_key()).unwrap();
        let schema = json!({"type": "OBJECT", "properties": {}, "required": []});
        let request = client.create_structured_request("hello", &schema);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            body["generation_config"]["response_mime_type"],
            "application/json"
        );
        assert_eq!(body["generation_config"]["response_schema"], schema);
    }

    #[test]
    fn test_extract_text() {
        let client = GeminiClient::new(config_with_key()).unwrap();
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]}
            }]
        }))
        .unwrap();
        assert_eq!(client.extract_text_from_response(&response).unwrap(), "{\"a\":1}");

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            client.extract_text_from_response(&empty),
            Err(GeminiError::ResponseError(_))
        ));
    }
}
