//! The proxy between the site and the Gemini API.
//!
//! The service holds the only copy of the API key. It is built once from
//! configuration; when no key is configured it is built in a misconfigured
//! state and refuses every request without touching the network.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use trailfinder_core::client::{GeminiClient, StructuredGenerator};
use trailfinder_core::config::GeminiConfig;
use trailfinder_core::errors::{ErrorKind, GeminiError};

/// A validated proxy request body
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyRequest {
    pub prompt: String,
    /// Output schema, forwarded to the model untouched
    pub schema: Value,
}

/// Raw body as posted by the site; both fields may be absent
#[derive(Deserialize)]
struct RawProxyRequest {
    prompt: Option<Value>,
    schema: Option<Value>,
}

/// Parses and validates a proxy request body.
///
/// `prompt` must be a non-empty string and `schema` must be present and
/// truthy. A body that is not JSON at all is treated the same as an empty one.
pub fn parse_request_body(body: &[u8]) -> Result<ProxyRequest, ErrorKind> {
    let raw: RawProxyRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RawProxyRequest {
            prompt: None,
            schema: None,
        }
    } else {
        serde_json::from_slice(body)
            .map_err(|e| ErrorKind::BadRequest(format!("body is not a JSON object: {}", e)))?
    };

    let prompt = match raw.prompt {
        Some(Value::String(prompt)) if !prompt.is_empty() => prompt,
        Some(Value::String(_)) | None | Some(Value::Null) => {
            return Err(ErrorKind::BadRequest("missing 'prompt'".to_string()))
        }
        Some(_) => return Err(ErrorKind::BadRequest("'prompt' must be a string".to_string())),
    };

    let schema = match raw.schema {
        Some(schema) if is_truthy(&schema) => schema,
        _ => return Err(ErrorKind::BadRequest("missing 'schema'".to_string())),
    };

    Ok(ProxyRequest { prompt, schema })
}

/// `null`, `false`, zero and `""` count as absent; arrays and objects never do.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Stateless mediator between the site and the external model
#[derive(Clone)]
pub struct ProxyService {
    generator: Option<Arc<dyn StructuredGenerator>>,
}

impl ProxyService {
    /// Builds the service from configuration, validating the API key once.
    pub fn from_config(config: &GeminiConfig) -> Self {
        match GeminiClient::new(config.clone()) {
            Ok(client) => {
                info!(model = %client.model_name(), "Initialized Gemini client");
                Self::with_generator(Arc::new(client))
            }
            Err(e) => {
                error!(error = %e, "API key missing; every proxy request will fail with a configuration error");
                Self::misconfigured()
            }
        }
    }

    /// Wraps an already configured generator.
    pub fn with_generator(generator: Arc<dyn StructuredGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// A service with no credential.
    pub fn misconfigured() -> Self {
        Self { generator: None }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Forwards one prompt/schema pair to the model and returns its text verbatim.
    ///
    /// Model and transport failures become `UpstreamFailure` carrying only
    /// the error category; the full error is logged here.
    pub async fn handle(&self, prompt: &str, schema: &Value) -> Result<String, ErrorKind> {
        let generator = self.generator.as_ref().ok_or_else(|| {
            warn!("Rejecting proxy request: API key is not configured");
            ErrorKind::ServerMisconfigured
        })?;

        match generator.generate_structured(prompt, schema).await {
            Ok(text) => {
                debug!(text_len = text.len(), "Model returned structured output");
                Ok(text)
            }
            Err(e) => {
                error!(error = %e, category = e.category(), "Error in Gemini proxy");
                Err(e.into())
            }
        }
    }
}
