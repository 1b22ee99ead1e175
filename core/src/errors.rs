use thiserror::Error;

/// Message returned with `400` when the proxy body lacks `prompt` or `schema`
pub const BAD_REQUEST_MESSAGE: &str =
    "Bad Request: 'prompt' and 'schema' are required in the request body.";

/// Message returned with `405` for anything but POST
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed";

/// Message returned with `500` when the proxy has no API key
pub const MISCONFIGURED_MESSAGE: &str =
    "Server configuration error: The API key is not configured.";

/// Message returned with `500` when the model call fails
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to generate content from the AI service.";

/// Every way a trail suggestion submission can fail.
///
/// Only `EmptySelection` is ever described to the end user. The detail carried
/// by `UpstreamFailure` and `MalformedResponse` is for logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("No difficulty or vibe selected")]
    EmptySelection,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Server configuration error: the API key is not configured")]
    ServerMisconfigured,

    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ErrorKind {
    /// The `message` field the proxy sends for this error.
    pub fn public_message(&self) -> &'static str {
        match self {
            ErrorKind::EmptySelection | ErrorKind::BadRequest(_) => BAD_REQUEST_MESSAGE,
            ErrorKind::MethodNotAllowed => METHOD_NOT_ALLOWED_MESSAGE,
            ErrorKind::ServerMisconfigured => MISCONFIGURED_MESSAGE,
            ErrorKind::UpstreamFailure(_) | ErrorKind::MalformedResponse(_) => {
                UPSTREAM_FAILURE_MESSAGE
            }
        }
    }
}

/// Gemini API errors
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("API Error: {0}")]
    ApiError(String),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
}

impl GeminiError {
    /// Short category for this error, safe to hand to a client.
    pub fn category(&self) -> &'static str {
        match self {
            GeminiError::ApiError(_) | GeminiError::HttpError { .. } => "upstream_api_error",
            GeminiError::ConfigError(_) => "configuration_error",
            GeminiError::RequestError(_) | GeminiError::ReqwestError(_) => "upstream_unreachable",
            GeminiError::ResponseError(_)
            | GeminiError::ParsingError(_)
            | GeminiError::SerdeError(_) => "upstream_malformed_response",
        }
    }
}

/// Keeps only the category of an upstream error; the full text stays in logs.
impl From<GeminiError> for ErrorKind {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::ConfigError(_) => ErrorKind::ServerMisconfigured,
            other => ErrorKind::UpstreamFailure(other.category().to_string()),
        }
    }
}

/// Result type for Gemini operations
pub type GeminiResult<T> = Result<T, GeminiError>;
