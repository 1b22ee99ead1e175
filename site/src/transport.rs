use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use trailfinder_core::errors::{ErrorKind, MISCONFIGURED_MESSAGE};
use trailfinder_core::schema::TrailSuggestionRequest;
use trailfinder_core::types::{ProxyErrorResponse, ProxyTextResponse};

/// The single outbound call a submission makes.
#[async_trait]
pub trait ProxyTransport: Send + Sync {
    /// Posts `request` to the proxy and returns the model text from a `200`.
    async fn request_suggestion(&self, request: &TrailSuggestionRequest) -> Result<String, ErrorKind>;
}

#[async_trait]
impl<T: ProxyTransport + ?Sized> ProxyTransport for Arc<T> {
    async fn request_suggestion(&self, request: &TrailSuggestionRequest) -> Result<String, ErrorKind> {
        (**self).request_suggestion(request).await
    }
}

/// Maps a non-success proxy reply back to the error that caused it.
pub fn error_for_status(status: u16, message: &str) -> ErrorKind {
    match status {
        400 => ErrorKind::BadRequest(message.to_string()),
        405 => ErrorKind::MethodNotAllowed,
        500 if message == MISCONFIGURED_MESSAGE => ErrorKind::ServerMisconfigured,
        _ => ErrorKind::UpstreamFailure(format!("proxy returned {}: {}", status, message)),
    }
}

/// Talks to the proxy over HTTP
#[derive(Debug, Clone)]
pub struct HttpProxyTransport {
    client: Client,
    url: String,
}

impl HttpProxyTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ErrorKind> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ErrorKind::UpstreamFailure(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ProxyTransport for HttpProxyTransport {
    async fn request_suggestion(&self, request: &TrailSuggestionRequest) -> Result<String, ErrorKind> {
        debug!("Posting trail suggestion request to {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| ErrorKind::UpstreamFailure(format!("failed to reach proxy: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ErrorKind::UpstreamFailure(format!("failed to read proxy response: {}", e)))?;

        if status.is_success() {
            let reply: ProxyTextResponse = serde_json::from_str(&body).map_err(|e| {
                ErrorKind::MalformedResponse(format!("proxy reply is not {{text}}: {}", e))
            })?;
            return Ok(reply.text);
        }

        let message = serde_json::from_str::<ProxyErrorResponse>(&body)
            .map(|reply| reply.message)
            .unwrap_or(body);
        Err(error_for_status(status.as_u16(), &message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailfinder_core::errors::{BAD_REQUEST_MESSAGE, UPSTREAM_FAILURE_MESSAGE};

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            error_for_status(400, BAD_REQUEST_MESSAGE),
            ErrorKind::BadRequest(BAD_REQUEST_MESSAGE.to_string())
        );
        assert_eq!(error_for_status(405, "Method Not Allowed"), ErrorKind::MethodNotAllowed);
        assert_eq!(
            error_for_status(500, MISCONFIGURED_MESSAGE),
            ErrorKind::ServerMisconfigured
        );
        assert!(matches!(
            error_for_status(500, UPSTREAM_FAILURE_MESSAGE),
            ErrorKind::UpstreamFailure(_)
        ));
        assert!(matches!(
            error_for_status(502, "<html>Bad Gateway</html>"),
            ErrorKind::UpstreamFailure(_)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_proxy_is_upstream_failure() {
        // Port 9 (discard) on localhost is closed in test environments
        let transport =
            HttpProxyTransport::new("http://127.0.0.1:9/proxy", Duration::from_secs(2)).unwrap();
        let request = TrailSuggestionRequest::new("prompt".to_string());

        let err = transport.request_suggestion(&request).await.unwrap_err();
        assert!(matches!(err, ErrorKind::UpstreamFailure(_)));
    }
}
