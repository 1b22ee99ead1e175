use crate::service::{parse_request_body, ProxyService};
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};
use trailfinder_core::errors::ErrorKind;
use trailfinder_core::types::{ProxyErrorResponse, ProxyTextResponse};

/// Health check endpoint path
pub const HEALTH_PATH: &str = "/health";

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    service: Arc<ProxyService>,
}

impl AppState {
    pub fn new(service: ProxyService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Error type for HTTP server
#[derive(Debug)]
pub struct ApiError(ErrorKind);

impl From<ErrorKind> for ApiError {
    fn from(kind: ErrorKind) -> Self {
        Self(kind)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, details) = match &self.0 {
            ErrorKind::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, None),
            ErrorKind::BadRequest(_) | ErrorKind::EmptySelection => (StatusCode::BAD_REQUEST, None),
            ErrorKind::ServerMisconfigured => (StatusCode::INTERNAL_SERVER_ERROR, None),
            ErrorKind::UpstreamFailure(category) | ErrorKind::MalformedResponse(category) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Some(category.clone()))
            }
        };

        let body = Json(ProxyErrorResponse {
            message: self.0.public_message().to_string(),
            details,
        });
        (status, body).into_response()
    }
}

/// Build the proxy router, serving the proxy at `endpoint_path`
pub fn router(state: AppState, endpoint_path: &str) -> Router {
    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(endpoint_path, any(handle_proxy))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn run_server(
    service: ProxyService,
    endpoint_path: &str,
    addr: SocketAddr,
) -> anyhow::Result<()> {
    info!("Starting proxy HTTP server on {}{}", addr, endpoint_path);

    let app = router(AppState::new(service), endpoint_path);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start HTTP server: {}", e))
}

/// Health check handler
async fn health() -> impl IntoResponse {
    "Trail finder proxy is running"
}

/// Handler for proxy requests.
///
/// Checks run in order: credential, method, body.
async fn handle_proxy(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<ProxyTextResponse>, ApiError> {
    if !state.service.is_configured() {
        warn!(%method, "Proxy request refused: API key is not configured");
        return Err(ErrorKind::ServerMisconfigured.into());
    }

    if method != Method::POST {
        debug!(%method, "Proxy request refused: method not allowed");
        return Err(ErrorKind::MethodNotAllowed.into());
    }

    let request = parse_request_body(&body).map_err(|e| {
        debug!(error = %e, "Proxy request refused: bad body");
        e
    })?;

    let text = state.service.handle(&request.prompt, &request.schema).await?;
    info!(text_len = text.len(), "Proxy request succeeded");
    Ok(Json(ProxyTextResponse { text }))
}
