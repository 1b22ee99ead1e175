//! Server side of the trail finder: a proxy that holds the Gemini API key and
//! forwards structured-output requests from the site.

pub mod http_server;
pub mod service;

pub use http_server::{router, run_server, AppState};
pub use service::{parse_request_body, ProxyRequest, ProxyService};
