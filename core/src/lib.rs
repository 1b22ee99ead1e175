// Core trail finder functionality shared by the proxy and the site:
// - Schema contract for the trail suggestion
// - Pipeline error taxonomy
// - Gemini API client and wire types
// - Configuration loading

// Export client module - API client for Gemini
pub mod client;
pub use client::*;

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

// Export schema module - The single structured-output contract
pub mod schema;
pub use schema::*;
