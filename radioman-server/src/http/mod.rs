//! HTTP server layer
//!
//! Axum server with:
//! - Permissive CORS
//! - Request tracing
//! - Static front page and assets
//! - Graceful shutdown that closes the store
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, open_store, run_server, AppState, ServerConfig, ServerError};
