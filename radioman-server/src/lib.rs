//! radioman-server: HTTP API for users and posts
//!
//! A small axum service over a single SQLite file:
//! - `db`: store handle and repositories
//! - `http`: router, handlers, error mapping, server lifecycle

pub mod db;
pub mod http;

pub use db::{DbError, Store};
pub use http::{build_router, run_server, ApiError, ServerConfig, ServerError};
