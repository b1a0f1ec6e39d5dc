//! Route handlers organized by resource

use std::sync::Arc;

use axum::Router;

use super::server::AppState;

pub mod assets;
pub mod health;
pub mod posts;
pub mod users;

/// API routes: /api/*
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(users::router())
        .merge(posts::router())
}
