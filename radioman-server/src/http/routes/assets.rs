//! Static front page and assets

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// `/` serves `index.html`; any other unmatched path is looked up under
/// `public_dir` and 404s when absent.
pub fn router<S>(public_dir: &Path) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route_service("/", ServeFile::new(public_dir.join("index.html")))
        .fallback_service(ServeDir::new(public_dir))
}
