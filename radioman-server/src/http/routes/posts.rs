//! Post endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::Value;

use crate::db::{Post, PostRepo, SqlValue};
use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::server::AppState;

/// Echo of the created post, with the values as they were submitted
#[derive(Debug, Serialize)]
pub struct CreatedPost {
    pub id: i64,
    pub title: Value,
    pub content: Value,
    pub user_id: Value,
}

/// GET /api/posts - newest first, with author names
async fn list_posts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = PostRepo::new(&state.store).list().await?;
    Ok(Json(posts))
}

/// POST /api/posts - `{title, content, user_id}`; only title is required
async fn create_post(
    State(state): State<Arc<AppState>>,
    body: JsonBody,
) -> Result<Json<CreatedPost>, ApiError> {
    let title = body.field("title");
    let content = body.field("content");
    let user_id = body.field("user_id");

    let id = PostRepo::new(&state.store)
        .create(
            SqlValue::from(&title),
            SqlValue::from(&content),
            SqlValue::from(&user_id),
        )
        .await?;

    Ok(Json(CreatedPost {
        id,
        title,
        content,
        user_id,
    }))
}

/// Post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/posts", get(list_posts).post(create_post))
}
