//! User endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::Value;

use crate::db::{SqlValue, User, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::server::AppState;

/// Echo of the created user, with the values as they were submitted
#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub id: i64,
    pub name: Value,
    pub email: Value,
}

/// GET /api/users
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    let users = UserRepo::new(&state.store).list().await?;
    Ok(Json(users))
}

/// POST /api/users - `{name, email}`, both required by the store
async fn create_user(
    State(state): State<Arc<AppState>>,
    body: JsonBody,
) -> Result<Json<CreatedUser>, ApiError> {
    let name = body.field("name");
    let email = body.field("email");

    let id = UserRepo::new(&state.store)
        .create(SqlValue::from(&name), SqlValue::from(&email))
        .await?;

    Ok(Json(CreatedUser { id, name, email }))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users", get(list_users).post(create_user))
}
