//! Post repository
//!
//! - create: INSERT with nullable content and author reference
//! - list: LEFT JOIN on users for the author name, newest first

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use super::{serialize_timestamp, DbError};
use crate::db::store::{SqlValue, Store};

/// Post record with its author's name resolved at read time
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub user_id: Option<i64>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
    /// `None` when `user_id` is null or points at no user
    pub author_name: Option<String>,
}

/// Post repository
pub struct PostRepo<'a> {
    store: &'a Store,
}

impl<'a> PostRepo<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// List posts with author names, newest first.
    ///
    /// `created_at` has one-second resolution; the id breaks ties so a later
    /// insert always sorts first.
    pub async fn list(&self) -> Result<Vec<Post>, DbError> {
        let rows = self
            .store
            .fetch_all(
                r#"
                SELECT
                    p.id,
                    p.title,
                    p.content,
                    p.user_id,
                    p.created_at,
                    u.name AS author_name
                FROM posts p
                LEFT JOIN users u ON p.user_id = u.id
                ORDER BY p.created_at DESC, p.id DESC
                "#,
                &[],
            )
            .await?;

        rows.iter()
            .map(|row| Post::from_row(row).map_err(DbError::from))
            .collect()
    }

    /// Insert a post and return its id. The author is not checked.
    pub async fn create(
        &self,
        title: impl Into<SqlValue>,
        content: impl Into<SqlValue>,
        user_id: impl Into<SqlValue>,
    ) -> Result<i64, DbError> {
        let user_id = user_id.into();
        let id = self
            .store
            .execute_write(
                "INSERT INTO posts (title, content, user_id) VALUES (?, ?, ?)",
                &[title.into(), content.into(), user_id.clone()],
            )
            .await?;

        tracing::debug!(id, ?user_id, "post created");
        Ok(id)
    }
}
