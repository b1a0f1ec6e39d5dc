//! User repository
//!
//! - create: plain INSERT, duplicate emails rejected by the UNIQUE constraint
//! - list: every row, store order

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use super::{serialize_timestamp, DbError};
use crate::db::store::{SqlValue, Store};

/// User record from database
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
}

/// User repository
pub struct UserRepo<'a> {
    store: &'a Store,
}

impl<'a> UserRepo<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// List all users in insertion order.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let rows = self
            .store
            .fetch_all("SELECT id, name, email, created_at FROM users", &[])
            .await?;

        rows.iter()
            .map(|row| User::from_row(row).map_err(DbError::from))
            .collect()
    }

    /// Insert a user and return its id.
    ///
    /// Values go to the store unchecked: missing fields bind as NULL and the
    /// NOT NULL constraints reject them.
    pub async fn create(
        &self,
        name: impl Into<SqlValue>,
        email: impl Into<SqlValue>,
    ) -> Result<i64, DbError> {
        let id = self
            .store
            .execute_write(
                "INSERT INTO users (name, email) VALUES (?, ?)",
                &[name.into(), email.into()],
            )
            .await?;

        tracing::debug!(id, "user created");
        Ok(id)
    }
}
