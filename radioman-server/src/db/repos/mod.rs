//! Repository implementations for database access
//!
//! Each repository borrows the [`Store`](super::Store) and follows these patterns:
//! - Parameterized statements only
//! - Constraint failures come back from SQLite, never pre-checked
//! - Author names joined at read time

pub mod posts;
pub mod users;

pub use posts::{Post, PostRepo};
pub use users::{User, UserRepo};

use chrono::NaiveDateTime;
use serde::Serializer;

/// SQLite's `CURRENT_TIMESTAMP` text layout
pub const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serialize a timestamp the way SQLite stores it (`2026-10-16 09:52:34`).
pub(crate) fn serialize_timestamp<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&ts.format(SQLITE_TIMESTAMP_FORMAT))
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// UNIQUE / NOT NULL / CHECK / FOREIGN KEY failure reported by SQLite
    #[error("{0}")]
    ConstraintViolation(String),

    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
}

impl DbError {
    /// Message suitable for an API response: the database's own text when
    /// there is one, otherwise the driver error.
    pub fn message(&self) -> String {
        match self {
            Self::ConstraintViolation(msg) => msg.clone(),
            Self::Sqlx(e) => match e.as_database_error() {
                Some(db) => db.message().to_owned(),
                None => e.to_string(),
            },
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        let constraint = e
            .as_database_error()
            .filter(|db| !matches!(db.kind(), sqlx::error::ErrorKind::Other))
            .map(|db| db.message().to_owned());

        match constraint {
            Some(msg) => Self::ConstraintViolation(msg),
            None => Self::Sqlx(e),
        }
    }
}
