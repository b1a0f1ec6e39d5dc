//! SQLite store handle
//!
//! Wraps a sqlx `SqlitePool` opened on a single database file. The schema is
//! applied with `CREATE TABLE IF NOT EXISTS` on every open, so booting twice
//! against the same file is harmless.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use sqlx::query::Query;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use serde_json::Value;
use sqlx::Sqlite;
use tracing::{debug, info};

use super::repos::DbError;

/// Default maximum connections for the pool.
/// SQLite serializes writers anyway, so this stays small.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT UNIQUE NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )
"#;

const CREATE_POSTS: &str = r#"
    CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT,
        user_id INTEGER,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users (id)
    )
"#;

/// A positional bind parameter for [`Store::execute_write`] and [`Store::fetch_all`].
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Real(f64),
    Text(String),
    Null,
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Binds a request field by its JSON type and leaves coercion to SQLite's
/// column affinity: `"1"` lands in an INTEGER column as 1, `123` in a TEXT
/// column as `"123"`. Booleans bind as 0/1; arrays and objects as JSON text.
impl From<&Value> for SqlValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Int(i64::from(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map(Self::Real).unwrap_or(Self::Null),
            },
            Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Shared database handle. Cloning is cheap; all clones share one pool.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
    path: PathBuf,
}

impl Store {
    /// Open or create the database file and ensure the schema exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        Self::open_with_options(path, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Open with a custom pool size.
    pub async fn open_with_options(
        path: impl AsRef<Path>,
        max_connections: u32,
    ) -> Result<Self, DbError> {
        let path = path.as_ref().to_path_buf();

        // Posts may reference users that do not exist; SQLite must not
        // enforce the declared foreign key.
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .foreign_keys(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool, path };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Build a store whose connections are opened on first use.
    ///
    /// Used when [`Store::open`] fails at startup: the server still listens and
    /// each query reports the connection failure instead.
    pub fn open_lazy(path: impl AsRef<Path>, max_connections: u32) -> Self {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .foreign_keys(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy_with(options);

        Self { pool, path }
    }

    /// Open a private in-memory database (for testing).
    ///
    /// Every pooled connection to `:memory:` is its own database, so the pool
    /// is pinned to one connection that is never recycled.
    pub async fn open_in_memory() -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self {
            pool,
            path: PathBuf::from(":memory:"),
        };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Database file path (`:memory:` for in-memory stores)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create both tables if they are missing.
    pub async fn ensure_schema(&self) -> Result<(), DbError> {
        sqlx::query(CREATE_USERS).execute(&self.pool).await?;
        sqlx::query(CREATE_POSTS).execute(&self.pool).await?;

        info!(path = %self.path.display(), "database schema ready");
        Ok(())
    }

    /// Run a write statement and return the rowid of the last inserted row.
    pub async fn execute_write(&self, sql: &str, binds: &[SqlValue]) -> Result<i64, DbError> {
        debug!(sql, binds = binds.len(), "execute write");
        let result = bind_all(sqlx::query(sql), binds)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Run a read statement and return every row, in the order the store yields them.
    pub async fn fetch_all(&self, sql: &str, binds: &[SqlValue]) -> Result<Vec<SqliteRow>, DbError> {
        debug!(sql, binds = binds.len(), "fetch all");
        let rows = bind_all(sqlx::query(sql), binds)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Cheap liveness probe.
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Close every pooled connection, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    binds: &[SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in binds {
        query = match value {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Real(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Null => query.bind(Option::<String>::None),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;
    use tempfile::TempDir;

    #[tokio::test]
    async fn open_creates_file_and_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.sqlite");

        let store = Store::open(&path).await.unwrap();
        assert!(path.exists());

        let rows = store
            .fetch_all(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'posts') ORDER BY name",
                &[],
            )
            .await
            .unwrap();
        let names: Vec<String> = rows.iter().map(|r| r.get("name")).collect();
        assert_eq!(names, vec!["posts", "users"]);

        store.close().await;
        assert!(store.is_closed());
    }

    #[tokio::test]
    async fn reopening_keeps_existing_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.sqlite");

        let store = Store::open(&path).await.unwrap();
        store
            .execute_write(
                "INSERT INTO users (name, email) VALUES (?, ?)",
                &[SqlValue::from("Ada"), SqlValue::from("ada@example.com")],
            )
            .await
            .unwrap();
        store.close().await;

        let store = Store::open(&path).await.unwrap();
        let rows = store.fetch_all("SELECT * FROM users", &[]).await.unwrap();
        assert_eq!(rows.len(), 1);
        store.close().await;
    }

    #[tokio::test]
    async fn execute_write_returns_last_insert_id() {
        let store = Store::open_in_memory().await.unwrap();

        let first = store
            .execute_write("INSERT INTO posts (title) VALUES (?)", &[SqlValue::from("one")])
            .await
            .unwrap();
        let second = store
            .execute_write("INSERT INTO posts (title) VALUES (?)", &[SqlValue::from("two")])
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[tokio::test]
    async fn null_binds_are_stored_as_null() {
        let store = Store::open_in_memory().await.unwrap();
        store
            .execute_write(
                "INSERT INTO posts (title, content, user_id) VALUES (?, ?, ?)",
                &[SqlValue::from("t"), SqlValue::Null, SqlValue::from(None::<i64>)],
            )
            .await
            .unwrap();

        let rows = store
            .fetch_all("SELECT content, user_id FROM posts", &[])
            .await
            .unwrap();
        let content: Option<String> = rows[0].get("content");
        let user_id: Option<i64> = rows[0].get("user_id");
        assert!(content.is_none());
        assert!(user_id.is_none());
    }

    #[tokio::test]
    async fn json_binds_follow_column_affinity() {
        let store = Store::open_in_memory().await.unwrap();
        store
            .execute_write(
                "INSERT INTO posts (title, content, user_id) VALUES (?, ?, ?)",
                &[
                    SqlValue::from(&serde_json::json!(123)),
                    SqlValue::from(&serde_json::json!(1.5)),
                    SqlValue::from(&serde_json::json!("7")),
                ],
            )
            .await
            .unwrap();

        let rows = store
            .fetch_all("SELECT title, content, user_id FROM posts", &[])
            .await
            .unwrap();
        let title: String = rows[0].get("title");
        let content: String = rows[0].get("content");
        let user_id: i64 = rows[0].get("user_id");
        assert_eq!(title, "123");
        assert_eq!(content, "1.5");
        assert_eq!(user_id, 7);
    }

    #[test]
    fn json_values_map_to_binds() {
        use serde_json::json;

        assert_eq!(SqlValue::from(&json!(null)), SqlValue::Null);
        assert_eq!(SqlValue::from(&json!(true)), SqlValue::Int(1));
        assert_eq!(SqlValue::from(&json!(42)), SqlValue::Int(42));
        assert_eq!(SqlValue::from(&json!(0.25)), SqlValue::Real(0.25));
        assert_eq!(SqlValue::from(&json!("x")), SqlValue::Text("x".into()));
        assert_eq!(SqlValue::from(&json!([1, 2])), SqlValue::Text("[1,2]".into()));
    }

    #[tokio::test]
    async fn lazy_store_reports_unreachable_file_per_query() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("database.sqlite");

        let store = Store::open_lazy(&path, 1);
        assert_eq!(store.path(), path.as_path());
        assert!(!store.ping().await);
        assert!(store.fetch_all("SELECT 1", &[]).await.is_err());
        store.close().await;
    }

    #[tokio::test]
    async fn ping_reports_closed_pool() {
        let store = Store::open_in_memory().await.unwrap();
        assert!(store.ping().await);
        store.close().await;
        assert!(!store.ping().await);
    }
}
