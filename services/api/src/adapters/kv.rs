//! services/api/src/adapters/kv.rs
//!
//! This module contains the storage adapter, the concrete implementation of the
//! `KeyValueStore` port from the `core` crate. Settings and high scores are kept
//! as opaque JSON blobs in a single SQLite table through `sqlx`.

use async_trait::async_trait;
use quiz_core::ports::{KeyValueStore, PortError, PortResult};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A storage adapter that implements the `KeyValueStore` port.
#[derive(Clone)]
pub struct SqliteKvAdapter {
    pool: SqlitePool,
}

impl SqliteKvAdapter {
    /// Creates a new `SqliteKvAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `database_url`. In-memory databases are pinned to a
    /// single connection so every query sees the same data.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = options.connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct KvRecord {
    value: String,
}

//=========================================================================================
// `KeyValueStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl KeyValueStore for SqliteKvAdapter {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        let record = sqlx::query_as::<_, KvRecord>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Storage(e.to_string()))?;
        Ok(record.map(|r| r.value))
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO kv_store (key, value) VALUES (?, ?) \
             ON CONFLICT (key) DO UPDATE SET value = excluded.value, \
             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::domain::{QuizConfig, SourceKind};
    use quiz_core::SettingsStore;
    use std::sync::Arc;

    async fn adapter() -> SqliteKvAdapter {
        let adapter = SqliteKvAdapter::connect("sqlite::memory:").await.unwrap();
        adapter.run_migrations().await.unwrap();
        adapter
    }

    #[tokio::test]
    async fn set_get_and_overwrite() {
        let kv = adapter().await;
        assert_eq!(kv.get("missing").await.unwrap(), None);

        kv.set("k", "one").await.unwrap();
        assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("one"));

        kv.set("k", "two").await.unwrap();
        assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("two"));

        kv.remove("k").await.unwrap();
        kv.remove("k").await.unwrap();
        assert_eq!(kv.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn settings_round_trip_through_sqlite() {
        let settings = SettingsStore::new(Arc::new(adapter().await));
        let config = QuizConfig {
            source: SourceKind::Local,
            question_count: 6,
            ..QuizConfig::default()
        };
        settings.save(&config).await.unwrap();
        assert_eq!(settings.load().await, config);
    }
}
