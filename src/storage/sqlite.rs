//! SQLite-backed blob store

use super::{Blob, BlobStore, migrations};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;

/// Blob store persisting each blob as a JSON row
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `db_path` and migrate it
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = connect(db_path).await?;
        migrations::migrate_up(&pool).await?;
        Ok(Self { pool })
    }

    /// Fresh in-memory database, for tests
    pub async fn open_memory() -> Result<Self> {
        let pool = connect_memory().await?;
        migrations::migrate_up(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Keys of every stored blob
    pub async fn keys(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT key FROM blobs ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list blobs")?;

        Ok(rows.into_iter().map(|(key,)| key).collect())
    }
}

#[async_trait]
impl BlobStore for SqliteStore {
    async fn load_blob(&self, key: &str) -> Result<Option<Blob>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM blobs WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to load blob '{}'", key))?;

        let Some((raw,)) = row else {
            return Ok(None);
        };

        match serde_json::from_str::<Value>(&raw)
            .with_context(|| format!("Blob '{}' is not valid JSON", key))?
        {
            Value::Object(blob) => Ok(Some(blob)),
            other => anyhow::bail!("Blob '{}' is not a JSON object: {}", key, other),
        }
    }

    async fn save_blob(&self, key: &str, blob: &Blob) -> Result<()> {
        let raw = serde_json::to_string(blob)
            .with_context(|| format!("Failed to serialize blob '{}'", key))?;

        sqlx::query(
            "INSERT INTO blobs (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(&raw)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save blob '{}'", key))?;

        log::debug!("Saved blob '{}' ({} entries)", key, blob.len());
        Ok(())
    }
}

/// Connect to SQLite database with proper configuration
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    let database_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = SqlitePool::connect(&database_url)
        .await
        .with_context(|| format!("Failed to connect to database: {}", db_path.display()))?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await
        .context("Failed to enable WAL mode")?;

    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await
        .context("Failed to set synchronous mode")?;

    log::debug!("Connected to SQLite database: {}", db_path.display());
    Ok(pool)
}

/// Connect to in-memory database for testing
///
/// Limited to one connection, every new connection would see its own
/// empty database.
pub async fn connect_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .context("Failed to connect to in-memory database")?;

    log::debug!("Connected to in-memory SQLite database");
    Ok(pool)
}
