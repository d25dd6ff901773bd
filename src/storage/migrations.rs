//! Versioned schema migrations for the SQLite blob store

use anyhow::{Context, Result};
use log::{debug, info};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashSet};

/// A single forward migration
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    pub up_sql: String,
}

/// Migration status in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppliedMigration {
    pub version: i64,
    pub name: String,
    pub applied_at: chrono::NaiveDateTime,
    pub checksum: String,
}

/// All known migrations, keyed by version
pub fn load_migrations() -> BTreeMap<i64, Migration> {
    let mut migrations = BTreeMap::new();

    migrations.insert(1, Migration {
        version: 1,
        name: "blobs".to_string(),
        up_sql: r#"
            CREATE TABLE IF NOT EXISTS blobs (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
        "#
        .to_string(),
    });

    migrations
}

/// Calculate checksum for migration SQL (hex SHA-256)
pub fn calculate_checksum(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}

/// Initialize the migration tracking table
async fn init_migration_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            checksum TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create schema_migrations table")?;

    Ok(())
}

/// Get list of applied migrations
pub async fn get_applied_migrations(pool: &SqlitePool) -> Result<Vec<AppliedMigration>> {
    sqlx::query_as::<_, AppliedMigration>(
        "SELECT version, name, applied_at, checksum FROM schema_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await
    .context("Failed to get applied migrations")
}

/// Validate that applied migrations match available ones
async fn validate_migrations(pool: &SqlitePool, available: &BTreeMap<i64, Migration>) -> Result<()> {
    for applied in get_applied_migrations(pool).await? {
        let Some(migration) = available.get(&applied.version) else {
            anyhow::bail!(
                "Applied migration {} '{}' not found in available migrations",
                applied.version,
                applied.name
            );
        };

        let expected = calculate_checksum(&migration.up_sql);
        if applied.checksum != expected {
            anyhow::bail!(
                "Migration {} checksum mismatch! Applied: {}, Expected: {}",
                applied.version,
                applied.checksum,
                expected
            );
        }
    }

    Ok(())
}

/// Apply every pending migration in version order
pub async fn migrate_up(pool: &SqlitePool) -> Result<()> {
    debug!("Running database migrations");
    init_migration_table(pool).await?;

    let available = load_migrations();
    validate_migrations(pool, &available).await?;

    let applied: HashSet<i64> = get_applied_migrations(pool)
        .await?
        .into_iter()
        .map(|m| m.version)
        .collect();

    let pending: Vec<_> = available
        .values()
        .filter(|m| !applied.contains(&m.version))
        .collect();

    if pending.is_empty() {
        debug!("No pending migrations");
        return Ok(());
    }

    for migration in pending {
        let mut tx = pool.begin().await.context("Failed to start transaction")?;

        sqlx::query(&migration.up_sql)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to apply migration {} '{}'", migration.version, migration.name))?;

        sqlx::query("INSERT INTO schema_migrations (version, name, checksum) VALUES (?, ?, ?)")
            .bind(migration.version)
            .bind(&migration.name)
            .bind(calculate_checksum(&migration.up_sql))
            .execute(&mut *tx)
            .await
            .context("Failed to record migration")?;

        tx.commit().await.context("Failed to commit migration")?;
        info!("Applied migration {} '{}'", migration.version, migration.name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_migrations() {
        let migrations = load_migrations();
        assert!(migrations.contains_key(&1));
    }

    #[test]
    fn test_calculate_checksum() {
        let sql = "CREATE TABLE test (id INTEGER);";
        assert_eq!(calculate_checksum(sql), calculate_checksum(sql));
        assert_ne!(calculate_checksum(sql), calculate_checksum("CREATE TABLE test2 (id INTEGER);"));
    }

    #[test]
    fn test_checksum_is_stable() {
        assert_eq!(
            calculate_checksum(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            calculate_checksum("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
