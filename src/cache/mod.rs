#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;
use tracing::{debug, info};

pub type CachePool = Pool<Sqlite>;

/// Content-addressed chunk cache.
///
/// Keyed by the canonical document locator; the value is the JSON-encoded
/// chunk-text list. Entries are immutable except through `put` (which
/// overwrites, last writer wins) and `clear_all`. Values are deterministic
/// functions of identical source content, so concurrent writers to the same
/// key are benign.
#[derive(Debug, Clone)]
pub struct ChunkCache {
    pool: CachePool,
}

impl ChunkCache {
    pub async fn new<P: AsRef<Path>>(database_path: P) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .context("Failed to create cache connection pool")?;

        let cache = Self { pool };
        cache.ensure_schema().await?;

        Ok(cache)
    }

    pub fn pool(&self) -> &CachePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chunk_cache (
                document_key TEXT PRIMARY KEY,
                chunks TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create chunk_cache table")?;

        debug!("Cache schema ready");
        Ok(())
    }

    /// Look up the chunk list stored for a document key.
    ///
    /// `Ok(None)` is a miss. Callers treat an `Err` as a miss too (the
    /// pipeline proceeds uncached), but the distinction is surfaced so it
    /// can be logged.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
        let row = sqlx::query("SELECT chunks FROM chunk_cache WHERE document_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read cache entry for {key}"))?;

        let Some(row) = row else {
            debug!("Cache miss for {}", key);
            return Ok(None);
        };

        let payload: String = row.get("chunks");
        let chunks: Vec<String> = serde_json::from_str(&payload)
            .with_context(|| format!("Failed to decode cache entry for {key}"))?;

        debug!("Cache hit for {} ({} chunks)", key, chunks.len());
        Ok(Some(chunks))
    }

    /// Store the chunk list for a document key, replacing any prior value.
    ///
    /// Empty chunk lists are stored explicitly so a later run can
    /// distinguish "known empty" from "never processed".
    pub async fn put(&self, key: &str, chunks: &[String]) -> Result<()> {
        let payload =
            serde_json::to_string(chunks).context("Failed to encode chunk list for cache")?;

        sqlx::query(
            "INSERT OR REPLACE INTO chunk_cache (document_key, chunks, created_at)
             VALUES (?, ?, ?)",
        )
        .bind(key)
        .bind(&payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write cache entry for {key}"))?;

        debug!("Cached {} chunks for {}", chunks.len(), key);
        Ok(())
    }

    /// Administrative wipe; forces full recomputation on the next batch.
    pub async fn clear_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM chunk_cache")
            .execute(&self.pool)
            .await
            .context("Failed to clear chunk cache")?;

        info!("Cleared {} cache entries", result.rows_affected());
        Ok(result.rows_affected())
    }

    /// Number of cached documents, for status reporting.
    pub async fn entry_count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM chunk_cache")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count cache entries")?;

        Ok(row.get("n"))
    }
}
