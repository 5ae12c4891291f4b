//! Key/value client storage.
//!
//! Mirrors the `getItem` / `setItem` / `removeItem` surface of web storage.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;

/// Persistent string storage keyed by well-known names.
#[derive(Clone)]
pub struct ClientStorage {
    pool: SqlitePool,
}

impl ClientStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read a single value.
    pub async fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM client_storage WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("value")))
    }

    /// Write a single value, replacing any previous one.
    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.set_items(&[(key, value)]).await
    }

    /// Write several values in one transaction.
    pub async fn set_items(&self, items: &[(&str, &str)]) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        for (key, value) in items {
            sqlx::query(
                "INSERT INTO client_storage (key, value, updated_at) VALUES (?, ?, ?)
                 ON CONFLICT(key) DO UPDATE
                 SET value = excluded.value, updated_at = excluded.updated_at",
            )
            .bind(key)
            .bind(value)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Remove several keys in one transaction. Missing keys are ignored.
    pub async fn remove_items(&self, keys: &[&str]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for key in keys {
            sqlx::query("DELETE FROM client_storage WHERE key = ?")
                .bind(key)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Remove a single key.
    pub async fn remove_item(&self, key: &str) -> Result<(), AppError> {
        self.remove_items(&[key]).await
    }
}
