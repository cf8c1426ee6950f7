// SQLite-backed policy store.
//
// Tables:
// - antitag_policies: one row per group that has antitag switched on

use crate::core::antitag::{AntitagAction, ModerationPolicy, PolicyStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

pub struct SqlitePolicyStore {
    pool: Pool<Sqlite>,
}

impl SqlitePolicyStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database file and run migrations.
    pub async fn open(database_path: &str) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(database_path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let pool = SqlitePoolOptions::new()
            .connect(&format!("sqlite://{}?mode=rwc", database_path))
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Run database migrations to create required tables.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS antitag_policies (
                group_id TEXT PRIMARY KEY,
                enabled BOOLEAN NOT NULL DEFAULT 1,
                action TEXT NOT NULL DEFAULT 'delete',
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::StorageError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl PolicyStore for SqlitePolicyStore {
    async fn get_policy(&self, group_id: &str) -> Result<Option<ModerationPolicy>, StoreError> {
        let row = sqlx::query("SELECT enabled, action FROM antitag_policies WHERE group_id = ?")
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))?;

        Ok(row.map(|row| {
            let action: String = row.get("action");
            ModerationPolicy {
                enabled: row.get("enabled"),
                action: action.parse().unwrap_or_else(|e| {
                    tracing::warn!(group_id, "{}, falling back to delete", e);
                    AntitagAction::Delete
                }),
            }
        }))
    }

    async fn set_policy(&self, group_id: &str, action: AntitagAction) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO antitag_policies (group_id, enabled, action, updated_at)
            VALUES (?, 1, ?, ?)
            ON CONFLICT(group_id) DO UPDATE SET
                enabled = excluded.enabled,
                action = excluded.action,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(group_id)
        .bind(action.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn remove_policy(&self, group_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM antitag_policies WHERE group_id = ?")
            .bind(group_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))?;
        Ok(())
    }
}
