//! Database access for glosa-ai
//!
//! SQLite holds the durable mirror of vocabulary history. The live session
//! never reads back from it except at startup.

pub mod word_groups;

pub use word_groups::SqliteMirror;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::path::Path;

use crate::models::WordGroup;

/// Best-effort durable copy of the vocabulary session
#[async_trait]
pub trait WordGroupMirror: Send + Sync {
    /// Write one group record
    async fn save(&self, group: &WordGroup) -> glosa_common::Result<()>;

    /// Load every record, newest first
    async fn load_all(&self) -> glosa_common::Result<Vec<WordGroup>>;
}

/// Initialize database connection pool
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the word_groups table if it doesn't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS word_groups (
            id TEXT PRIMARY KEY,
            created_at TEXT NOT NULL,
            document TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_word_groups_created_at ON word_groups(created_at)")
        .execute(pool)
        .await?;

    tracing::info!("Database tables initialized (word_groups)");

    Ok(())
}
