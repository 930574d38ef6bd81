//! Word group persistence
//!
//! Each group is stored as one JSON document keyed by id, with the
//! creation time duplicated into a sortable column.

use async_trait::async_trait;
use glosa_common::{time, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::WordGroupMirror;
use crate::models::WordGroup;

/// Save a word group, replacing any record with the same id
pub async fn save_group(pool: &SqlitePool, group: &WordGroup) -> Result<()> {
    let id = group.id.to_string();
    let created_at = time::to_storage_string(&group.created_at);
    let document = serde_json::to_string(group)?;

    sqlx::query(
        r#"
        INSERT INTO word_groups (id, created_at, document)
        VALUES (?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            created_at = excluded.created_at,
            document = excluded.document
        "#,
    )
    .bind(&id)
    .bind(&created_at)
    .bind(&document)
    .execute(pool)
    .await?;

    tracing::debug!(group_id = %id, keyword = %group.keyword, "Word group saved");

    Ok(())
}

/// Load all word groups ordered by creation time, newest first
///
/// Rows whose id or document cannot be parsed are skipped with a warning.
pub async fn load_groups(pool: &SqlitePool) -> Result<Vec<WordGroup>> {
    let rows = sqlx::query("SELECT id, document FROM word_groups ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    let mut groups = Vec::with_capacity(rows.len());
    for row in rows {
        let id: String = row.get("id");
        let document: String = row.get("document");

        if let Err(e) = Uuid::parse_str(&id) {
            tracing::warn!(id = %id, error = %e, "Skipping word group with invalid id");
            continue;
        }

        match serde_json::from_str::<WordGroup>(&document) {
            Ok(group) => groups.push(group),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Skipping unreadable word group");
            }
        }
    }

    Ok(groups)
}

/// SQLite-backed durable mirror
#[derive(Clone)]
pub struct SqliteMirror {
    pool: SqlitePool,
}

impl SqliteMirror {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WordGroupMirror for SqliteMirror {
    async fn save(&self, group: &WordGroup) -> Result<()> {
        save_group(&self.pool, group).await
    }

    async fn load_all(&self) -> Result<Vec<WordGroup>> {
        load_groups(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_tables;
    use crate::models::{language, SentenceData, Vocabulary};
    use chrono::{Duration, Utc};

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        init_tables(&pool).await.unwrap();
        pool
    }

    fn group(keyword: &str, minutes_ago: i64) -> WordGroup {
        let mut group = WordGroup::new(
            keyword,
            language::find("fr").unwrap(),
            Vocabulary {
                words: vec!["pomme".into()],
                meanings: vec!["蘋果".into()],
            },
        );
        group.created_at = Utc::now() - Duration::minutes(minutes_ago);
        group
    }

    #[tokio::test]
    async fn test_save_and_load_group() {
        let pool = setup_test_db().await;
        let mut saved = group("fruit", 0);
        saved.sentences.insert(
            "pomme".into(),
            SentenceData {
                example: "Je mange une pomme.".into(),
                translation: "我吃一顆蘋果。".into(),
            },
        );

        save_group(&pool, &saved).await.unwrap();
        let loaded = load_groups(&pool).await.unwrap();

        assert_eq!(loaded, vec![saved]);
    }

    #[tokio::test]
    async fn test_load_orders_newest_first_regardless_of_insert_order() {
        let pool = setup_test_db().await;
        for g in [group("mid", 10), group("old", 60), group("new", 1)] {
            save_group(&pool, &g).await.unwrap();
        }

        let keywords: Vec<_> = load_groups(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.keyword)
            .collect();
        assert_eq!(keywords, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_save_same_id_replaces_record() {
        let pool = setup_test_db().await;
        let mut g = group("fruit", 0);
        save_group(&pool, &g).await.unwrap();

        g.keyword = "fruits".into();
        save_group(&pool, &g).await.unwrap();

        let groups = load_groups(&pool).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].keyword, "fruits");
    }

    #[tokio::test]
    async fn test_unreadable_rows_are_skipped() {
        let pool = setup_test_db().await;
        save_group(&pool, &group("ok", 0)).await.unwrap();
        sqlx::query("INSERT INTO word_groups (id, created_at, document) VALUES (?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind("2024-01-01T00:00:00.000000Z")
            .bind("{not json")
            .execute(&pool)
            .await
            .unwrap();

        let loaded = load_groups(&pool).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].keyword, "ok");
    }
}
