//! SQLite Clone Store

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{CloneStorePort, StoreError};
use crate::domain::CloneId;

/// SQLite 克隆存储
pub struct SqliteCloneStore {
    pool: DbPool,
    label: String,
}

impl SqliteCloneStore {
    pub fn new(pool: DbPool, label: impl Into<String>) -> Self {
        Self {
            pool,
            label: label.into(),
        }
    }
}

#[derive(FromRow)]
struct RecordRow {
    record: String,
}

#[async_trait]
impl CloneStorePort for SqliteCloneStore {
    async fn put(&self, key: &CloneId, record: &[u8]) -> Result<(), StoreError> {
        let record = std::str::from_utf8(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO voice_clones (id, record, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(key.as_str())
        .bind(record)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(key.to_string()));
        }

        Ok(())
    }

    async fn get(&self, key: &CloneId) -> Result<Option<Vec<u8>>, StoreError> {
        let row: Option<RecordRow> =
            sqlx::query_as("SELECT record FROM voice_clones WHERE id = ?")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(row.map(|r| r.record.into_bytes()))
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        sqlx::query_scalar::<_, String>("SELECT id FROM voice_clones ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn store() -> SqliteCloneStore {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteCloneStore::new(pool, ":memory:")
    }

    fn key(s: &str) -> CloneId {
        CloneId::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_put_get() {
        let store = store().await;
        store.put(&key("voice_a_01"), br#"{"name":"a"}"#).await.unwrap();

        assert_eq!(
            store.get(&key("voice_a_01")).await.unwrap().unwrap(),
            br#"{"name":"a"}"#
        );
        assert!(store.get(&key("voice_b_02")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_never_overwrites() {
        let store = store().await;
        store.put(&key("voice_a_01"), b"first").await.unwrap();

        let err = store.put(&key("voice_a_01"), b"second").await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
        assert_eq!(store.get(&key("voice_a_01")).await.unwrap().unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_keys() {
        let store = store().await;
        store.put(&key("voice_b_02"), b"{}").await.unwrap();
        store.put(&key("voice_a_01"), b"{}").await.unwrap();
        assert_eq!(store.keys().await.unwrap(), vec!["voice_a_01", "voice_b_02"]);
    }
}
