use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::AppError;

use super::KeyValueStore;

pub struct SqliteKeyValueStore {
    db: SqlitePool,
}

impl SqliteKeyValueStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM storage WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.db)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO storage (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM storage WHERE key = ?")
            .bind(key)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("select 1").execute(&self.db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqliteKeyValueStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test db");

        let store = SqliteKeyValueStore::new(pool);
        store.migrate().await.expect("Failed to run migrations");
        store
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = setup_test_db().await;

        assert_eq!(store.get("fixmycampus-auth").await.unwrap(), None);

        store.set("fixmycampus-auth", "{\"id\":\"1\"}").await.expect("Failed to set");
        assert_eq!(
            store.get("fixmycampus-auth").await.unwrap().as_deref(),
            Some("{\"id\":\"1\"}")
        );
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = setup_test_db().await;

        store.set("fixmycampus-issues", "[]").await.unwrap();
        store.set("fixmycampus-issues", "[1]").await.unwrap();

        assert_eq!(
            store.get("fixmycampus-issues").await.unwrap().as_deref(),
            Some("[1]")
        );
    }

    #[tokio::test]
    async fn test_remove() {
        let store = setup_test_db().await;

        store.set("fixmycampus-auth", "{}").await.unwrap();
        store.remove("fixmycampus-auth").await.expect("Failed to remove");
        // removing an absent key is fine
        store.remove("fixmycampus-auth").await.expect("Failed to remove twice");

        assert_eq!(store.get("fixmycampus-auth").await.unwrap(), None);
        store.ping().await.expect("ping failed");
    }
}
