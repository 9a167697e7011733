pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::{Issue, User};

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

pub const AUTH_KEY: &str = "fixmycampus-auth";
pub const ISSUES_KEY: &str = "fixmycampus-issues";

/// String key-value backend, the server-side stand-in for browser local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    async fn remove(&self, key: &str) -> Result<(), AppError>;

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Whatever was found under the two storage keys at startup.
#[derive(Debug, Default)]
pub struct PersistedState {
    pub auth: Option<User>,
    pub issues: Option<Vec<Issue>>,
}

/// Typed persistence port used by the store. Owns the key names and the
/// JSON encoding of each record.
#[derive(Clone)]
pub struct Persistence {
    backend: Arc<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub async fn load(&self) -> Result<PersistedState, AppError> {
        let auth = self.read_json::<User>(AUTH_KEY).await?;
        let issues = self.read_json::<Vec<Issue>>(ISSUES_KEY).await?;
        Ok(PersistedState { auth, issues })
    }

    pub async fn save_issues(&self, issues: &[Issue]) -> Result<(), AppError> {
        let encoded = serde_json::to_string(issues)?;
        self.backend.set(ISSUES_KEY, &encoded).await?;
        debug!("persisted {} issues", issues.len());
        Ok(())
    }

    pub async fn save_auth(&self, user: &User) -> Result<(), AppError> {
        let encoded = serde_json::to_string(user)?;
        self.backend.set(AUTH_KEY, &encoded).await
    }

    pub async fn clear_auth(&self) -> Result<(), AppError> {
        self.backend.remove(AUTH_KEY).await
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.backend.ping().await
    }

    // Undecodable records are treated as absent so startup falls back to defaults.
    async fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, AppError> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("ignoring unreadable value under {}: {}", key, e);
                Ok(None)
            }
        }
    }
}
