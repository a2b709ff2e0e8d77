use std::sync::Arc;
use tracing::info;

use super::memory::MemoryStore;
use super::postgres::PgStore;
use super::store::{Store, StoreError};
use crate::config::DatabaseConfig;

/// Chooses and opens the store named by the configured URL
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Arc<dyn Store>, StoreError> {
        let parsed = url::Url::parse(url).map_err(|_| StoreError::UnsupportedUrl(Self::redact(url)))?;

        match parsed.scheme() {
            "memory" => {
                info!("Using in-memory store");
                Ok(Arc::new(MemoryStore::new()))
            }
            "postgres" | "postgresql" => {
                let store = PgStore::connect(url, config).await?;
                store.migrate().await?;
                info!("Connected to {}", Self::redact(url));
                Ok(Arc::new(store))
            }
            _ => Err(StoreError::UnsupportedUrl(Self::redact(url))),
        }
    }

    /// Strip credentials before a URL reaches the logs
    fn redact(url: &str) -> String {
        match url::Url::parse(url) {
            Ok(mut parsed) => {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("****"));
                }
                parsed.to_string()
            }
            Err(_) => "<unparseable>".to_string(),
        }
    }
}
