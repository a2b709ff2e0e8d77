use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Task, User};

/// Errors from the persistent store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unsupported database URL: {0}")]
    UnsupportedUrl(String),

    #[error("Duplicate value for unique field: {0}")]
    Duplicate(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence boundary. The store is the only state shared between requests.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    /// Replace the stored record with `user`; returns false if it no longer exists
    async fn update_user(&self, user: &User) -> Result<bool, StoreError>;
    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn insert_task(&self, task: &Task) -> Result<(), StoreError>;
    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;
    async fn tasks_for_owner(&self, owner: Uuid) -> Result<Vec<Task>, StoreError>;
    async fn update_task(&self, task: &Task) -> Result<bool, StoreError>;
    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    /// Release pooled connections at shutdown
    async fn close(&self) {}
}
