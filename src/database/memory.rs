use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Task, User};
use super::store::{Store, StoreError};

/// In-process store used by tests and `DATABASE_URL=memory://`
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirrors the unique indexes of the Postgres schema
    fn check_unique(users: &HashMap<Uuid, User>, user: &User) -> Result<(), StoreError> {
        for other in users.values().filter(|u| u.id != user.id) {
            if other.email == user.email {
                return Err(StoreError::Duplicate("email".to_string()));
            }
            if other.username == user.username {
                return Err(StoreError::Duplicate("username".to_string()));
            }
        }
        Ok(())
    }
}

fn by_creation<T>(mut items: Vec<T>, created: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    items.sort_by_key(|item| created(item));
    items
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        Self::check_unique(&users, user)?;
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await.values().cloned().collect();
        Ok(by_creation(users, |u: &User| u.created_at))
    }

    async fn update_user(&self, user: &User) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Ok(false);
        }
        Self::check_unique(&users, user)?;
        users.insert(user.id, user.clone());
        Ok(true)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn insert_task(&self, task: &Task) -> Result<(), StoreError> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(())
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn tasks_for_owner(&self, owner: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| t.is_owned_by(owner))
            .cloned()
            .collect();
        Ok(by_creation(tasks, |t: &Task| t.created_at))
    }

    async fn update_task(&self, task: &Task) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&task.id) {
            Some(slot) => {
                *slot = task.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.tasks.write().await.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
