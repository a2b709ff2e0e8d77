use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::models::{Task, TaskRow, User};
use super::store::{Store, StoreError};
use crate::config::DatabaseConfig;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          UUID PRIMARY KEY,
        username    TEXT NOT NULL,
        email       TEXT NOT NULL,
        password    TEXT NOT NULL,
        is_admin    BOOLEAN NOT NULL DEFAULT FALSE,
        created_at  TIMESTAMPTZ NOT NULL,
        updated_at  TIMESTAMPTZ NOT NULL,
        CONSTRAINT users_username_key UNIQUE (username),
        CONSTRAINT users_email_key UNIQUE (email)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id              UUID PRIMARY KEY,
        name            TEXT NOT NULL,
        status          TEXT NOT NULL DEFAULT 'pending',
        due_date        TIMESTAMPTZ,
        owner_id        UUID NOT NULL,
        owner_username  TEXT NOT NULL,
        created_at      TIMESTAMPTZ NOT NULL,
        updated_at      TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS tasks_owner_id_idx ON tasks (owner_id)",
];

const USER_COLUMNS: &str = "id, username, email, password, is_admin, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, name, status, due_date, owner_id, owner_username, created_at, updated_at";

/// Postgres-backed store over a sqlx connection pool
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in MIGRATIONS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Migration(e.to_string()))?;
        }
        info!("Database schema is up to date");
        Ok(())
    }
}

/// Unique violations carry the constraint name; map it back to the field.
/// Violations of any other constraint stay opaque database errors.
fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(field) = duplicate_field(db_err.constraint()) {
                return StoreError::Duplicate(field.to_string());
            }
        }
    }
    StoreError::Sqlx(err)
}

fn duplicate_field(constraint: Option<&str>) -> Option<&'static str> {
    match constraint {
        Some("users_email_key") => Some("email"),
        Some("users_username_key") => Some("username"),
        _ => None,
    }
}

fn into_task(row: TaskRow) -> Result<Task, StoreError> {
    Task::try_from(row).map_err(StoreError::Corrupt)
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let sql = format!("INSERT INTO users ({}) VALUES ($1, $2, $3, $4, $5, $6, $7)", USER_COLUMNS);
        sqlx::query(&sql)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password)
            .bind(user.is_admin)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn update_user(&self, user: &User) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET username = $2, email = $3, password = $4, is_admin = $5, updated_at = $6 WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.is_admin)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_task(&self, task: &Task) -> Result<(), StoreError> {
        let sql = format!("INSERT INTO tasks ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)", TASK_COLUMNS);
        sqlx::query(&sql)
            .bind(task.id)
            .bind(&task.name)
            .bind(task.status.as_str())
            .bind(task.due_date)
            .bind(task.user.user_id)
            .bind(&task.user.username)
            .bind(task.created_at)
            .bind(task.updated_at)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(into_task)
            .transpose()
    }

    async fn tasks_for_owner(&self, owner: Uuid) -> Result<Vec<Task>, StoreError> {
        let sql = format!("SELECT {} FROM tasks WHERE owner_id = $1 ORDER BY created_at", TASK_COLUMNS);
        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(into_task)
            .collect()
    }

    async fn update_task(&self, task: &Task) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE tasks SET name = $2, status = $3, due_date = $4, updated_at = $5 WHERE id = $1",
        )
        .bind(task.id)
        .bind(&task.name)
        .bind(task.status.as_str())
        .bind(task.due_date)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_known_user_constraints_become_duplicates() {
        assert_eq!(duplicate_field(Some("users_email_key")), Some("email"));
        assert_eq!(duplicate_field(Some("users_username_key")), Some("username"));
        assert_eq!(duplicate_field(Some("tasks_pkey")), None);
        assert_eq!(duplicate_field(None), None);
    }
}
