use serde_json::{Map, Value};

use crate::cli::api::{ApiClient, CliError};
use crate::cli::config::{CliConfig, TokenStore};
use crate::cli::utils::{output_task, output_task_list, LOGIN_HINT};
use crate::cli::OutputFormat;
use crate::database::models::TaskStatus;

/// Client carrying the saved token, if any
fn session() -> anyhow::Result<ApiClient> {
    let config = CliConfig::from_env()?;
    let token = TokenStore::new(&config.token_file).load()?;
    Ok(ApiClient::new(&config).with_token(token))
}

fn explain(err: CliError, action: &str) -> anyhow::Error {
    match err {
        CliError::NotLoggedIn => anyhow::anyhow!(LOGIN_HINT),
        other => anyhow::anyhow!("❌ {}: {}", action, other),
    }
}

/// Only the fields actually given end up in the request body
pub fn task_body(name: Option<String>, status: Option<TaskStatus>, due_date: Option<String>) -> Value {
    let mut body = Map::new();
    if let Some(name) = name {
        body.insert("name".into(), Value::String(name));
    }
    if let Some(status) = status {
        body.insert("status".into(), Value::String(status.to_string()));
    }
    if let Some(due_date) = due_date {
        body.insert("dueDate".into(), Value::String(due_date));
    }
    Value::Object(body)
}

pub async fn list(output_format: OutputFormat) -> anyhow::Result<()> {
    let tasks = session()?
        .list_tasks()
        .await
        .map_err(|e| explain(e, "Error fetching tasks"))?;
    output_task_list(&output_format, &tasks)
}

pub async fn create(
    name: String,
    status: Option<TaskStatus>,
    due_date: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let body = task_body(Some(name), status, due_date);
    let task = session()?
        .create_task(&body)
        .await
        .map_err(|e| explain(e, "Failed to create task"))?;
    output_task(&output_format, "Task created successfully!", &task)
}

pub async fn update(
    id: String,
    name: Option<String>,
    status: Option<TaskStatus>,
    due_date: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let body = task_body(name, status, due_date);
    let task = session()?
        .update_task(&id, &body)
        .await
        .map_err(|e| explain(e, "Failed to update task"))?;
    output_task(&output_format, "Task updated successfully!", &task)
}
