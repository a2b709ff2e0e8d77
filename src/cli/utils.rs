use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::database::models::Task;

pub const LOGIN_HINT: &str = "❌ Please login first.";

/// Day-first short date, as the CLI has always printed it
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One line per task: `1. name [status] - created: dd/mm/yyyy - due: dd/mm/yyyy`
pub fn task_line(index: usize, task: &Task) -> String {
    let due = task
        .due_date
        .as_ref()
        .map(|d| format!(" - due: {}", format_date(d)))
        .unwrap_or_default();

    format!(
        "{}. {} [{}] - created: {}{}",
        index + 1,
        task.name,
        task.status,
        format_date(&task.created_at),
        due
    )
}

pub fn output_task_list(output_format: &OutputFormat, tasks: &[Task]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(&tasks),
        OutputFormat::Text => {
            if tasks.is_empty() {
                println!("📭 No tasks found.");
                return Ok(());
            }
            println!("📋 Your Tasks:");
            for (index, task) in tasks.iter().enumerate() {
                println!("{}", task_line(index, task));
            }
            Ok(())
        }
    }
}

pub fn output_task(output_format: &OutputFormat, message: &str, task: &Task) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(task),
        OutputFormat::Text => {
            println!("✅ {}", message);
            println!("   Name: {}", task.name);
            println!("   Status: {}", task.status);
            if let Some(due) = &task.due_date {
                println!("   Due: {}", format_date(due));
            }
            Ok(())
        }
    }
}

pub fn output_message(output_format: &OutputFormat, ok: bool, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(&serde_json::json!({ "success": ok, "message": message })),
        OutputFormat::Text => {
            println!("{}", message);
            Ok(())
        }
    }
}
