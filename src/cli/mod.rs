pub mod api;
pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};

use crate::database::models::TaskStatus;

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "To-do CLI - log in and manage your tasks from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Log in with a username or email and save the token locally")]
    Login {
        #[arg(help = "Username or email")]
        user: String,
        #[arg(help = "Password")]
        password: String,
    },

    #[command(about = "List your tasks")]
    ListTasks,

    #[command(about = "Create a task")]
    CreateTask {
        #[arg(help = "Task name")]
        name: String,
        #[arg(help = "pending, in-progress or completed")]
        status: Option<TaskStatus>,
        #[arg(help = "Due date, e.g. 2025-01-31")]
        due_date: Option<String>,
    },

    #[command(about = "Update one of your tasks")]
    UpdateTask {
        #[arg(help = "Task id")]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        due_date: Option<String>,
    },

    #[command(about = "Forget the saved token")]
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Login { user, password } => commands::auth::login(user, password, output_format).await,
        Commands::ListTasks => commands::tasks::list(output_format).await,
        Commands::CreateTask { name, status, due_date } => {
            commands::tasks::create(name, status, due_date, output_format).await
        }
        Commands::UpdateTask { id, name, status, due_date } => {
            commands::tasks::update(id, name, status, due_date, output_format).await
        }
        Commands::Logout => commands::auth::logout(output_format).await,
    }
}
