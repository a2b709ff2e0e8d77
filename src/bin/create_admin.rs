use anyhow::{bail, Context};
use clap::Parser;
use serde_json::json;

use todo_api_rust::auth::hash_password;
use todo_api_rust::config::AppConfig;
use todo_api_rust::database::models::{NewUser, User};
use todo_api_rust::database::DatabaseManager;
use todo_api_rust::logging;
use todo_api_rust::schema::tables;

#[derive(Parser)]
#[command(name = "create-admin")]
#[command(about = "Create an administrator account directly in the configured database")]
struct Args {
    #[arg(help = "Username")]
    username: String,
    #[arg(help = "Email")]
    email: String,
    #[arg(long, env = "ADMIN_PASSWORD", help = "Password (or set ADMIN_PASSWORD)")]
    password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = AppConfig::from_env();
    logging::init(&config.logging);
    config.validate()?;

    // Same rules as self-registration
    let body = json!({ "username": args.username, "email": args.email, "password": args.password });
    let payload = tables::user_create().validate(&body).map_err(anyhow::Error::msg)?;
    let draft: NewUser = serde_json::from_value(payload.into())?;

    let url = config.database.url.clone().unwrap_or_default();
    let store = DatabaseManager::connect(&url, &config.database)
        .await
        .context("connecting to the database")?;

    if store.find_user_by_email(&draft.email).await?.is_some() {
        bail!("User with given email already exists");
    }
    if store.find_user_by_username(&draft.username).await?.is_some() {
        bail!("User with given username already exists");
    }

    let hash = hash_password(draft.password, config.security.bcrypt_cost).await?;
    let mut admin = User::new(draft.username, draft.email, hash);
    admin.set_admin(true);
    store.insert_user(&admin).await?;
    store.close().await;

    tracing::info!("Admin created: {} ({})", admin.username, admin.id);
    println!("{}", serde_json::to_string_pretty(&admin)?);
    Ok(())
}
