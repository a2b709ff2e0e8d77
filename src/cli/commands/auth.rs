use crate::cli::api::{ApiClient, CliError};
use crate::cli::config::{CliConfig, TokenStore};
use crate::cli::utils::output_message;
use crate::cli::OutputFormat;

pub async fn login(identifier: String, password: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = CliConfig::from_env()?;
    let client = ApiClient::new(&config);

    let token = match client.login(&identifier, &password).await {
        Ok(token) => token,
        Err(CliError::MissingToken) => anyhow::bail!("❌ No token found in response headers."),
        Err(e) => anyhow::bail!("❌ Login failed: {}", e),
    };

    TokenStore::new(&config.token_file).save(&token)?;
    output_message(&output_format, true, "Logged in successfully!")
}

/// Works without API_URL: only the local token file is touched
pub async fn logout(output_format: OutputFormat) -> anyhow::Result<()> {
    let token_file =
        std::env::var("TODO_TOKEN_FILE").unwrap_or_else(|_| crate::cli::config::DEFAULT_TOKEN_FILE.to_string());

    if TokenStore::new(token_file).clear()? {
        output_message(&output_format, true, "✅ Logged out successfully.")
    } else {
        output_message(&output_format, false, "⚠️ No user is logged in.")
    }
}
