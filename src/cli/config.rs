use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use url::Url;

use super::api::CliError;

pub const DEFAULT_TOKEN_FILE: &str = ".token";

/// Client settings read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Base URL including the `/api` prefix, e.g. `http://localhost:3000/api`
    pub api_url: Url,
    pub token_file: PathBuf,
}

impl CliConfig {
    pub fn from_env() -> Result<Self, CliError> {
        let raw = std::env::var("API_URL").map_err(|_| CliError::Config("API_URL is not set".to_string()))?;
        let token_file = std::env::var("TODO_TOKEN_FILE").unwrap_or_else(|_| DEFAULT_TOKEN_FILE.to_string());
        Self::new(&raw, token_file)
    }

    pub fn new(api_url: &str, token_file: impl Into<PathBuf>) -> Result<Self, CliError> {
        let api_url = Url::parse(api_url)
            .map_err(|e| CliError::Config(format!("API_URL '{}' is not a valid URL: {}", api_url, e)))?;

        Ok(Self {
            api_url,
            token_file: token_file.into(),
        })
    }
}

/// The locally persisted session token, one file with the raw token in it
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, token: &str) -> Result<(), CliError> {
        fs::write(&self.path, token)?;
        Ok(())
    }

    pub fn load(&self) -> Result<Option<String>, CliError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns false when there was no session to clear
    pub fn clear(&self) -> Result<bool, CliError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
