use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub vector_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "./uploads".to_string())
                .into(),
            vector_dir: std::env::var("VECTOR_DIR")
                .unwrap_or_else(|_| "./vector-store".to_string())
                .into(),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
