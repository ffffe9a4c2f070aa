use anyhow::{Context, Result};

const DEFAULT_EMBEDDING_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_PROVIDER_API_URL: &str = "https://www.reed.co.uk/api/1.0";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub embedding_api_url: String,
    pub embedding_api_key: String,
    pub provider_api_url: String,
    pub provider_api_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            embedding_api_url: std::env::var("EMBEDDING_API_URL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_API_URL.to_string()),
            embedding_api_key: require_env("EMBEDDING_API_KEY")?,
            provider_api_url: std::env::var("JOB_PROVIDER_API_URL")
                .unwrap_or_else(|_| DEFAULT_PROVIDER_API_URL.to_string()),
            provider_api_key: require_env("JOB_PROVIDER_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
