use anyhow::{bail, Context, Result};

/// Which persistence backend the service runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is Postgres.
    pub database_url: Option<String>,
    /// Absent key means every generator runs on templates.
    pub anthropic_api_key: Option<String>,
    pub chat_history_limit: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store_backend = StoreBackend::parse(
            &std::env::var("STORE_BACKEND").unwrap_or_else(|_| "postgres".to_string()),
        )?;

        let database_url = match store_backend {
            StoreBackend::Postgres => Some(require_env("DATABASE_URL")?),
            StoreBackend::Memory => optional_env("DATABASE_URL"),
        };

        Ok(Config {
            store_backend,
            database_url,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            chat_history_limit: std::env::var("CHAT_HISTORY_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<i64>()
                .context("CHAT_HISTORY_LIMIT must be an integer")?,
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

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            store_backend: StoreBackend::Memory,
            database_url: None,
            anthropic_api_key: None,
            chat_history_limit: 10,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!(StoreBackend::parse("postgres").unwrap(), StoreBackend::Postgres);
        assert_eq!(StoreBackend::parse(" Memory ").unwrap(), StoreBackend::Memory);
        assert!(StoreBackend::parse("firestore").is_err());
    }
}
