//! Service configuration loaded from the environment

use anyhow::{Context, Result};
use common::database::DatabaseConfig;
use std::str::FromStr;

use crate::password::HasherConfig;

/// Where user records live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("Unknown STORAGE_BACKEND: {:?}", other),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub storage: StorageBackend,
    /// Present when `storage` is [`StorageBackend::Postgres`]
    pub database: Option<DatabaseConfig>,
    pub hasher: HasherConfig,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SERVER_HOST`: Bind host (default: "0.0.0.0")
    /// - `SERVER_PORT` or `PORT`: Bind port (default: 3001)
    /// - `STORAGE_BACKEND`: "postgres" or "memory" (default: "postgres")
    /// - `DATABASE_*`: see [`DatabaseConfig::from_env`]
    /// - `PASSWORD_HASH_*`: see [`HasherConfig::from_env`]
    pub fn from_env() -> Result<Self> {
        let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = std::env::var("SERVER_PORT")
            .or_else(|_| std::env::var("PORT"))
            .unwrap_or_else(|_| "3001".to_string());
        let server_port: u16 = server_port
            .trim()
            .parse()
            .with_context(|| format!("Invalid SERVER_PORT: {:?}", server_port))?;

        let storage: StorageBackend = std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;

        let database = match storage {
            StorageBackend::Postgres => Some(DatabaseConfig::from_env()?),
            StorageBackend::Memory => None,
        };

        let hasher = HasherConfig::from_env()?;

        Ok(Self {
            server_host,
            server_port,
            storage,
            database,
            hasher,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
