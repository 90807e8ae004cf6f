//! # Configuration
//!
//! Layered settings: built-in defaults, then an optional
//! `invoice-manager.toml`, then `INVOICE__*` environment variables
//! (e.g. `INVOICE__SERVER__PORT=9000`). A `.env` file is loaded first.

use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Default tracing filter; `RUST_LOG` takes precedence
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        Self::builder()?
            .add_source(File::with_name("invoice-manager").required(false))
            .add_source(Environment::with_prefix("INVOICE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Defaults only, without reading any file or the environment
    pub fn defaults() -> Result<Self, config::ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000_i64)?
            .set_default("database.url", "sqlite:invoices.db")?
            .set_default("database.max_connections", 5_i64)?
            .set_default("log_level", "info")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
