use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::http::HeaderValue;

const DEFAULT_DATABASE_URL: &str = "sqlite:patients.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Where patient records are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Sqlite { url: String },
    /// Records live only as long as the process
    InMemory,
}

/// Runtime settings, read from `PATIENT_*` environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub bind_addr: SocketAddr,
    /// `None` allows any origin
    pub cors_origin: Option<HeaderValue>,
    /// Default filter directive when `RUST_LOG` is not set
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("PATIENT_DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let storage = if database_url.eq_ignore_ascii_case("memory") {
            StorageConfig::InMemory
        } else {
            StorageConfig::Sqlite { url: database_url }
        };

        let bind_addr = lookup("PATIENT_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("invalid PATIENT_BIND_ADDR: {bind_addr}"))?;

        let cors_origin = lookup("PATIENT_CORS_ORIGIN")
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid PATIENT_CORS_ORIGIN: {origin}"))
            })
            .transpose()?;

        let log_level = lookup("PATIENT_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            storage,
            bind_addr,
            cors_origin,
            log_level,
        })
    }
}
