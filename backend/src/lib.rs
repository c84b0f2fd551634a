//! # Patient Records Backend
//!
//! HTTP service for managing patient records, layered as:
//! ```text
//! IO Layer (REST handlers)      rest
//!     ↓
//! Domain Layer (validation)     domain
//!     ↓
//! Storage Layer (repositories)  storage, db
//! ```

pub mod config;
pub mod db;
pub mod domain;
pub mod rest;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{http::Method, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{AppConfig, StorageConfig};
use crate::db::{DbConnection, SqlitePatientRepository};
use crate::domain::PatientService;
use crate::storage::{InMemoryPatientRepository, PatientRepository};

pub use rest::AppState;

/// Build the repository selected by `config` and wire the services around it
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    let repository: Arc<dyn PatientRepository> = match &config.storage {
        StorageConfig::Sqlite { url } => {
            info!("Setting up database at {}", url);
            let db = DbConnection::new(url).await?;
            Arc::new(SqlitePatientRepository::new(db))
        }
        StorageConfig::InMemory => {
            info!("Using in-memory patient storage");
            Arc::new(InMemoryPatientRepository::new())
        }
    };

    Ok(AppState::new(PatientService::new(repository)))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Router {
    let allow_origin = match &config.cors_origin {
        Some(origin) => AllowOrigin::exact(origin.clone()),
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .nest("/patient", rest::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
