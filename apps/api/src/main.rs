//! Forum API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use forum_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, StorageBackend};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;

    if config.migrate_only {
        if let StorageBackend::Postgres { database_url } = &config.storage {
            api_services::connect_database(database_url).await?;
        }
        info!("database migrations applied successfully");
        return Ok(());
    }

    let repositories = api_services::build_repositories(&config).await?;
    if config.dev_seed {
        dev_seed::run(&repositories).await?;
    }

    let app_state = api_services::build_app_state(&repositories, &config);
    let app = api_router::build_router(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, identity_header = %config.identity_header, "forum-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
