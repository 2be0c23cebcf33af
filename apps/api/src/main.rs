//! Procura portal gateway composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod redis_session_store;
mod state;
#[cfg(test)]
mod test_support;

use procura_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{
    build_app_state, build_memory_session_layer, build_redis_client, build_redis_session_layer,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let app_state = build_app_state(&config)?;

    let app = match config.redis_url.as_deref() {
        Some(redis_url) => {
            info!("using redis session store");
            let session_layer = build_redis_session_layer(build_redis_client(redis_url)?, &config);
            build_router(app_state, &config.frontend_url, session_layer)?
        }
        None => {
            info!("using in-memory session store");
            build_router(
                app_state,
                &config.frontend_url,
                build_memory_session_layer(&config),
            )?
        }
    };

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "procura-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
