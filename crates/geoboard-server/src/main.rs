use std::net::SocketAddr;
use std::sync::Arc;

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;

use adapters::build_message_repository;
use application::MessageService;
use auth::TokenVerifier;
use config::Config;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub message_service: Arc<MessageService>,
    pub verifier: Arc<TokenVerifier>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geoboard_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        life_cycle = %config.life_cycle,
        repository = %config.repo_kind,
        timeout_secs = config.timeout.as_secs(),
        "Geoboard API initializing"
    );

    let repo = build_message_repository(&config).await?;
    let message_service = Arc::new(MessageService::new(repo, config.timeout));

    if let Some(path) = &config.init_dataset {
        message_service.seed_from_file(path).await?;
    }

    let state = AppState {
        message_service,
        verifier: Arc::new(TokenVerifier::new(&config.token_key)?),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Geoboard API listening on {}", addr);

    axum::serve(listener, routes::app(state)).await?;

    Ok(())
}
