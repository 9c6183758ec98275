//! token-server binary
//!
//! Long-running service that:
//! - Issues sequential pickup tokens for catalog orders
//! - Serves catalog and order reads through a cache-aside layer
//! - Pushes order-status changes to joined WebSocket clients

use token_server::{AppState, Config, api};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "token_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env();

    tracing::info!("Starting token-server (env: {})", config.environment);

    // Initialize application state
    let state = AppState::new(&config).await?;

    // Periodic cache janitor — evicts expired entries the lazy read path
    // never touches again
    let cache_store = state.cache_store.clone();
    let sweep = std::time::Duration::from_secs(config.cache_sweep_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep);
        loop {
            interval.tick().await;
            match cache_store.purge_expired().await {
                Ok(evicted) if evicted > 0 => {
                    tracing::debug!(evicted = evicted, "Cache janitor sweep");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Cache janitor sweep failed"),
            }
        }
    });

    // Build router and serve
    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("token-server HTTP listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
