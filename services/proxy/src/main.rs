use sentiment_proxy::config::ProxyConfig;
use sentiment_proxy::router::create_router;
use sentiment_proxy::state::AppState;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting sentiment proxy service");

    let config = ProxyConfig::from_env();
    if config.api_key.is_none() {
        tracing::warn!(
            var = sentiment_proxy::config::API_KEY_VAR,
            "Upstream credential not set; every request will fail until it is configured"
        );
    }

    let addr = config.socket_addr()?;
    let state = AppState::new(config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // Without a signal handler the server runs until killed.
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping");
}
