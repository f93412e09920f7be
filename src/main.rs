use portfolio_gate::{
    AppState, HttpSessionVerifier, VerifierState,
    config::{AppConfig, Env},
    create_router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initializes logging, builds the session verifier and
/// serves the gateway.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast in production)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise a development-friendly default.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "portfolio_gate=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Session verifier against the backend API.
    let verifier = match HttpSessionVerifier::new(&config.backend_api_url, config.verify_timeout) {
        Ok(verifier) => verifier,
        Err(e) => {
            tracing::error!(error = %e, "failed to build the verification HTTP client");
            std::process::exit(1);
        }
    };
    tracing::info!(endpoint = %verifier.endpoint(), "session verification configured");

    // 4. State, router, server.
    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(Arc::new(verifier) as VerifierState, config);
    let app = create_router(state);

    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%bind_addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on {}", bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
