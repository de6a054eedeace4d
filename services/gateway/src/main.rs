mod caption;
mod config;
mod error;
mod handlers;
mod models;
mod router;
mod state;

use config::Config;
use router::create_router;
use state::AppState;
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting marketplace gateway");

    let config = Config::load();
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    // Initialize application state
    let state = AppState::new(&config);

    // Create router
    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
