//! Rephrase dev server binary

use anyhow::Result;
use clap::Parser;
use rephrase_devserver::{build_app, AppState, ServerConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rephrase_devserver=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let config = ServerConfig::parse();

    let state = AppState::new(config.word_limit());
    let _ticker = state.stats.clone().spawn_ticker(config.stats_interval());

    if !config.static_dir.is_dir() {
        warn!(
            "Static directory {} not found, only the API is served",
            config.static_dir.display()
        );
    }
    let app = build_app(state, Some(&config.static_dir));

    info!("Starting Rephrase dev server on http://{}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
