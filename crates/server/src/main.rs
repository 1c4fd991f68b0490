mod api;
mod auth;
mod cli;
mod router;
mod state;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use askdb_catalog::Catalog;

use crate::auth::{TokenIssuer, UserStore};

async fn serve(config: &askdb_core::Config) -> anyhow::Result<()> {
    config.log_summary();

    let tokens = TokenIssuer::from_config(&config.auth)?;
    let catalog = Arc::new(Catalog::seeded());
    let users = UserStore::seeded();

    let state = Arc::new(state::AppState::new(catalog, users, tokens));
    let app = router::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://localhost:{}", config.server.port);
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    askdb_core::config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    if cli::dispatch(cli.command)? {
        return Ok(());
    }

    serve(&askdb_core::Config::from_env()).await
}
