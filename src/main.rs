use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wschat_accounts::{ChatAccounts, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing `.env` is fine, the environment may be set up otherwise.
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let accounts = Arc::new(ChatAccounts::new(Config::from_env()?).await?);
    let addr = accounts.address();

    let app = ChatAccounts::install_routes(Router::new()).with_state(accounts);

    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
