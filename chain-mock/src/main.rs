/// Find&Earn Chain Mock Node
///
/// A lightweight mock node that serves the wallet JSON-RPC surface of
/// the LostAndFound contract over HTTP.
/// Designed for integration testing and local development.

mod handlers;
mod server;
mod state;
mod types;

use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;

use server::run_server;
use state::LedgerState;

#[derive(Debug)]
struct Config {
    server_host: String,
    server_port: u16,
}

impl Config {
    fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8545".to_string())
            .parse()
            .context("Invalid SERVER_PORT")?;

        Ok(Self {
            server_host,
            server_port,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Find&Earn chain mock...");

    let config = Config::from_env().context("Failed to load configuration")?;

    log::info!(
        "Server will listen on {}:{}",
        config.server_host,
        config.server_port
    );

    let state = Arc::new(LedgerState::new());

    run_server(state, config.server_host, config.server_port)
        .await
        .context("Server error")?;

    Ok(())
}
