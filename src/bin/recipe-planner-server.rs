// ABOUTME: Server binary for the Recipe Planner HTTP API
// ABOUTME: Wires configuration, database, auth, and the optional Gemini backend
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Recipe Planner API Server Binary
//!
//! Starts the HTTP API with JWT authentication, SQLite storage, and the
//! Gemini-backed generation endpoint when a credential is configured.

use anyhow::Result;
use clap::Parser;
use recipe_planner::{
    auth::AuthManager,
    config::ServerConfig,
    database::Database,
    llm::{GeminiClient, LlmProvider},
    logging, routes,
    state::ServerState,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "recipe-planner-server")]
#[command(about = "Recipe Planner - recipe and meal plan API with AI generation")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Recipe Planner API");
    info!("{}", config.summary());

    let database = Database::new(&config.database_url).await?;
    database.migrate().await?;
    info!("Database initialized: {}", config.database_url);

    let auth = AuthManager::new(
        config.jwt_secret.as_bytes().to_vec(),
        config.jwt_expiry_hours,
    );

    let llm: Option<Arc<dyn LlmProvider>> = config
        .gemini_api_key
        .as_deref()
        .map(|key| Arc::new(GeminiClient::new(key)) as Arc<dyn LlmProvider>);
    if llm.is_none() {
        info!("GEMINI_API_KEY not set; /api/generate-recipe will report a configuration error");
    }

    let state = Arc::new(ServerState::new(database, auth, llm));
    let app = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
