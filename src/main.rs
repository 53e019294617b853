mod config;
mod handlers;
mod models;
mod server;
mod services;

use anyhow::{Context, Result};
use std::sync::Arc;

use config::Config;
use server::{create_router, AppState};
use services::{GeminiService, TwitterClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    log::info!("🚀 Starting menu & profile proxy...");

    let config = Config::from_env()?;

    let gemini = Arc::new(GeminiService::new(
        config.gemini_key.clone(),
        config.gemini_model.clone(),
        config.gemini_api_base.clone(),
    ));
    log::info!("✅ Gemini service initialized with model: {}", config.gemini_model);

    let twitter = Arc::new(TwitterClient::new(
        config.twitter_bearer_token.clone(),
        config.twitter_api_base.clone(),
        config.twitter_timeout,
    )?);
    log::info!("✅ Twitter client initialized ({:?} timeout)", config.twitter_timeout);

    let app = create_router(AppState {
        menu_extractor: gemini,
        profile_lookup: twitter,
        menu_timeout: config.menu_timeout,
        max_upload_bytes: config.max_upload_bytes,
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    log::info!("🌐 Listening on {}", config.bind_addr);
    log::info!("   POST /get-menu/            - menu extraction");
    log::info!("   GET  /api/twitter/:username - profile lookup");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => log::info!("🛑 Shutting down..."),
                Err(e) => log::error!("❌ Failed to listen for Ctrl-C, shutting down: {}", e),
            }
        })
        .await?;

    Ok(())
}
