use std::sync::Arc;

use anyhow::Context;
use chat_relay::{
    config::Config,
    routes,
    services::gemini::GeminiClient,
    state::AppState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env().context("failed to load configuration")?;
    let generator = GeminiClient::from_config(&config).context("failed to build Gemini client")?;
    info!(?config, endpoint = generator.endpoint(), "configuration loaded");

    let state = Arc::new(AppState::new(Arc::new(generator)));
    let app = routes::create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!("chat relay listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
