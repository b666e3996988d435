//! friendlyteacher server
//!
//! Serves the lesson form and forwards generation requests to the
//! Anthropic Messages API

use anyhow::{Context, Result};
use friendlyteacher::utils::logging::init_logging;
use friendlyteacher::{create_router, version_info, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new().context("Failed to load server settings")?;

    init_logging(&settings.logging);
    info!("{}", version_info());
    info!("Settings loaded: model={}, template={}", settings.generation.model, settings.generation.template.name());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let app = create_router(settings).await?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 friendlyteacher server started!");
    info!("📚 Lesson form: http://{}/", addr);
    info!("🔄 JSON API: http://{}/api/generate", addr);
    info!("📝 Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    Ok(())
}
