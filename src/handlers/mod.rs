//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod api;
pub mod health;
pub mod pages;
pub mod proxy;

use crate::config::Settings;
use crate::middleware::request_logging_middleware;
use crate::models::credential::Credential;
use crate::services::{AnthropicClient, Orchestrator, Renderer};
use crate::utils::error::AppError;
use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Uri},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub orchestrator: Orchestrator,
    pub client: AnthropicClient,
    pub renderer: Renderer,
    /// Key from `ANTHROPIC_API_KEY`, used when the request brings none
    pub default_credential: Option<Credential>,
    /// When the service was assembled; health checks report uptime from here
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self> {
        let client = AnthropicClient::new(settings.anthropic.clone())?;
        let orchestrator = Orchestrator::new(&settings, Arc::new(client.clone()));
        let renderer = Renderer::new().context("Failed to load page templates")?;

        let default_credential = settings
            .anthropic
            .default_api_key
            .as_deref()
            .and_then(Credential::parse);
        if let Some(credential) = &default_credential {
            info!("🔑 Default API key configured: {}", credential.fingerprint());
        }

        Ok(Self {
            settings,
            orchestrator,
            client,
            renderer,
            default_credential,
            started_at: Instant::now(),
        })
    }
}

/// Create application router
pub async fn create_router(settings: Settings) -> Result<Router> {
    let max_request_size = settings.request.max_request_size;
    let cors = settings
        .security
        .cors_enabled
        .then(|| cors_layer(&settings.security.allowed_origins));

    let app_state = Arc::new(AppState::new(settings)?);

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(max_request_size));

    let mut router = Router::new()
        .route("/", get(pages::index))
        .route("/generate", post(pages::generate))
        .route("/reset", post(pages::reset))
        .route("/print", post(pages::print))
        .route("/api/generate", post(api::generate))
        .route("/api/probe", post(api::probe))
        .route("/api/proxy", post(proxy::forward_prompt))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .fallback(not_found)
        .with_state(app_state)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware_stack);

    if let Some(cors) = cors {
        router = router.layer(cors);
    }

    Ok(router)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
