//! Raw prompt proxy
//!
//! Sends a caller-built prompt to the Messages API and returns the
//! provider's JSON untouched

use crate::handlers::AppState;
use crate::middleware::ResolvedCredential;
use crate::models::anthropic::MessagesRequest;
use crate::utils::error::{helpers::validation_error, AppResult};
use crate::utils::logging::create_request_log_summary;
use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Proxy request body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub prompt: String,
}

/// Forward a prompt
///
/// POST /api/proxy
pub async fn forward_prompt(
    State(state): State<Arc<AppState>>,
    resolved: ResolvedCredential,
    Json(request): Json<ProxyRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let credential = resolved
        .or_submitted(&request.api_key)?
        .ok_or_else(|| validation_error("API key is required"))?;

    if request.prompt.trim().is_empty() {
        return Err(validation_error("Prompt is required"));
    }

    let message = MessagesRequest::single_prompt(
        &state.settings.generation.model,
        state.settings.generation.max_tokens,
        request.prompt,
    );

    let log_summary = create_request_log_summary(&message);
    if let Ok(summary_json) = serde_json::to_string_pretty(&log_summary) {
        debug!("📥 Proxied request:\n{}", summary_json);
    }

    let body = serde_json::to_value(&message)?;
    let response = state.client.forward_raw(&credential, &body).await?;

    Ok(Json(response))
}
