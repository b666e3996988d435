//! JSON API handlers

use crate::handlers::AppState;
use crate::middleware::ResolvedCredential;
use crate::models::lesson::LessonForm;
use crate::services::orchestrator::Lesson;
use crate::utils::error::{helpers::validation_error, AppResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Generate a lesson as JSON
///
/// POST /api/generate
///
/// Body: `{apiKey?, topic, ageGroup, pages?}`. The key may also come from
/// the `x-api-key` header, the credential cookie or the default key.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    resolved: ResolvedCredential,
    Json(form): Json<LessonForm>,
) -> AppResult<Json<Lesson>> {
    debug!("Received JSON lesson request");

    let credential = resolved.or_submitted(&form.api_key)?;
    let lesson = state.orchestrator.generate(credential.as_ref(), &form).await?;

    Ok(Json(lesson))
}

/// Probe request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeRequest {
    #[serde(default)]
    pub api_key: String,
    /// Candidate models; the configured list is used when empty
    #[serde(default)]
    pub models: Vec<String>,
}

/// Outcome for one candidate model
#[derive(Debug, Serialize, Deserialize)]
pub struct ProbeResult {
    pub model: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    /// First model that accepted the key
    pub working_model: Option<String>,
    pub results: Vec<ProbeResult>,
}

/// Check which model a key can use
///
/// POST /api/probe
///
/// Candidates are tried in order with a 10-token request; probing stops at
/// the first model that answers.
pub async fn probe(
    State(state): State<Arc<AppState>>,
    resolved: ResolvedCredential,
    Json(request): Json<ProbeRequest>,
) -> AppResult<Json<ProbeReport>> {
    let credential = resolved
        .or_submitted(&request.api_key)?
        .ok_or_else(|| validation_error("API key is required"))?;

    let candidates = if request.models.is_empty() {
        state.settings.generation.probe_models.clone()
    } else {
        request.models
    };

    info!(
        "Probing {} model(s) for {}",
        candidates.len(),
        credential.fingerprint()
    );

    let mut results = Vec::with_capacity(candidates.len());
    let mut working_model = None;

    for model in candidates {
        match state.client.probe_model(&credential, &model).await? {
            Ok(()) => {
                results.push(ProbeResult {
                    model: model.clone(),
                    ok: true,
                    error: None,
                });
                working_model = Some(model);
                break;
            }
            Err(reason) => results.push(ProbeResult {
                model,
                ok: false,
                error: Some(reason),
            }),
        }
    }

    if working_model.is_none() {
        warn!("No working model found for {}", credential.fingerprint());
    }

    Ok(Json(ProbeReport {
        working_model,
        results,
    }))
}
