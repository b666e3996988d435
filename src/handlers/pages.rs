//! Browser page handlers
//!
//! Server-rendered form, output, reset and print views

use crate::handlers::AppState;
use crate::middleware::credential::{remember_credential, resolve_credential, stored_credential};
use crate::models::credential::Credential;
use crate::models::lesson::{AgeGroup, LessonForm};
use crate::services::render::FormStatus;
use crate::utils::error::{AppError, AppResult};
use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Article posted back for printing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintForm {
    #[serde(default)]
    pub topic: String,
    pub age_group: String,
    pub article: String,
}

fn has_saved_key(state: &AppState, jar: &CookieJar) -> bool {
    state.default_credential.is_some() || stored_credential(jar).is_some()
}

fn form_page(state: &AppState, jar: &CookieJar, form: &LessonForm, error: Option<&str>) -> AppResult<String> {
    let status = FormStatus {
        has_saved_key: has_saved_key(state, jar),
        busy: state.orchestrator.is_busy(),
        error,
    };
    state.renderer.form_page(form, status)
}

/// Re-render the form with the failure in the error banner
fn form_error(state: &AppState, jar: CookieJar, form: &LessonForm, error: AppError) -> Response {
    warn!("Generation failed, returning to form: {}", error);
    let status = error.status_code();
    let message = error.to_string();
    match form_page(state, &jar, form, Some(&message)) {
        Ok(html) => (status, jar, Html(html)).into_response(),
        Err(render_error) => render_error.into_response(),
    }
}

/// Lesson form
///
/// GET /
pub async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Html<String>> {
    debug!("Rendering lesson form");
    Ok(Html(form_page(&state, &jar, &LessonForm::default(), None)?))
}

/// Form submit
///
/// POST /generate
///
/// Shows the output view on success. Any failure re-renders the form with
/// the message in the error banner and the failure's status code. A typed
/// key that fails the format check is never swapped for the saved one.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LessonForm>,
) -> Response {
    let submitted = match Credential::from_submitted(&form.api_key) {
        Ok(submitted) => submitted,
        Err(e) => return form_error(&state, jar, &form, e),
    };
    let credential = resolve_credential(submitted.clone(), &jar, state.default_credential.as_ref());
    let jar = remember_credential(jar, submitted.as_ref(), state.settings.security.secure_cookies);

    let outcome = match state.orchestrator.generate(credential.as_ref(), &form).await {
        Ok(lesson) => state.renderer.output_page(&lesson),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(html) => (jar, Html(html)).into_response(),
        Err(e) => form_error(&state, jar, &form, e),
    }
}

/// Create another lesson
///
/// POST /reset
pub async fn reset(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LessonForm>,
) -> AppResult<Html<String>> {
    debug!("Resetting lesson form");
    Ok(Html(form_page(&state, &jar, &form.reset(), None)?))
}

/// Printable document
///
/// POST /print
pub async fn print(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PrintForm>,
) -> AppResult<Html<String>> {
    let age_group: AgeGroup = form.age_group.parse()?;
    debug!("Rendering print document for age group {}", age_group);

    Ok(Html(state.renderer.print_document(
        &form.topic,
        &form.article,
        age_group.presentation(),
    )?))
}
