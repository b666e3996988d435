//! Generation orchestrator
//!
//! Validates a lesson form, builds the prompt, calls the provider once and
//! turns the answer into a sanitized lesson with a cost summary.

use crate::config::Settings;
use crate::models::anthropic::MessagesRequest;
use crate::models::credential::Credential;
use crate::models::lesson::{AgeGroup, LessonForm, Presentation};
use crate::services::client::GenerationBackend;
use crate::services::cost::{CostSummary, Pricing};
use crate::services::prompt::PromptBuilder;
use crate::services::render::sanitize_article;
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::create_request_log_summary;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// A generated lesson ready for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub topic: String,
    pub age_group: AgeGroup,
    pub pages: u32,
    pub presentation: Presentation,
    /// Sanitized article HTML
    pub html: String,
    pub cost: Option<CostSummary>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

/// Single in-flight generation flag
#[derive(Debug, Default)]
pub struct BusyFlag {
    engaged: AtomicBool,
}

/// Releases the busy flag when dropped
#[derive(Debug)]
pub struct BusyGuard<'a> {
    flag: &'a BusyFlag,
}

impl BusyFlag {
    /// Engage the flag, or fail if a generation already holds it
    pub fn try_engage(&self) -> AppResult<BusyGuard<'_>> {
        self.engaged
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard { flag: self })
            .map_err(|_| AppError::Busy)
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::Acquire)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.engaged.store(false, Ordering::Release);
    }
}

/// Lesson generation orchestrator
#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn GenerationBackend>,
    prompts: PromptBuilder,
    pricing: Pricing,
    model: String,
    max_tokens: u32,
    busy: Arc<BusyFlag>,
}

impl Orchestrator {
    pub fn new(settings: &Settings, backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            prompts: PromptBuilder::new(settings.generation.template),
            pricing: Pricing::from(&settings.pricing),
            model: settings.generation.model.clone(),
            max_tokens: settings.generation.max_tokens,
            busy: Arc::new(BusyFlag::default()),
        }
    }

    /// Whether a generation is currently running
    pub fn is_busy(&self) -> bool {
        self.busy.is_engaged()
    }

    /// Run one generation
    ///
    /// Validation failures return before the busy flag is touched. Once
    /// engaged, the flag is released on every exit path by the guard.
    pub async fn generate(&self, credential: Option<&Credential>, form: &LessonForm) -> AppResult<Lesson> {
        let request = form.validate(credential)?;
        let credential = credential.ok_or_else(|| AppError::Internal("credential vanished after validation".to_string()))?;

        let _busy = self.busy.try_engage()?;

        info!(
            "Generating lesson: topic={:?}, age_group={}, pages={}, credential={}",
            request.topic,
            request.age_group,
            request.pages,
            credential.fingerprint()
        );

        let prompt = self.prompts.for_request(&request);
        let message = MessagesRequest::single_prompt(&self.model, self.max_tokens, prompt);

        let log_summary = create_request_log_summary(&message);
        if let Ok(summary_json) = serde_json::to_string_pretty(&log_summary) {
            debug!("📥 Outbound request:\n{}", summary_json);
        }
        let response = self
            .backend
            .create_message(credential, &message)
            .await
            .map_err(|e| {
                error!("Lesson generation failed: {}", e);
                e
            })?;

        let text = response.text().ok_or_else(|| {
            error!("Provider response contained no text content");
            AppError::provider(502, None, Some("The model returned an empty answer".to_string()))
        })?;

        let cost = self.pricing.summarize(response.usage);
        info!(
            "Lesson generated: input_tokens={}, output_tokens={}, cost=${}",
            cost.input_tokens,
            cost.output_tokens,
            cost.formatted_cost()
        );

        Ok(Lesson {
            topic: request.topic,
            age_group: request.age_group,
            pages: request.pages,
            presentation: request.age_group.presentation(),
            html: sanitize_article(&text),
            cost: Some(cost),
            model: if response.model.is_empty() { self.model.clone() } else { response.model },
            stop_reason: response.stop_reason,
        })
    }
}
