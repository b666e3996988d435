//! HTTP client service
//!
//! Encapsulates HTTP communication with the Anthropic Messages API

use crate::config::settings::AnthropicConfig;
use crate::models::anthropic::{ErrorEnvelope, MessagesRequest, MessagesResponse};
use crate::models::credential::Credential;
use crate::utils::error::{AppError, AppResult, ErrorContext};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Text generation backend
///
/// The orchestrator talks to the provider only through this trait.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send one Messages API request
    async fn create_message(
        &self,
        credential: &Credential,
        request: &MessagesRequest,
    ) -> AppResult<MessagesResponse>;
}

/// Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    /// Create a new client instance
    pub fn new(config: AnthropicConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("friendlyteacher/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.config.base_url)
    }

    /// Forward a request body untouched and hand back the provider's JSON
    pub async fn forward_raw(
        &self,
        credential: &Credential,
        body: &serde_json::Value,
    ) -> AppResult<serde_json::Value> {
        debug!("Forwarding raw Messages API request");

        let response = self.post(credential, body, None).await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::provider_error(response).await)
        }
    }

    /// Try a tiny request against one model
    ///
    /// The inner `Err` carries why the model could not be used: the provider's
    /// refusal, a timeout or a transport failure. Probes use their own short
    /// timeout so one stalled model does not hold up the rest.
    pub async fn probe_model(&self, credential: &Credential, model: &str) -> AppResult<Result<(), String>> {
        let request = MessagesRequest::single_prompt(model, 10, "Hi");
        let timeout = Duration::from_secs(self.config.probe_timeout);

        match self.send_message(credential, &request, Some(timeout)).await {
            Ok(_) => {
                info!("Model probe succeeded: {}", model);
                Ok(Ok(()))
            }
            Err(AppError::Provider { status, message, .. }) => {
                warn!("Model probe failed: {} - {} {}", model, status, message);
                Ok(Err(format!("{}: {}", status.as_u16(), message)))
            }
            Err(e @ (AppError::Timeout | AppError::HttpClient(_))) => {
                warn!("Model probe failed: {} - {}", model, e);
                Ok(Err(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        credential: &Credential,
        body: &T,
        timeout: Option<Duration>,
    ) -> AppResult<Response> {
        let mut builder = self
            .client
            .post(self.messages_url())
            .header("Content-Type", "application/json")
            .header("x-api-key", credential.expose())
            .header("anthropic-version", &self.config.version);

        if self.config.browser_access {
            builder = builder.header("anthropic-dangerous-direct-browser-access", "true");
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        builder.json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout
            } else {
                error!("Failed to send request: {}", e);
                AppError::HttpClient(e)
            }
        })
    }

    /// Send a Messages API request; `timeout` overrides the client default
    async fn send_message(
        &self,
        credential: &Credential,
        request: &MessagesRequest,
        timeout: Option<Duration>,
    ) -> AppResult<MessagesResponse> {
        debug!(
            "Sending Messages API request: model={}, max_tokens={}",
            request.model, request.max_tokens
        );

        let response = self.post(credential, request, timeout).await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Self::provider_error(response).await);
        }

        let body = response.text().await?;
        let parsed: MessagesResponse =
            serde_json::from_str(&body).internal_context("Unexpected Messages API response")?;

        debug!("Messages API request completed successfully");
        Ok(parsed)
    }

    /// Turn a non-success response into a provider error
    async fn provider_error(response: Response) -> AppError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let envelope = ErrorEnvelope::from_body(&body);

        error!(
            "Anthropic API error ({}): {}: {}",
            status,
            envelope.error_type().unwrap_or_else(|| "unknown".to_string()),
            envelope.message().unwrap_or_else(|| body.chars().take(200).collect())
        );

        AppError::provider(status, envelope.error_type(), envelope.message())
    }
}

#[async_trait]
impl GenerationBackend for AnthropicClient {
    async fn create_message(
        &self,
        credential: &Credential,
        request: &MessagesRequest,
    ) -> AppResult<MessagesResponse> {
        self.send_message(credential, request, None).await
    }
}
