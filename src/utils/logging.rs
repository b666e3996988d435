//! Logging utilities
//!
//! Shared logging configuration and helper functions

use crate::config::settings::LoggingConfig;
use crate::models::anthropic::MessagesRequest;
use tracing::info;

/// Set to true to include full prompts in debug logs
/// Default is false to reduce log verbosity
pub const VERBOSE_REQUEST_LOGGING: bool = false;

/// Truncate a string with a note about original length
pub fn truncate_content(s: &str, max_len: usize) -> String {
    if VERBOSE_REQUEST_LOGGING || s.chars().count() <= max_len {
        return s.to_string();
    }

    let kept: String = s.chars().take(max_len).collect();
    format!("{}... ({} chars truncated)", kept, s.chars().count() - max_len)
}

/// Create a filtered summary of a Messages API request for logging
pub fn create_request_log_summary(request: &MessagesRequest) -> serde_json::Value {
    let messages: Vec<serde_json::Value> = request
        .messages
        .iter()
        .map(|msg| {
            serde_json::json!({
                "role": msg.role,
                "content": truncate_content(&msg.content, 200),
            })
        })
        .collect();

    serde_json::json!({
        "model": request.model,
        "max_tokens": request.max_tokens,
        "messages": messages,
    })
}

/// Initialize logging system
pub fn init_logging(config: &LoggingConfig) {
    let log_level = config.level.clone();

    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if config.format == "json" {
        // JSON format logs (production environment)
        Box::new(tracing_subscriber::fmt()
            .with_env_filter(log_level)
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .finish())
    } else {
        // Human readable format (development environment)
        Box::new(tracing_subscriber::fmt()
            .with_env_filter(log_level)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish())
    };

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Tracing subscriber already set, keeping the existing one");
        return;
    }

    info!("Logging system initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "ééééé";
        assert_eq!(truncate_content(text, 2), "éé... (3 chars truncated)");
        assert_eq!(truncate_content(text, 10), text);
    }

    #[test]
    fn test_request_summary_truncates_prompt() {
        let prompt = "x".repeat(500);
        let request = MessagesRequest::single_prompt("claude-3-haiku-20240307", 4096, prompt);
        let summary = create_request_log_summary(&request);

        let content = summary["messages"][0]["content"].as_str().unwrap();
        assert!(content.ends_with("(300 chars truncated)"));
        assert_eq!(summary["max_tokens"], 4096);
    }
}
