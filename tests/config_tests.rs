//! Configuration module unit tests

use friendlyteacher::config::settings::Settings;
use friendlyteacher::services::prompt::TemplateVariant;
use std::collections::HashMap;

/// Build settings from a fixed set of variables
fn settings_from(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_source(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults_when_nothing_is_set() {
    let settings = settings_from(&[]).expect("defaults should validate");

    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.anthropic.base_url, "https://api.anthropic.com/v1");
    assert_eq!(settings.anthropic.version, "2023-06-01");
    assert!(settings.anthropic.browser_access);
    assert!(settings.anthropic.default_api_key.is_none());
    assert_eq!(settings.anthropic.timeout, 120);
    assert_eq!(settings.anthropic.probe_timeout, 10);
    assert_eq!(settings.generation.model, "claude-3-haiku-20240307");
    assert_eq!(settings.generation.max_tokens, 4096);
    assert_eq!(settings.generation.template, TemplateVariant::Complete);
    assert_eq!(settings.generation.probe_models.len(), 4);
    assert_eq!(settings.pricing.input_per_mtok, 0.25);
    assert_eq!(settings.pricing.output_per_mtok, 1.25);
    assert!(!settings.security.secure_cookies);
    assert_eq!(settings.logging.format, "text");
}

#[test]
fn test_overrides_are_applied() {
    let settings = settings_from(&[
        ("SERVER_HOST", "0.0.0.0"),
        ("SERVER_PORT", "3000"),
        ("ANTHROPIC_API_KEY", "  sk-ant-default-0123456789  "),
        ("ANTHROPIC_BASE_URL", "http://localhost:9999/v1/"),
        ("ANTHROPIC_BROWSER_ACCESS", "false"),
        ("ANTHROPIC_MODEL", "claude-3-5-sonnet-20241022"),
        ("MAX_OUTPUT_TOKENS", "2048"),
        ("PROMPT_TEMPLATE", "Structured"),
        ("PROBE_MODELS", "a-model, b-model,,"),
        ("INPUT_PRICE_PER_MTOK", "3"),
        ("OUTPUT_PRICE_PER_MTOK", "15"),
        ("ALLOWED_ORIGINS", "http://a.test, http://b.test"),
        ("SECURE_COOKIES", "true"),
        ("LOG_FORMAT", "json"),
    ])
    .unwrap();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 3000);
    assert_eq!(
        settings.anthropic.default_api_key.as_deref(),
        Some("sk-ant-default-0123456789")
    );
    assert_eq!(settings.anthropic.base_url, "http://localhost:9999/v1");
    assert!(!settings.anthropic.browser_access);
    assert_eq!(settings.generation.model, "claude-3-5-sonnet-20241022");
    assert_eq!(settings.generation.max_tokens, 2048);
    assert_eq!(settings.generation.template, TemplateVariant::Structured);
    assert_eq!(settings.generation.probe_models, vec!["a-model", "b-model"]);
    assert_eq!(settings.pricing.input_per_mtok, 3.0);
    assert_eq!(
        settings.security.allowed_origins,
        vec!["http://a.test", "http://b.test"]
    );
    assert!(settings.security.secure_cookies);
    assert_eq!(settings.logging.format, "json");
}

#[test]
fn test_invalid_values_are_rejected() {
    let cases: &[(&str, &str, &str)] = &[
        ("SERVER_PORT", "0", "Port number cannot be 0"),
        ("ANTHROPIC_BASE_URL", "ftp://example.com", "Invalid Anthropic base URL format"),
        ("REQUEST_TIMEOUT", "0", "Timeout values cannot be 0"),
        ("PROBE_TIMEOUT", "0", "Timeout values cannot be 0"),
        ("MAX_OUTPUT_TOKENS", "0", "Max output tokens cannot be 0"),
        ("ANTHROPIC_API_KEY", "short", "at least 8 characters"),
        ("INPUT_PRICE_PER_MTOK", "-1", "non-negative"),
        ("MAX_REQUEST_SIZE", "0", "Maximum request size cannot be 0"),
        ("RUST_LOG", "loud", "Invalid log level: loud"),
        ("LOG_FORMAT", "xml", "Invalid log format: xml"),
    ];

    for &(key, value, expected) in cases {
        let err = settings_from(&[(key, value)]).unwrap_err();
        assert!(
            format!("{:#}", err).contains(expected),
            "{}={} gave {:#}",
            key,
            value,
            err
        );
    }
}

#[test]
fn test_unparseable_values_are_rejected() {
    assert!(settings_from(&[("SERVER_PORT", "eighty")]).is_err());
    assert!(settings_from(&[("PROMPT_TEMPLATE", "fancy")]).is_err());
    assert!(settings_from(&[("CORS_ENABLED", "maybe")]).is_err());
}

#[test]
fn test_default_settings_match_empty_environment() {
    let from_env = settings_from(&[]).unwrap();
    let default = Settings::default();

    assert_eq!(from_env.server.port, default.server.port);
    assert_eq!(from_env.generation.model, default.generation.model);
    assert_eq!(from_env.generation.max_tokens, default.generation.max_tokens);
    assert_eq!(from_env.anthropic.base_url, default.anthropic.base_url);
}
