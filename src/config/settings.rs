//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use crate::services::prompt::TemplateVariant;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Anthropic API configuration
    pub anthropic: AnthropicConfig,
    /// Lesson generation configuration
    pub generation: GenerationConfig,
    /// Token pricing used for cost estimates
    pub pricing: PricingConfig,
    /// Request configuration
    pub request: RequestConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// Anthropic API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// Default API key used when the browser has none saved (optional)
    #[serde(skip_serializing)]
    pub default_api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Protocol version header value
    pub version: String,
    /// Send the direct browser access header
    pub browser_access: bool,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Timeout for each model probe in seconds
    pub probe_timeout: u64,
}

impl std::fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("default_api_key", &self.default_api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("browser_access", &self.browser_access)
            .field("timeout", &self.timeout)
            .field("probe_timeout", &self.probe_timeout)
            .finish()
    }
}

/// Lesson generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model identifier sent to the provider
    pub model: String,
    /// Output token ceiling
    pub max_tokens: u32,
    /// Prompt template variant
    pub template: TemplateVariant,
    /// Models tried, in order, by the credential probe
    pub probe_models: Vec<String>,
}

/// Token pricing configuration (USD per million tokens)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
}

/// Request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Maximum request size in bytes
    pub max_request_size: usize,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowed origins for CORS
    pub allowed_origins: Vec<String>,
    /// Whether CORS is enabled
    pub cors_enabled: bool,
    /// Mark the credential cookie as Secure (HTTPS only)
    pub secure_cookies: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Settings {
    /// Create a new configuration instance from the process environment
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    ///
    /// Every key is optional; missing keys fall back to their defaults.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let settings = Self {
            server: ServerConfig {
                host: get("SERVER_HOST", "127.0.0.1"),
                port: get("SERVER_PORT", "8080")
                    .parse()
                    .context("Invalid port number")?,
            },
            anthropic: AnthropicConfig {
                default_api_key: lookup("ANTHROPIC_API_KEY")
                    .map(|key| key.trim().to_string())
                    .filter(|key| !key.is_empty()),
                base_url: get("ANTHROPIC_BASE_URL", "https://api.anthropic.com/v1")
                    .trim_end_matches('/')
                    .to_string(),
                version: get("ANTHROPIC_VERSION", "2023-06-01"),
                browser_access: get("ANTHROPIC_BROWSER_ACCESS", "true")
                    .parse()
                    .context("Invalid browser access flag")?,
                timeout: get("REQUEST_TIMEOUT", "120")
                    .parse()
                    .context("Invalid timeout value")?,
                probe_timeout: get("PROBE_TIMEOUT", "10")
                    .parse()
                    .context("Invalid probe timeout value")?,
            },
            generation: GenerationConfig {
                model: get("ANTHROPIC_MODEL", "claude-3-haiku-20240307"),
                max_tokens: get("MAX_OUTPUT_TOKENS", "4096")
                    .parse()
                    .context("Invalid max output tokens")?,
                template: get("PROMPT_TEMPLATE", "complete")
                    .parse()
                    .context("Invalid prompt template")?,
                probe_models: get(
                    "PROBE_MODELS",
                    "claude-3-5-sonnet-20241022,claude-3-5-sonnet-20240620,claude-3-opus-20240229,claude-3-haiku-20240307",
                )
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            },
            pricing: PricingConfig {
                input_per_mtok: get("INPUT_PRICE_PER_MTOK", "0.25")
                    .parse()
                    .context("Invalid input token price")?,
                output_per_mtok: get("OUTPUT_PRICE_PER_MTOK", "1.25")
                    .parse()
                    .context("Invalid output token price")?,
            },
            request: RequestConfig {
                max_request_size: get("MAX_REQUEST_SIZE", "1048576")
                    .parse()
                    .context("Invalid maximum request size")?,
            },
            security: SecurityConfig {
                allowed_origins: get("ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
                cors_enabled: get("CORS_ENABLED", "true")
                    .parse()
                    .context("Invalid CORS enabled flag")?,
                secure_cookies: get("SECURE_COOKIES", "false")
                    .parse()
                    .context("Invalid secure cookies flag")?,
            },
            logging: LoggingConfig {
                level: get("RUST_LOG", "info"),
                format: get("LOG_FORMAT", "text"),
            },
        };

        // Validate configuration
        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    fn validate(&self) -> Result<()> {
        // Validate port range
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        // A configured default key must look like a key
        if let Some(key) = &self.anthropic.default_api_key {
            if key.contains(char::is_whitespace) {
                anyhow::bail!("ANTHROPIC_API_KEY cannot contain whitespace characters");
            }
            if key.len() < 8 {
                anyhow::bail!("ANTHROPIC_API_KEY must be at least 8 characters long");
            }
        }

        // Validate URL format
        if !self.anthropic.base_url.starts_with("http") {
            anyhow::bail!("Invalid Anthropic base URL format, should start with 'http'");
        }

        if self.anthropic.timeout == 0 || self.anthropic.probe_timeout == 0 {
            anyhow::bail!("Timeout values cannot be 0");
        }

        if self.generation.model.trim().is_empty() {
            anyhow::bail!("Model identifier cannot be empty");
        }

        if self.generation.max_tokens == 0 {
            anyhow::bail!("Max output tokens cannot be 0");
        }

        let prices = [self.pricing.input_per_mtok, self.pricing.output_per_mtok];
        if prices.iter().any(|p| !p.is_finite() || *p < 0.0) {
            anyhow::bail!("Token prices must be finite and non-negative");
        }

        // Validate request size limit
        if self.request.max_request_size == 0 {
            anyhow::bail!("Maximum request size cannot be 0");
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        // Validate log format
        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }

    /// Check if in development mode
    pub fn is_dev_mode(&self) -> bool {
        self.logging.level == "debug" || self.logging.level == "trace"
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            anthropic: AnthropicConfig {
                default_api_key: None,
                base_url: "https://api.anthropic.com/v1".to_string(),
                version: "2023-06-01".to_string(),
                browser_access: true,
                timeout: 120,
                probe_timeout: 10,
            },
            generation: GenerationConfig {
                model: "claude-3-haiku-20240307".to_string(),
                max_tokens: 4096,
                template: TemplateVariant::Complete,
                probe_models: vec!["claude-3-haiku-20240307".to_string()],
            },
            pricing: PricingConfig {
                input_per_mtok: 0.25,
                output_per_mtok: 1.25,
            },
            request: RequestConfig {
                max_request_size: 1024 * 1024,
            },
            security: SecurityConfig {
                allowed_origins: vec!["*".to_string()],
                cors_enabled: true,
                secure_cookies: false,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "text".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_source(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.generation.model, "claude-3-haiku-20240307");
        assert_eq!(settings.generation.max_tokens, 4096);
        assert_eq!(settings.generation.template, TemplateVariant::Complete);
        assert_eq!(settings.anthropic.version, "2023-06-01");
        assert!(settings.anthropic.default_api_key.is_none());
        assert_eq!(settings.pricing.input_per_mtok, 0.25);
        assert_eq!(settings.pricing.output_per_mtok, 1.25);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let settings = settings_from(&[("ANTHROPIC_BASE_URL", "http://localhost:9000/v1/")]).unwrap();
        assert_eq!(settings.anthropic.base_url, "http://localhost:9000/v1");
    }

    #[test]
    fn test_blank_default_key_is_ignored() {
        let settings = settings_from(&[("ANTHROPIC_API_KEY", "   ")]).unwrap();
        assert!(settings.anthropic.default_api_key.is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let settings = settings_from(&[("ANTHROPIC_API_KEY", "sk-ant-secret-value")]).unwrap();
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("sk-ant-secret-value"));
        assert!(rendered.contains("<redacted>"));
    }
}
