//! Provider credential
//!
//! The API key used to authenticate outbound generation requests

use crate::utils::error::{AppError, AppResult};
use std::fmt;

/// Message returned when a typed key fails the format check
pub const INVALID_KEY_MESSAGE: &str = "API key format is invalid";

/// An API key that passed the basic format check
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Parse a submitted key; blank or malformed input yields `None`
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim();
        validate_token_format(token).then(|| Credential(token.to_string()))
    }

    /// Parse a key the user typed or sent
    ///
    /// Blank input means no key was given. Anything else must pass the format
    /// check, so a mistyped key is reported instead of being replaced by a
    /// stored one.
    pub fn from_submitted(raw: &str) -> AppResult<Option<Self>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Self::parse(raw)
            .map(Some)
            .ok_or_else(|| AppError::Validation(INVALID_KEY_MESSAGE.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Short identifier safe for logs
    pub fn fingerprint(&self) -> String {
        let prefix: String = self.0.chars().take(10).collect();
        format!("key_{}…", prefix)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.fingerprint()).finish()
    }
}

/// Validate token format
pub fn validate_token_format(token: &str) -> bool {
    // Check minimum length
    if token.len() < 8 {
        return false;
    }

    // Check for invalid characters (spaces, newlines, etc.)
    !token.contains(char::is_whitespace)
}
