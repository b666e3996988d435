//! Credential resolution
//!
//! Picks the API key for a request: explicit header, then the browser's
//! credential cookie, then the process-wide default. Only a missing key falls
//! through; a malformed one is rejected.

use crate::handlers::AppState;
use crate::models::credential::{Credential, INVALID_KEY_MESSAGE};
use crate::utils::error::{AppError, AppResult};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use tracing::debug;

/// Name of the cookie holding the browser's API key
pub const CREDENTIAL_COOKIE: &str = "friendlyteacher_api_key";

/// Header API clients may use instead of a body field
pub const API_KEY_HEADER: &str = "x-api-key";

const COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Key stored in the credential cookie, if it still parses
pub fn stored_credential(jar: &CookieJar) -> Option<Credential> {
    jar.get(CREDENTIAL_COOKIE)
        .and_then(|cookie| Credential::parse(cookie.value()))
}

/// Cookie persisting `credential` in the browser
pub fn credential_cookie(credential: &Credential, secure: bool) -> Cookie<'static> {
    Cookie::build((CREDENTIAL_COOKIE, credential.expose().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(time::Duration::days(COOKIE_MAX_AGE_DAYS))
        .build()
}

/// Add the credential cookie when the submitted key differs from the stored one
pub fn remember_credential(jar: CookieJar, submitted: Option<&Credential>, secure: bool) -> CookieJar {
    match submitted {
        Some(credential) if stored_credential(&jar).as_ref() != Some(credential) => {
            debug!("Storing new credential cookie for {}", credential.fingerprint());
            jar.add(credential_cookie(credential, secure))
        }
        _ => jar,
    }
}

/// First credential found, in resolution order
pub fn resolve_credential(
    submitted: Option<Credential>,
    jar: &CookieJar,
    default: Option<&Credential>,
) -> Option<Credential> {
    submitted
        .or_else(|| stored_credential(jar))
        .or_else(|| default.cloned())
}

/// Credential resolved from the `x-api-key` header, the cookie or the default key
///
/// Body fields are not visible here; handlers that accept a key in the body
/// give it precedence over this value. A malformed `x-api-key` header rejects
/// the request.
#[derive(Debug, Clone)]
pub struct ResolvedCredential(pub Option<Credential>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for ResolvedCredential {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let from_header = match parts.headers.get(API_KEY_HEADER) {
            Some(value) => {
                let raw = value
                    .to_str()
                    .map_err(|_| AppError::Validation(INVALID_KEY_MESSAGE.to_string()))?;
                Credential::from_submitted(raw)?
            }
            None => None,
        };
        let jar = CookieJar::from_headers(&parts.headers);

        Ok(Self(resolve_credential(
            from_header,
            &jar,
            state.default_credential.as_ref(),
        )))
    }
}

impl ResolvedCredential {
    /// Prefer a key submitted in the request body; a malformed one is an error
    pub fn or_submitted(self, submitted: &str) -> AppResult<Option<Credential>> {
        Ok(Credential::from_submitted(submitted)?.or(self.0))
    }
}
