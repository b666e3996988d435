//! Middleware module
//!
//! Request logging and credential resolution

pub mod credential;
pub mod logging;

pub use credential::{ResolvedCredential, CREDENTIAL_COOKIE};
pub use logging::request_logging_middleware;
