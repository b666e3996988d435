//! Credential handling tests

use friendlyteacher::middleware::credential::{
    credential_cookie, remember_credential, resolve_credential, stored_credential, CREDENTIAL_COOKIE,
};
use friendlyteacher::models::credential::{validate_token_format, Credential};
use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;

fn jar_with(value: &str) -> CookieJar {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        format!("other=1; {}={}", CREDENTIAL_COOKIE, value).parse().unwrap(),
    );
    CookieJar::from_headers(&headers)
}

#[test]
fn test_token_format_rules() {
    assert!(validate_token_format("sk-ant-REDACTED"));
    assert!(!validate_token_format("1234567"));
    assert!(!validate_token_format("sk-ant with-space"));
    assert!(!validate_token_format("sk-ant\nnewline"));
}

#[test]
fn test_fingerprint_is_short_prefix() {
    let credential = Credential::parse("sk-ant-REDACTED").unwrap();
    let fingerprint = credential.fingerprint();

    assert!(fingerprint.starts_with("key_sk-ant-api"));
    assert!(!fingerprint.contains("abcdefghijklmnop"));
}

#[test]
fn test_cookie_is_read_among_others() {
    let stored = stored_credential(&jar_with("sk-ant-from-cookie")).unwrap();
    assert_eq!(stored.expose(), "sk-ant-from-cookie");
}

#[test]
fn test_submitted_key_wins_over_cookie_and_default() {
    let jar = jar_with("sk-ant-from-cookie");
    let default = Credential::parse("sk-ant-from-default").unwrap();
    let submitted = Credential::parse("sk-ant-from-form");

    let resolved = resolve_credential(submitted, &jar, Some(&default)).unwrap();
    assert_eq!(resolved.expose(), "sk-ant-from-form");

    let resolved = resolve_credential(None, &jar, Some(&default)).unwrap();
    assert_eq!(resolved.expose(), "sk-ant-from-cookie");
}

#[test]
fn test_changed_key_replaces_cookie() {
    let jar = jar_with("sk-ant-old-key-1");
    let fresh = Credential::parse("sk-ant-new-key-2").unwrap();

    let jar = remember_credential(jar, Some(&fresh), true);
    let cookie = jar.get(CREDENTIAL_COOKIE).unwrap();
    assert_eq!(cookie.value(), "sk-ant-new-key-2");
}

#[test]
fn test_cookie_header_rendering() {
    let credential = Credential::parse("sk-ant-render-key").unwrap();
    let rendered = credential_cookie(&credential, false).to_string();

    assert!(rendered.starts_with("friendlyteacher_api_key=sk-ant-render-key"));
    assert!(rendered.contains("HttpOnly"));
    assert!(rendered.contains("SameSite=Strict"));
    assert!(rendered.contains("Path=/"));
    assert!(rendered.contains("Max-Age=31536000"));
    assert!(!rendered.contains("Secure"));
}
