use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{ApiError, AppState};

type HmacSha256 = Hmac<Sha256>;

const KEY_COMPARE_DOMAIN: &[u8] = b"anicatalog-admin-key";

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("X-Api-Key")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty())
}

/// Constant-time key comparison: both keys are MACed under a fixed key and
/// the tags are checked with `verify_slice`.
fn keys_match(presented: &str, expected: &str) -> bool {
    let Ok(mut expected_mac) = HmacSha256::new_from_slice(KEY_COMPARE_DOMAIN) else {
        return false;
    };
    expected_mac.update(expected.as_bytes());
    let expected_tag = expected_mac.finalize().into_bytes();

    let Ok(mut presented_mac) = HmacSha256::new_from_slice(KEY_COMPARE_DOMAIN) else {
        return false;
    };
    presented_mac.update(presented.as_bytes());
    presented_mac.verify_slice(&expected_tag).is_ok()
}

/// Checks the admin key for write endpoints.
///
/// The endpoints behave as absent while no non-empty admin key is configured.
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = state
        .config()
        .server
        .admin_api_key
        .as_deref()
        .filter(|k| !k.is_empty())
    else {
        return Err(ApiError::NotFound("Not found".to_string()));
    };

    match extract_api_key(headers) {
        Some(key) if keys_match(key, expected) => Ok(()),
        Some(_) => Err(ApiError::unauthorized("Invalid API key")),
        None => Err(ApiError::unauthorized("Missing X-Api-Key header")),
    }
}
