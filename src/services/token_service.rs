//! Short-lived playback tokens.
//!
//! A token is `<payload>.<signature>`, both URL-safe base64 without padding.
//! The payload is the JSON claims `{ "ref": <reference>, "iat": <unix secs> }`
//! and the signature is HMAC-SHA256 over the encoded payload. Expiry is not
//! stored in the token: it is `iat + ttl` using the verifier's configured TTL.
//!
//! Tokens are not consumed on verification. A valid token can be redeemed any
//! number of times until it expires.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::config::TokenConfig;
use crate::constants::tokens::MIN_SECRET_LEN;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token signing is misconfigured: {0}")]
    Configuration(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid or expired token")]
    InvalidToken,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "ref")]
    reference: String,
    iat: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub struct TokenService {
    secret: Option<String>,
    ttl: Duration,
}

impl TokenService {
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        let ttl_seconds = i64::try_from(config.ttl_seconds).unwrap_or(i64::MAX);
        Self {
            secret: config.signing_secret.clone(),
            ttl: Duration::try_seconds(ttl_seconds).unwrap_or(Duration::MAX),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fails with a configuration error when no usable secret is set.
    pub fn ensure_configured(&self) -> Result<(), TokenError> {
        self.mac().map(|_| ())
    }

    pub fn issue(&self, reference: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(reference, Utc::now())
    }

    pub fn issue_at(
        &self,
        reference: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let mac = self.mac()?;

        if reference.is_empty() {
            return Err(TokenError::Validation("reference is required".to_string()));
        }

        let claims = Claims {
            reference: reference.to_string(),
            iat: now.timestamp(),
        };
        let payload = serde_json::to_vec(&claims)
            .map_err(|e| TokenError::Configuration(format!("cannot encode claims: {e}")))?;
        let payload = URL_SAFE_NO_PAD.encode(payload);

        let signature = sign(mac, payload.as_bytes());
        let issued_at = DateTime::from_timestamp(claims.iat, 0).unwrap_or(now);

        metrics::counter!("tokens_issued_total").increment(1);

        Ok(IssuedToken {
            token: format!("{payload}.{signature}"),
            issued_at,
            expires_at: issued_at
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        })
    }

    /// Returns the embedded reference if the signature checks out and the
    /// token has not yet expired.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let mac = self.mac()?;

        let result = self.check(mac, token.trim(), now);
        if result.is_err() {
            metrics::counter!("tokens_rejected_total").increment(1);
        }
        result
    }

    fn check(
        &self,
        mut mac: HmacSha256,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::InvalidToken)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::InvalidToken)?;

        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidToken)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::InvalidToken)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::InvalidToken)?;

        let expires_at = DateTime::from_timestamp(claims.iat, 0)
            .and_then(|issued_at| issued_at.checked_add_signed(self.ttl))
            .ok_or(TokenError::InvalidToken)?;
        if now >= expires_at {
            return Err(TokenError::InvalidToken);
        }

        Ok(claims.reference)
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        let secret = self
            .secret
            .as_deref()
            .ok_or_else(|| TokenError::Configuration("signing secret is not set".to_string()))?;

        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenError::Configuration(format!(
                "signing secret must be at least {MIN_SECRET_LEN} characters"
            )));
        }

        HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| TokenError::Configuration(e.to_string()))
    }
}

fn sign(mut mac: HmacSha256, payload: &[u8]) -> String {
    mac.update(payload);
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}
