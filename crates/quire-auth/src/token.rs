//! Bearer tokens and their decoded claims.
//!
//! The notes server signs its tokens; the client never verifies them. The
//! payload is decoded only to learn who is signed in (role, tenant) so the
//! presentation layer can decide which actions to offer.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use quire_core::Role;

use crate::AuthError;

// ============================================================================
// Token
// ============================================================================

/// An opaque bearer token issued by the notes server.
///
/// `Debug` output is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wrap a raw token string. Blank strings are rejected.
    pub fn new(raw: impl Into<String>) -> Result<Self, AuthError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AuthError::MissingToken);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw token, for the `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the payload of the token without checking its signature.
    ///
    /// Payloads encoded with the standard base64 alphabet (or padded) are
    /// accepted through a second, plain decoding pass.
    pub fn claims(&self) -> Result<Claims, AuthError> {
        let segments: Vec<&str> = self.0.split('.').collect();
        if segments.len() != 3 {
            return Err(AuthError::InvalidFormat(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        }

        match decode::<Claims>(&self.0, &DecodingKey::from_secret(&[]), &unverified()) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::Base64(_) => {
                    log::debug!("Token payload is not URL-safe base64, retrying: {e}");
                    let bytes = decode_segment(segments[1])?;
                    serde_json::from_slice(&bytes).map_err(|e| {
                        AuthError::InvalidFormat(format!("payload is not a JSON object: {e}"))
                    })
                }
                _ => Err(AuthError::InvalidFormat(e.to_string())),
            },
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Validation that only parses: the server is the one that checks
/// signatures and expiry.
fn unverified() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

/// Decode a base64 segment, accepting either alphabet and optional padding.
fn decode_segment(segment: &str) -> Result<Vec<u8>, AuthError> {
    let unpadded = segment.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(unpadded)
        .or_else(|_| STANDARD_NO_PAD.decode(unpadded))
        .map_err(|e| AuthError::InvalidFormat(format!("payload is not base64: {e}")))
}

// ============================================================================
// Claims
// ============================================================================

/// Claims carried in the token payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Role within the tenant.
    #[serde(default)]
    pub role: Option<Role>,
    /// Tenant slug, used to address the upgrade endpoint.
    #[serde(default)]
    pub tenant: Option<String>,
    /// Signed-in user's email.
    #[serde(default)]
    pub email: Option<String>,
    /// Server-side user id (number or string, server dependent).
    #[serde(default, rename = "userId")]
    pub user_id: Option<serde_json::Value>,
    /// Expiry, seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issued-at, seconds since the Unix epoch.
    #[serde(default)]
    pub iat: Option<i64>,
    /// Remaining claims.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// The role claim; a token without one is treated as a plain member.
    pub fn role(&self) -> Role {
        self.role.clone().unwrap_or_default()
    }

    /// The tenant slug, required for tenant-level actions.
    pub fn tenant(&self) -> Result<&str, AuthError> {
        self.tenant
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingClaim("tenant"))
    }

    /// Expiry as a timestamp, if the token carries one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Issue time as a timestamp, if the token carries one.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Whether the token has expired at `now`. Tokens without `exp` never do.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}
