//! Test helpers.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::Token;

/// Build an unsigned token whose payload is `claims`.
///
/// The signature segment is a fixed placeholder; only the payload matters
/// to the client.
#[allow(clippy::expect_used)]
pub fn unsigned_token(claims: &serde_json::Value) -> Token {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    Token::new(format!("{header}.{payload}.c2lnbmF0dXJl")).expect("non-empty token")
}
