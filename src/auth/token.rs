//! Signed session cookie tokens
//!
//! The cookie does not carry session state, only the opaque session id,
//! wrapped in an HMAC-SHA256 signed JWT. Timeout enforcement happens
//! server-side against the session store; the token's `exp` claim mirrors
//! the max-session-duration ceiling as a coarse outer bound.

use crate::error::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by the session cookie
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Opaque session id into the server-side session store
    pub sid: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time, login + max session duration
    pub exp: i64,
}

/// Sign a session id into a cookie token
pub fn issue_token(
    session_id: &str,
    secret: &str,
    max_duration: chrono::Duration,
) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        sid: session_id.to_string(),
        iat: now,
        exp: now + max_duration.num_seconds(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Validate a cookie token and return its claims
pub fn decode_token(token: &str, secret: &str) -> Result<SessionClaims> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_issue_and_decode() {
        let token = issue_token("abc-123", SECRET, chrono::Duration::hours(8))
            .expect("Failed to issue token");
        let claims = decode_token(&token, SECRET).expect("Failed to decode token");

        assert_eq!(claims.sid, "abc-123");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token("abc-123", SECRET, chrono::Duration::hours(8)).unwrap();
        assert!(decode_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(decode_token("not.a.token", SECRET).is_err());
        assert!(decode_token("", SECRET).is_err());
    }
}
