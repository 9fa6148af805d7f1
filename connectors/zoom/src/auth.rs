use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Credentials;
use crate::error::{Result, ZoomError};

/// Claims carried by a Zoom API JWT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// API key of the account the token acts for
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(api_key: &str, ttl_seconds: i64, now: DateTime<Utc>) -> Self {
        Self {
            iss: api_key.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

/// Mints a fresh signed token. Callers request one immediately before every
/// remote call; tokens are never cached.
pub fn issue_token(
    credentials: &Credentials,
    algorithm: Algorithm,
    ttl_seconds: i64,
) -> Result<String> {
    issue_token_at(credentials, algorithm, ttl_seconds, Utc::now())
}

pub fn issue_token_at(
    credentials: &Credentials,
    algorithm: Algorithm,
    ttl_seconds: i64,
    now: DateTime<Utc>,
) -> Result<String> {
    let claims = Claims::new(&credentials.api_key, ttl_seconds, now);
    let key = EncodingKey::from_secret(credentials.api_secret.as_bytes());

    Ok(encode(&Header::new(algorithm), &claims, &key)?)
}

/// Verifies the signature of `token` and rejects it once `now` has reached
/// its expiry. Expiry is checked against the supplied clock with no leeway.
pub fn validate_token_at(
    token: &str,
    secret: &str,
    algorithm: Algorithm,
    now: DateTime<Utc>,
) -> Result<Claims> {
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    validation.leeway = 0;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)?;
    let claims = data.claims;

    if claims.is_expired_at(now) {
        return Err(ZoomError::Authentication(format!(
            "Token expired at {}",
            claims.exp
        )));
    }

    Ok(claims)
}
