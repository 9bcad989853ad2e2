//! JWT Token Service
//! Mission: Issue and verify signed, time-limited session tokens

use crate::auth::models::{Claims, IssuedToken, TokenVerification};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Fixed lifetime of a session token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 3600;

const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Stateless token service. Validity depends only on signature and expiry.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    /// Create a token service signing with the given HMAC secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: TOKEN_TTL_SECS,
        }
    }

    /// Issue a token for `username`, expiring one TTL from now
    pub fn issue(&self, username: &str) -> Result<IssuedToken> {
        self.issue_at(username, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (UTC epoch seconds)
    pub fn issue_at(&self, username: &str, now: i64) -> Result<IssuedToken> {
        let expires_at = now
            .checked_add(self.ttl_secs)
            .context("Invalid timestamp")?;

        let claims = Claims {
            username: username.to_string(),
            exp: expires_at,
        };

        debug!(
            username,
            expires_at, "Issuing session token, expires in {}s", self.ttl_secs
        );

        let token = encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding_key)
            .context("Failed to generate JWT")?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature, algorithm and expiry against the current time
    pub fn verify(&self, token: &str) -> TokenVerification {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify as if the current time were `now`. A token is valid while `now < exp`.
    pub fn verify_at(&self, token: &str, now: i64) -> TokenVerification {
        // Expiry is checked below against the supplied clock, without leeway.
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!(error = %e, "Rejected session token");
                return TokenVerification::Invalid(e.to_string());
            }
        };

        if now >= claims.exp {
            debug!(username = %claims.username, exp = claims.exp, now, "Session token expired");
            return TokenVerification::Invalid("Signature has expired".to_string());
        }

        TokenVerification::Valid(claims)
    }
}
