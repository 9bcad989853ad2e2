//! Auth Gateway
//! Mission: Answer "is this login valid" and "is this token valid, and for whom"

use crate::auth::{
    credentials::{hash_password, CredentialStore},
    jwt::TokenService,
    models::{IssuedToken, TokenVerification},
};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

/// Authentication failures surfaced to callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown user or wrong password; the two are indistinguishable
    InvalidCredentials,
    /// Malformed, expired or badly signed token
    InvalidToken(String),
    /// Token could not be signed
    Internal(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::InvalidToken(reason) => write!(f, "Invalid token: {}", reason),
            AuthError::Internal(reason) => write!(f, "Token issuance failed: {}", reason),
        }
    }
}

impl std::error::Error for AuthError {}

/// Orchestrates the credential store and token service
pub struct AuthGateway {
    credentials: CredentialStore,
    tokens: TokenService,
}

impl AuthGateway {
    pub fn new(credentials: CredentialStore, tokens: TokenService) -> Self {
        Self {
            credentials,
            tokens,
        }
    }

    /// Check `password` against the stored digest for `username` and issue a token
    pub fn authenticate(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let supplied = hash_password(password);

        let matches = self
            .credentials
            .lookup(username)
            .map(|stored| bool::from(stored.as_bytes().ct_eq(supplied.as_bytes())))
            .unwrap_or(false);

        if !matches {
            warn!(username, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self
            .tokens
            .issue(username)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        info!(username, "Login successful");
        Ok(issued)
    }

    /// Verify a session token and return the username it was issued to
    pub fn validate(&self, token: &str) -> Result<String, AuthError> {
        match self.tokens.verify(token) {
            TokenVerification::Valid(claims) => Ok(claims.username),
            TokenVerification::Invalid(reason) => Err(AuthError::InvalidToken(reason)),
        }
    }
}
