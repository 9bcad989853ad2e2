//! Authentication Models
//! Mission: Define credential, token and login data structures

use serde::{Deserialize, Serialize};

/// Stored credential record (one entry of the users file)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub username: String,
    pub password_hash: String, // hex-encoded SHA-256
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub username: String,
    pub exp: i64, // absolute expiry, UTC epoch seconds
}

/// Token freshly minted by the token service
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// Outcome of verifying a session token. Always definite, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenVerification {
    Valid(Claims),
    Invalid(String),
}

impl TokenVerification {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenVerification::Valid(_))
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            TokenVerification::Valid(claims) => Some(&claims.username),
            TokenVerification::Invalid(_) => None,
        }
    }
}

/// Authenticated caller, inserted into request extensions by the auth middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Login request body. Missing or null fields fail authentication.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Serialize)]
#[serde(tag = "login_status", rename_all = "lowercase")]
pub enum LoginResponse {
    Success { username: String, token: String },
    Fail { message: String },
}

/// Token validation request body. Any JSON value is accepted for `token`;
/// only a string can validate.
#[derive(Debug, Default, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub token: Option<serde_json::Value>,
}

/// Token validation response
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub token_validated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}
