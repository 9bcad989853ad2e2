//! Authentication API Endpoints
//! Mission: Provide login and token validation endpoints

use crate::auth::{
    gateway::{AuthError, AuthGateway},
    models::{LoginRequest, LoginResponse, ValidateRequest, ValidateResponse},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub gateway: Arc<AuthGateway>,
}

impl AuthState {
    pub fn new(gateway: Arc<AuthGateway>) -> Self {
        Self { gateway }
    }
}

/// Login endpoint - POST /login
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthApiError> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    info!("Login attempt: {}", username);

    let issued = state
        .gateway
        .authenticate(&username, &password)
        .map_err(|e| match e {
            AuthError::InvalidCredentials => AuthApiError::InvalidCredentials,
            other => {
                error!(error = %other, "Login failed after credential check");
                AuthApiError::InternalError
            }
        })?;

    Ok(Json(LoginResponse::Success {
        username,
        token: issued.token,
    }))
}

/// Token validation endpoint - POST /validate
pub async fn validate(
    State(state): State<AuthState>,
    Json(payload): Json<ValidateRequest>,
) -> Response {
    let token = match payload.token {
        Some(Value::String(token)) => token,
        Some(_) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ValidateResponse {
                    token_validated: false,
                    exception: Some("Invalid token type. Token must be a string".to_string()),
                }),
            )
                .into_response();
        }
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ValidateResponse {
                    token_validated: false,
                    exception: None,
                }),
            )
                .into_response();
        }
    };

    match state.gateway.validate(&token) {
        Ok(_) => (
            StatusCode::OK,
            Json(ValidateResponse {
                token_validated: true,
                exception: None,
            }),
        )
            .into_response(),
        Err(e) => {
            let reason = match e {
                AuthError::InvalidToken(reason) => reason,
                other => other.to_string(),
            };
            (
                StatusCode::UNAUTHORIZED,
                Json(ValidateResponse {
                    token_validated: false,
                    exception: Some(reason),
                }),
            )
                .into_response()
        }
    }
}

#[derive(Debug)]
pub enum AuthApiError {
    InvalidCredentials,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        match self {
            AuthApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(LoginResponse::Fail {
                    message: "Invalid credentials".to_string(),
                }),
            )
                .into_response(),
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
