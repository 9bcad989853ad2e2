//! Authentication Middleware
//! Mission: Protect API endpoints with bearer token validation

use crate::auth::{gateway::AuthGateway, models::AuthenticatedUser};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Auth middleware that validates `Authorization: Bearer <token>`
pub async fn auth_middleware(
    State(gateway): State<Arc<AuthGateway>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token = bearer_token(req.headers()).ok_or(AuthRejection::MissingToken)?;

    let username = gateway.validate(token).map_err(|e| {
        debug!(error = %e, path = %req.uri().path(), "Rejected bearer token");
        AuthRejection::InvalidToken
    })?;

    // Handlers read the caller from request extensions
    req.extensions_mut().insert(AuthenticatedUser { username });

    Ok(next.run(req).await)
}

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Reasons a protected request is turned away
#[derive(Debug)]
pub enum AuthRejection {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        // Both cases look the same to the client
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "User not authenticated" })),
        )
            .into_response()
    }
}
