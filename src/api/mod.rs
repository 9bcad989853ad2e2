//! VM API Endpoints
//! Mission: Expose user identity and VM records to authenticated callers

use crate::auth::models::AuthenticatedUser;
use crate::inventory::VmInventory;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

/// State shared by the VM routes
#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<dyn VmInventory>,
}

impl AppState {
    pub fn new(inventory: Arc<dyn VmInventory>) -> Self {
        Self { inventory }
    }
}

/// Health check - GET /health
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Current user - GET /whoami
pub async fn whoami(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Response, ApiError> {
    let profile = state
        .inventory
        .lookup_user(&user.username)
        .map_err(ApiError::storage)?
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(json!({ "username": profile.username })).into_response())
}

/// VMs owned by the current user - GET /vms_by_user
pub async fn vms_by_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Response, ApiError> {
    let profile = state
        .inventory
        .lookup_user(&user.username)
        .map_err(ApiError::storage)?
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(profile.vms).into_response())
}

/// Single VM by id - GET /vms/:vm_id
pub async fn get_vm(
    State(state): State<AppState>,
    Path(vm_id): Path<i64>,
) -> Result<Response, ApiError> {
    let vm = state
        .inventory
        .find_vm(vm_id)
        .map_err(ApiError::storage)?
        .ok_or(ApiError::VmNotFound(vm_id))?;

    Ok(Json(vm).into_response())
}

/// Every deployed VM - GET /vms/all
pub async fn list_all_vms(State(state): State<AppState>) -> Result<Response, ApiError> {
    let vms = state.inventory.list_vms().map_err(ApiError::storage)?;
    Ok(Json(vms).into_response())
}

/// Delete one of the current user's VMs - GET /vms/delete/:vm_id
pub async fn delete_vm(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(vm_id): Path<i64>,
) -> Result<Response, ApiError> {
    match state.inventory.delete_vm(&user.username, vm_id) {
        Ok(true) => Ok(Json(json!({ "success": true })).into_response()),
        Ok(false) => {
            warn!(username = %user.username, vm_id, "Delete matched no VM");
            Err(ApiError::DeleteFailed)
        }
        Err(e) => {
            error!(username = %user.username, vm_id, error = %e, "Delete failed");
            Err(ApiError::DeleteFailed)
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    UserNotFound,
    VmNotFound(i64),
    DeleteFailed,
    Storage,
}

impl ApiError {
    fn storage(e: anyhow::Error) -> Self {
        error!(error = %e, "Inventory read failed");
        ApiError::Storage
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
            ApiError::VmNotFound(vm_id) => {
                (StatusCode::NOT_FOUND, format!("VM {} not found", vm_id))
            }
            ApiError::DeleteFailed => (StatusCode::BAD_REQUEST, "Delete failed".to_string()),
            ApiError::Storage => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
