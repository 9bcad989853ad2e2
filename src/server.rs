//! Router assembly and service bootstrap.

use crate::{
    api::{self, AppState},
    auth::{api as auth_api, auth_middleware, AuthGateway, AuthState, CredentialStore, TokenService},
    config::AppConfig,
    inventory::{JsonFileInventory, VmInventory},
    middleware::request_logging,
};
use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Build the auth gateway and inventory described by `config`.
///
/// Credentials are read once here and shared by every request.
pub fn build_components(config: &AppConfig) -> Result<(Arc<AuthGateway>, Arc<dyn VmInventory>)> {
    let credentials = CredentialStore::load(&config.users_file)?;
    let gateway = Arc::new(AuthGateway::new(
        credentials,
        TokenService::new(&config.jwt_secret),
    ));

    let inventory: Arc<dyn VmInventory> = Arc::new(JsonFileInventory::new(
        config.users_data_file.clone(),
        config.vms_all_file.clone(),
    ));

    info!(
        users_data = %config.users_data_file.display(),
        vms_all = %config.vms_all_file.display(),
        "Inventory configured"
    );

    Ok((gateway, inventory))
}

/// Full application router
pub fn build_router(gateway: Arc<AuthGateway>, inventory: Arc<dyn VmInventory>) -> Router {
    let auth_router = Router::new()
        .route("/login", post(auth_api::login))
        .route("/validate", post(auth_api::validate))
        .with_state(AuthState::new(gateway.clone()));

    let app_state = AppState::new(inventory);

    // Protected routes require a bearer token
    let protected_routes = Router::new()
        .route("/whoami", get(api::whoami))
        .route("/vms_by_user", get(api::vms_by_user))
        .route("/vms/delete/:vm_id", get(api::delete_vm))
        .route_layer(middleware::from_fn_with_state(gateway, auth_middleware))
        .with_state(app_state.clone());

    // VM catalog reads are public
    let public_routes = Router::new()
        .route("/health", get(api::health_check))
        .route("/vms/all", get(api::list_all_vms))
        .route("/vms/:vm_id", get(api::get_vm))
        .with_state(app_state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(auth_router)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}
