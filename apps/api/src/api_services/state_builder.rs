use std::sync::Arc;

use procura_application::{AuthorizationEngine, RbacAdminService, RouteGuard, SessionService};
use procura_core::AppError;
use procura_infrastructure::HttpProcurementApiClient;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let backend_client = Arc::new(HttpProcurementApiClient::with_timeout(
        config.backend_api_url.clone(),
        config.backend_timeout,
    )?);
    info!(backend = %backend_client.base_url(), "procurement backend configured");

    let authorization_engine = AuthorizationEngine::new(config.role_name_matcher());

    Ok(AppState {
        session_service: SessionService::new(backend_client.clone(), backend_client.clone()),
        rbac_admin_service: RbacAdminService::new(authorization_engine.clone(), backend_client),
        route_guard: RouteGuard::new(authorization_engine.clone()),
        authorization_engine,
        frontend_url: config.frontend_url.clone(),
    })
}
