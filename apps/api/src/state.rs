use procura_application::{AuthorizationEngine, RbacAdminService, RouteGuard, SessionService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub session_service: SessionService,
    pub rbac_admin_service: RbacAdminService,
    pub authorization_engine: AuthorizationEngine,
    pub route_guard: RouteGuard,
    pub frontend_url: String,
}
