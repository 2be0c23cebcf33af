use procura_application::{AuthorizationEngine, RouteGuard, SessionContext, role_guards};
use procura_domain::{Portal, SessionUser};
use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Signed-in user as seen by the portal frontends.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/session-user-response.ts"
)]
pub struct SessionUserResponse {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub tenant_id: Option<String>,
    pub role: String,
    pub rbac_roles: Vec<String>,
    pub effective_roles: Vec<String>,
    pub portals: Vec<String>,
    pub redirect_to: String,
}

impl SessionUserResponse {
    /// Projects the session user together with the derived access summary.
    #[must_use]
    pub fn from_context(
        engine: &AuthorizationEngine,
        route_guard: &RouteGuard,
        context: &SessionContext,
        user: &SessionUser,
    ) -> Self {
        Self {
            id: user.id().as_str().to_owned(),
            email: user.email().as_str().to_owned(),
            display_name: user.display_name().map(ToOwned::to_owned),
            tenant_id: user.tenant_id().map(|tenant_id| tenant_id.as_str().to_owned()),
            role: user.role().as_str().to_owned(),
            rbac_roles: context
                .held_rbac_role_names()
                .into_iter()
                .map(ToOwned::to_owned)
                .collect(),
            effective_roles: engine.all_user_roles(context),
            portals: Portal::all()
                .iter()
                .filter(|portal| route_guard.portal_allows(context, **portal))
                .map(|portal| portal.as_str().to_owned())
                .collect(),
            redirect_to: role_guards::role_based_redirect(context.active_user()),
        }
    }
}
