use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use procura_application::{SessionContext, filter_navigation};
use procura_core::AppError;
use procura_domain::Portal;
use tower_sessions::Session;

use crate::auth::load_session_context;
use crate::dto::{
    AccessCheckMode, AccessCheckRequest, AccessCheckResponse, GuardDecisionResponse, GuardQuery,
    NavSectionResponse, PermissionsResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn navigation_handler(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Path(portal): Path<Portal>,
) -> ApiResult<Json<Vec<NavSectionResponse>>> {
    if !state.route_guard.portal_allows(&context, portal) {
        return Err(AppError::Forbidden(format!(
            "portal '{}' is not available for this account",
            portal.as_str()
        ))
        .into());
    }

    let sections = filter_navigation(&state.authorization_engine, &context, &portal.menu())
        .iter()
        .map(NavSectionResponse::from)
        .collect();

    Ok(Json(sections))
}

/// Guards a page navigation; callable without a session.
pub async fn guard_handler(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<GuardQuery>,
) -> ApiResult<Json<GuardDecisionResponse>> {
    let context = load_session_context(&session).await?;
    let decision = state.route_guard.decide(&context, &query.path);

    Ok(Json(GuardDecisionResponse::from(decision)))
}

pub async fn permissions_handler(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> Json<PermissionsResponse> {
    let permissions = state.authorization_engine.effective_permission_map(&context);
    Json(PermissionsResponse::from(&permissions))
}

pub async fn domain_permissions_handler(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Path(domain): Path<String>,
) -> Json<Vec<String>> {
    Json(
        state
            .authorization_engine
            .effective_permissions(&context, &domain)
            .into_iter()
            .collect(),
    )
}

pub async fn access_check_handler(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Json(payload): Json<AccessCheckRequest>,
) -> Json<AccessCheckResponse> {
    let engine = &state.authorization_engine;
    let allowed = match payload.mode {
        AccessCheckMode::Any => engine.has_any_role(&context, payload.roles.as_slice()),
        AccessCheckMode::All => engine.has_all_roles(&context, payload.roles.as_slice()),
    };

    Json(AccessCheckResponse { allowed })
}
