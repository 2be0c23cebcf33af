use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use procura_application::SessionContext;
use procura_core::AppError;
use tower_sessions::Session;
use tracing::info;

use crate::dto::{LoginRequest, LoginResponse, SessionUserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{load_session_context, store_rbac_snapshot, store_session_context};

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let authenticated = state
        .session_service
        .login(&payload.email, &payload.password, payload.tenant.as_deref())
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to rotate session id: {error}")))?;

    let context = SessionContext::authenticated(authenticated.user, Some(authenticated.token));
    let rbac_snapshot = state.session_service.load_rbac_snapshot(&context).await;
    let context = context.with_rbac_snapshot(rbac_snapshot);
    store_session_context(&session, &context).await?;

    let user = session_user_response(&state, &context)?;
    Ok(Json(LoginResponse {
        redirect_to: user.redirect_to.clone(),
        user,
    }))
}

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let context = load_session_context(&session).await?;

    session
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    if let Some(user) = context.user() {
        info!(user_id = %user.id(), "user signed out");
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> ApiResult<Json<SessionUserResponse>> {
    Ok(Json(session_user_response(&state, &context)?))
}

/// Re-fetches roles and assignments so admin changes apply without a new
/// sign-in.
pub async fn refresh_rbac_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(context): Extension<SessionContext>,
) -> ApiResult<Json<SessionUserResponse>> {
    let rbac_snapshot = state.session_service.fetch_rbac_snapshot(&context).await?;
    store_rbac_snapshot(&session, rbac_snapshot.as_ref()).await?;

    let context = context.with_rbac_snapshot(rbac_snapshot);
    Ok(Json(session_user_response(&state, &context)?))
}

pub(super) fn session_user_response(
    state: &AppState,
    context: &SessionContext,
) -> ApiResult<SessionUserResponse> {
    let user = context
        .active_user()
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    Ok(SessionUserResponse::from_context(
        &state.authorization_engine,
        &state.route_guard,
        context,
        user,
    ))
}
