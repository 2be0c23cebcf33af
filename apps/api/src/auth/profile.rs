use axum::Json;
use axum::extract::{Extension, State};
use procura_application::SessionContext;
use tower_sessions::Session;

use crate::dto::{SessionUserResponse, UpdateProfileRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::session::session_user_response;
use super::store_session_context;

pub async fn update_profile_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(context): Extension<SessionContext>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<SessionUserResponse>> {
    // The service keeps tenant, role and RBAC names from the signed-in user.
    let updated = state
        .session_service
        .update_profile(&context, payload.display_name, payload.email)
        .await?;

    let context = SessionContext::authenticated(updated, context.token().cloned())
        .with_rbac_snapshot(context.rbac_snapshot().cloned());
    store_session_context(&session, &context).await?;

    Ok(Json(session_user_response(&state, &context)?))
}
