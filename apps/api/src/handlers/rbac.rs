use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use procura_application::SessionContext;
use procura_domain::{RbacRoleId, UserId};

use crate::dto::{
    AssignRbacRolesRequest, CreateRbacRoleRequest, RbacRoleAssignmentResponse, RbacRoleResponse,
    RemoveRbacRolesRequest, UpdateRbacRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> ApiResult<Json<Vec<RbacRoleResponse>>> {
    let roles = state
        .rbac_admin_service
        .list_roles(&context)
        .await?
        .into_iter()
        .map(RbacRoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Json(payload): Json<CreateRbacRoleRequest>,
) -> ApiResult<(StatusCode, Json<RbacRoleResponse>)> {
    let role = state
        .rbac_admin_service
        .create_role(&context, payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(RbacRoleResponse::from(role))))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Path(role_id): Path<String>,
    Json(payload): Json<UpdateRbacRoleRequest>,
) -> ApiResult<Json<RbacRoleResponse>> {
    let role = state
        .rbac_admin_service
        .update_role(&context, &RbacRoleId::new(role_id)?, payload.into_input()?)
        .await?;

    Ok(Json(RbacRoleResponse::from(role)))
}

pub async fn deactivate_role_handler(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RbacRoleResponse>> {
    let role = state
        .rbac_admin_service
        .deactivate_role(&context, &RbacRoleId::new(role_id)?)
        .await?;

    Ok(Json(RbacRoleResponse::from(role)))
}

pub async fn list_user_roles_handler(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<RbacRoleAssignmentResponse>>> {
    let assignments = state
        .rbac_admin_service
        .list_user_assignments(&context, &UserId::new(user_id)?)
        .await?
        .into_iter()
        .map(RbacRoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

pub async fn assign_user_roles_handler(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Path(user_id): Path<String>,
    Json(payload): Json<AssignRbacRolesRequest>,
) -> ApiResult<(StatusCode, Json<Vec<RbacRoleAssignmentResponse>>)> {
    let assignments = state
        .rbac_admin_service
        .assign_roles(&context, &UserId::new(user_id)?, payload.into_input()?)
        .await?
        .into_iter()
        .map(RbacRoleAssignmentResponse::from)
        .collect();

    Ok((StatusCode::CREATED, Json(assignments)))
}

pub async fn remove_user_roles_handler(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Path(user_id): Path<String>,
    Json(payload): Json<RemoveRbacRolesRequest>,
) -> ApiResult<StatusCode> {
    state
        .rbac_admin_service
        .remove_roles(&context, &UserId::new(user_id)?, payload.into_role_ids()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
