use chrono::{TimeZone, Utc};
use procura_application::{
    BackendScope, CreateRbacRoleInput, LoginCredentials, UpdateRbacRoleInput,
};
use procura_core::{AccessToken, AppError, TenantId};
use procura_domain::{EmailAddress, PermissionMap, RbacRoleId, Role};
use reqwest::StatusCode;
use serde_json::json;
use url::Url;

use super::wire::{
    AssignmentPayload, CreateRolePayload, LoginResponsePayload, RbacRolePayload, RoleIdsPayload,
    UpdateRolePayload,
};
use super::{HttpProcurementApiClient, TENANT_HEADER, error_for_status};

fn scope() -> BackendScope {
    BackendScope {
        token: AccessToken::new("token").unwrap_or_else(|_| unreachable!()),
        tenant_id: TenantId::new("acme").ok(),
    }
}

fn client(base: &str) -> HttpProcurementApiClient {
    HttpProcurementApiClient::new(
        reqwest::Client::new(),
        Url::parse(base).unwrap_or_else(|_| unreachable!()),
    )
    .unwrap_or_else(|_| unreachable!())
}

#[test]
fn endpoints_extend_the_base_path() {
    let with_prefix = client("https://backend.example.com/api/v1/");
    assert_eq!(
        with_prefix
            .endpoint(&["users", "u 1", "rbac-roles"])
            .map(String::from)
            .unwrap_or_default(),
        "https://backend.example.com/api/v1/users/u%201/rbac-roles"
    );

    let bare = client("https://backend.example.com");
    assert_eq!(
        bare.endpoint(&["auth", "login"])
            .map(String::from)
            .unwrap_or_default(),
        "https://backend.example.com/auth/login"
    );
}

#[test]
fn non_base_urls_are_rejected() {
    let result = HttpProcurementApiClient::new(
        reqwest::Client::new(),
        Url::parse("mailto:ops@example.com").unwrap_or_else(|_| unreachable!()),
    );
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[test]
fn backend_statuses_map_to_application_errors() {
    assert!(matches!(
        error_for_status(StatusCode::BAD_REQUEST, r#"{"message":"bad"}"#),
        AppError::Validation(message) if message == "bad"
    ));
    assert!(matches!(
        error_for_status(StatusCode::UNAUTHORIZED, ""),
        AppError::Unauthorized(message) if message == "Unauthorized"
    ));
    assert!(matches!(
        error_for_status(StatusCode::FORBIDDEN, r#"{"error":"nope"}"#),
        AppError::Forbidden(message) if message == "nope"
    ));
    assert!(matches!(
        error_for_status(StatusCode::NOT_FOUND, "missing"),
        AppError::NotFound(message) if message == "missing"
    ));
    assert!(matches!(
        error_for_status(StatusCode::CONFLICT, "{}"),
        AppError::Conflict(_)
    ));
    assert!(matches!(
        error_for_status(StatusCode::BAD_GATEWAY, ""),
        AppError::Internal(_)
    ));
}

#[test]
fn login_response_maps_to_session_user() {
    let payload: Result<LoginResponsePayload, _> = serde_json::from_value(json!({
        "token": "jwt",
        "user": {
            "id": "u-1",
            "email": "Buyer@Acme.com",
            "role": "buyer",
            "rbacRoles": ["EVALUATOR", ""],
            "tenantId": "acme",
            "name": "Jane"
        }
    }));
    let user = payload
        .map_err(|error| AppError::Internal(error.to_string()))
        .and_then(|payload| payload.user.into_session_user());

    assert!(user.is_ok());
    let user = user.unwrap_or_else(|_| unreachable!());
    assert_eq!(user.role(), Role::Buyer);
    assert_eq!(user.email().as_str(), "buyer@acme.com");
    assert_eq!(user.rbac_roles(), ["EVALUATOR".to_owned()]);
    assert_eq!(user.tenant_id().map(TenantId::as_str), Some("acme"));
    assert_eq!(user.display_name(), Some("Jane"));
    assert!(user.is_active());
}

fn credentials(tenant: Option<&str>) -> LoginCredentials {
    LoginCredentials {
        email: EmailAddress::new("u@acme.com").unwrap_or_else(|_| unreachable!()),
        password: "secret".to_owned(),
        tenant_id: tenant.and_then(|tenant| TenantId::new(tenant).ok()),
    }
}

#[test]
fn login_request_forwards_the_login_tenant() {
    let client = client("https://backend.test/v1/");

    let request = client
        .login_request(&credentials(Some("acme")))
        .and_then(|builder| {
            builder
                .build()
                .map_err(|error| AppError::Internal(error.to_string()))
        });
    let Ok(request) = request else {
        unreachable!("login request should build");
    };
    assert_eq!(request.url().as_str(), "https://backend.test/v1/auth/login");
    assert_eq!(
        request
            .headers()
            .get(TENANT_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some("acme")
    );

    let request = client
        .login_request(&credentials(None))
        .and_then(|builder| {
            builder
                .build()
                .map_err(|error| AppError::Internal(error.to_string()))
        });
    assert!(request.is_ok_and(|request| request.headers().get(TENANT_HEADER).is_none()));
}

#[test]
fn login_response_without_tenant_leaves_user_unbound() {
    let payload: Result<LoginResponsePayload, _> = serde_json::from_value(json!({
        "token": "t",
        "user": { "id": "u-1", "email": "u@acme.com", "role": "USER", "rbacRoles": ["ADMIN"] }
    }));
    let user = payload
        .map_err(|error| AppError::Internal(error.to_string()))
        .and_then(|payload| payload.user.into_session_user());

    let Ok(user) = user else {
        unreachable!("minimal login payload should parse");
    };
    assert!(user.tenant_id().is_none());
    assert_eq!(
        user.with_tenant(credentials(Some("acme")).tenant_id)
            .tenant_id()
            .map(TenantId::as_str),
        Some("acme")
    );
}

#[test]
fn unknown_backend_roles_are_internal_errors() {
    let payload: Result<LoginResponsePayload, _> = serde_json::from_value(json!({
        "token": "jwt",
        "user": { "id": "u-1", "email": "a@acme.com", "role": "SUPERUSER", "rbacRoles": null }
    }));
    let user = payload
        .map_err(|error| AppError::Internal(error.to_string()))
        .and_then(|payload| payload.user.into_session_user());
    assert!(matches!(user, Err(AppError::Internal(_))));
}

#[test]
fn role_payload_maps_permissions_and_falls_back_to_scope_tenant() {
    let payload: Result<RbacRolePayload, _> = serde_json::from_value(json!({
        "id": "r-1",
        "roleName": "Evaluator",
        "permissions": { "bids": ["score", "read"] },
        "isActive": false,
        "createdAt": "2026-01-01T00:00:00Z"
    }));
    let role = payload
        .map_err(|error| AppError::Internal(error.to_string()))
        .and_then(|payload| payload.into_rbac_role(&scope()));

    let role = role.unwrap_or_else(|_| unreachable!());
    assert_eq!(role.tenant_id().as_str(), "acme");
    assert!(role.permissions().grants("bids", "score"));
    assert!(!role.is_active());
    assert!(role.created_at().is_some());
}

#[test]
fn malformed_backend_permissions_are_rejected() {
    let payload: Result<RbacRolePayload, _> = serde_json::from_value(json!({
        "id": "r-1",
        "roleName": "Evaluator",
        "permissions": ["bids"]
    }));
    let role = payload
        .map_err(|error| AppError::Internal(error.to_string()))
        .and_then(|payload| payload.into_rbac_role(&scope()));
    assert!(matches!(role, Err(AppError::Internal(_))));
}

#[test]
fn assignment_payload_keeps_expiry() {
    let payload: Result<AssignmentPayload, _> = serde_json::from_value(json!({
        "userId": "u-1",
        "roleId": "r-1",
        "roleName": "Evaluator",
        "tenantId": "acme",
        "assignedAt": "2026-01-01T00:00:00Z",
        "assignedBy": "admin-1",
        "expiresAt": "2026-02-01T00:00:00Z"
    }));
    let assignment = payload
        .map_err(|error| AppError::Internal(error.to_string()))
        .and_then(|payload| payload.into_assignment(&scope()))
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(
        assignment.expires_at(),
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).single()
    );
    assert_eq!(
        assignment.assigned_by().map(|user_id| user_id.as_str()),
        Some("admin-1")
    );
}

#[test]
fn request_payloads_use_camel_case() {
    let create = CreateRolePayload::from(&CreateRbacRoleInput {
        role_name: "Evaluator".to_owned(),
        description: None,
        permissions: PermissionMap::new()
            .with_grants("bids", ["score"])
            .unwrap_or_default(),
    });
    assert_eq!(
        serde_json::to_value(create).unwrap_or_default(),
        json!({ "roleName": "Evaluator", "permissions": { "bids": ["score"] } })
    );

    let update = UpdateRolePayload::from(&UpdateRbacRoleInput {
        description: Some(None),
        is_active: Some(false),
        ..UpdateRbacRoleInput::default()
    });
    assert_eq!(
        serde_json::to_value(update).unwrap_or_default(),
        json!({ "description": null, "isActive": false })
    );

    let role_ids = RoleIdsPayload::new(
        &[RbacRoleId::new("r-1").unwrap_or_else(|_| unreachable!())],
        None,
    );
    assert_eq!(
        serde_json::to_value(role_ids).unwrap_or_default(),
        json!({ "roleIds": ["r-1"] })
    );
}
