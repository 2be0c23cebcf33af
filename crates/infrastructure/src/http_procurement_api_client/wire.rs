//! camelCase JSON shapes exchanged with the procurement backend.

use chrono::{DateTime, Utc};
use procura_application::{BackendScope, CreateRbacRoleInput, ProfileUpdate, UpdateRbacRoleInput};
use procura_core::{AppError, AppResult, TenantId};
use procura_domain::{
    EmailAddress, PermissionMap, RbacRole, RbacRoleAssignment, RbacRoleId, Role, SessionUser,
    UserId,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(super) struct LoginPayload<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginResponsePayload {
    pub(super) token: String,
    pub(super) user: UserPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserPayload {
    id: String,
    email: String,
    role: String,
    #[serde(default)]
    rbac_roles: Option<Vec<String>>,
    #[serde(default)]
    tenant_id: Option<String>,
    #[serde(default, alias = "name")]
    display_name: Option<String>,
    #[serde(default)]
    is_active: Option<bool>,
}

impl UserPayload {
    pub(super) fn into_session_user(self) -> AppResult<SessionUser> {
        let role = Role::from_transport(self.role.trim().to_ascii_uppercase().as_str())
            .map_err(|_| {
                AppError::Internal(format!("backend returned unknown role '{}'", self.role))
            })?;
        let tenant_id = self
            .tenant_id
            .filter(|value| !value.trim().is_empty())
            .map(TenantId::new)
            .transpose()?;

        Ok(
            SessionUser::new(UserId::new(self.id)?, EmailAddress::new(self.email)?, role)
                .with_rbac_roles(self.rbac_roles.unwrap_or_default())
                .with_tenant(tenant_id)
                .with_display_name(self.display_name)
                .with_active(self.is_active.unwrap_or(true)),
        )
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProfilePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

impl From<&ProfileUpdate> for ProfilePayload {
    fn from(value: &ProfileUpdate) -> Self {
        Self {
            display_name: value.display_name.clone(),
            email: value.email.as_ref().map(|email| email.as_str().to_owned()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RbacRolePayload {
    id: String,
    #[serde(default)]
    tenant_id: Option<String>,
    role_name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    permissions: Value,
    #[serde(default)]
    is_active: Option<bool>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl RbacRolePayload {
    pub(super) fn into_rbac_role(self, scope: &BackendScope) -> AppResult<RbacRole> {
        let permissions = if self.permissions.is_null() {
            PermissionMap::new()
        } else {
            PermissionMap::from_json(&self.permissions).map_err(|error| {
                AppError::Internal(format!(
                    "backend returned malformed permissions for role '{}': {error}",
                    self.id
                ))
            })?
        };

        Ok(RbacRole::new(
            RbacRoleId::new(self.id)?,
            tenant_or_scope(self.tenant_id, scope)?,
            self.role_name,
            permissions,
        )?
        .with_description(self.description)
        .with_active(self.is_active.unwrap_or(true))
        .with_timestamps(self.created_at, self.updated_at))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateRolePayload {
    role_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    permissions: Value,
}

impl From<&CreateRbacRoleInput> for CreateRolePayload {
    fn from(value: &CreateRbacRoleInput) -> Self {
        Self {
            role_name: value.role_name.clone(),
            description: value.description.clone(),
            permissions: value.permissions.to_json(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateRolePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    role_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    permissions: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
}

impl From<&UpdateRbacRoleInput> for UpdateRolePayload {
    fn from(value: &UpdateRbacRoleInput) -> Self {
        Self {
            role_name: value.role_name.clone(),
            description: value.description.clone(),
            permissions: value.permissions.as_ref().map(PermissionMap::to_json),
            is_active: value.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AssignmentPayload {
    user_id: String,
    role_id: String,
    #[serde(default)]
    role_name: Option<String>,
    #[serde(default)]
    tenant_id: Option<String>,
    assigned_at: DateTime<Utc>,
    #[serde(default)]
    assigned_by: Option<String>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

impl AssignmentPayload {
    pub(super) fn into_assignment(self, scope: &BackendScope) -> AppResult<RbacRoleAssignment> {
        let assigned_by = self
            .assigned_by
            .filter(|value| !value.trim().is_empty())
            .map(UserId::new)
            .transpose()?;

        Ok(RbacRoleAssignment::new(
            UserId::new(self.user_id)?,
            RbacRoleId::new(self.role_id)?,
            self.role_name.unwrap_or_default(),
            tenant_or_scope(self.tenant_id, scope)?,
            self.assigned_at,
        )
        .with_assigned_by(assigned_by)
        .with_expires_at(self.expires_at))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RoleIdsPayload {
    role_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

impl RoleIdsPayload {
    pub(super) fn new(role_ids: &[RbacRoleId], expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            role_ids: role_ids
                .iter()
                .map(|role_id| role_id.as_str().to_owned())
                .collect(),
            expires_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorPayload {
    pub(super) fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|message| !message.trim().is_empty())
    }
}

fn tenant_or_scope(tenant_id: Option<String>, scope: &BackendScope) -> AppResult<TenantId> {
    match tenant_id.filter(|value| !value.trim().is_empty()) {
        Some(tenant_id) => TenantId::new(tenant_id),
        None => scope.require_tenant().cloned(),
    }
}
