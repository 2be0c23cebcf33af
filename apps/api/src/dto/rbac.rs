use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use procura_application::{AssignRbacRolesInput, CreateRbacRoleInput, UpdateRbacRoleInput};
use procura_core::{AppError, AppResult};
use procura_domain::{PermissionMap, RbacRole, RbacRoleAssignment, RbacRoleId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for RBAC role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-rbac-role-request.ts"
)]
pub struct CreateRbacRoleRequest {
    pub role_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: BTreeMap<String, Vec<String>>,
}

impl CreateRbacRoleRequest {
    pub fn into_input(self) -> AppResult<CreateRbacRoleInput> {
        Ok(CreateRbacRoleInput {
            role_name: self.role_name,
            description: self.description.and_then(non_blank),
            permissions: permission_map(self.permissions)?,
        })
    }
}

/// Incoming payload for RBAC role updates. Omitted fields stay unchanged; a
/// blank description clears it.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-rbac-role-request.ts"
)]
pub struct UpdateRbacRoleRequest {
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateRbacRoleRequest {
    pub fn into_input(self) -> AppResult<UpdateRbacRoleInput> {
        Ok(UpdateRbacRoleInput {
            role_name: self.role_name,
            description: self.description.map(non_blank),
            permissions: self.permissions.map(permission_map).transpose()?,
            is_active: self.is_active,
        })
    }
}

/// Incoming payload for assigning RBAC roles to a user.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/assign-rbac-roles-request.ts"
)]
pub struct AssignRbacRolesRequest {
    pub role_ids: Vec<String>,
    /// RFC 3339 instant after which the assignments stop applying.
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl AssignRbacRolesRequest {
    pub fn into_input(self) -> AppResult<AssignRbacRolesInput> {
        let expires_at = self
            .expires_at
            .as_deref()
            .map(|value| {
                DateTime::parse_from_rfc3339(value)
                    .map(|instant| instant.with_timezone(&Utc))
                    .map_err(|error| {
                        AppError::Validation(format!("invalid expires_at '{value}': {error}"))
                    })
            })
            .transpose()?;

        Ok(AssignRbacRolesInput {
            role_ids: role_ids(self.role_ids)?,
            expires_at,
        })
    }
}

/// Incoming payload for removing RBAC roles from a user.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/remove-rbac-roles-request.ts"
)]
pub struct RemoveRbacRolesRequest {
    pub role_ids: Vec<String>,
}

impl RemoveRbacRolesRequest {
    pub fn into_role_ids(self) -> AppResult<Vec<RbacRoleId>> {
        role_ids(self.role_ids)
    }
}

/// API representation of a tenant RBAC role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/rbac-role-response.ts"
)]
pub struct RbacRoleResponse {
    pub id: String,
    pub tenant_id: String,
    pub role_name: String,
    pub description: Option<String>,
    pub permissions: BTreeMap<String, Vec<String>>,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<RbacRole> for RbacRoleResponse {
    fn from(value: RbacRole) -> Self {
        Self {
            id: value.id().as_str().to_owned(),
            tenant_id: value.tenant_id().as_str().to_owned(),
            role_name: value.role_name().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            permissions: value
                .permissions()
                .iter()
                .map(|(domain, actions)| (domain.to_owned(), actions.iter().cloned().collect()))
                .collect(),
            is_active: value.is_active(),
            created_at: value.created_at().map(|instant| instant.to_rfc3339()),
            updated_at: value.updated_at().map(|instant| instant.to_rfc3339()),
        }
    }
}

/// API representation of a user's RBAC role assignment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/rbac-role-assignment-response.ts"
)]
pub struct RbacRoleAssignmentResponse {
    pub user_id: String,
    pub role_id: String,
    pub role_name: String,
    pub tenant_id: String,
    pub assigned_at: String,
    pub assigned_by: Option<String>,
    pub expires_at: Option<String>,
}

impl From<RbacRoleAssignment> for RbacRoleAssignmentResponse {
    fn from(value: RbacRoleAssignment) -> Self {
        Self {
            user_id: value.user_id().as_str().to_owned(),
            role_id: value.role_id().as_str().to_owned(),
            role_name: value.role_name().to_owned(),
            tenant_id: value.tenant_id().as_str().to_owned(),
            assigned_at: value.assigned_at().to_rfc3339(),
            assigned_by: value.assigned_by().map(|user_id| user_id.as_str().to_owned()),
            expires_at: value.expires_at().map(|instant| instant.to_rfc3339()),
        }
    }
}

fn permission_map(permissions: BTreeMap<String, Vec<String>>) -> AppResult<PermissionMap> {
    permissions
        .into_iter()
        .try_fold(PermissionMap::new(), |map, (domain, actions)| {
            map.with_grants(&domain, actions)
        })
}

fn role_ids(values: Vec<String>) -> AppResult<Vec<RbacRoleId>> {
    values.into_iter().map(RbacRoleId::new).collect()
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
