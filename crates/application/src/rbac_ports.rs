use async_trait::async_trait;
use chrono::{DateTime, Utc};
use procura_core::AppResult;
use procura_domain::{PermissionMap, RbacRole, RbacRoleAssignment, RbacRoleId, UserId};

use crate::BackendScope;

/// Input payload for creating a tenant role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRbacRoleInput {
    /// Role name, unique per tenant (case-sensitive).
    pub role_name: String,
    /// Optional human description.
    pub description: Option<String>,
    /// Grants attached to the role.
    pub permissions: PermissionMap,
}

/// Input payload for updating a tenant role. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRbacRoleInput {
    /// Replacement role name.
    pub role_name: Option<String>,
    /// Replacement description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Replacement grants.
    pub permissions: Option<PermissionMap>,
    /// Replacement active flag.
    pub is_active: Option<bool>,
}

/// Input payload for assigning roles to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignRbacRolesInput {
    /// Roles to assign.
    pub role_ids: Vec<RbacRoleId>,
    /// Optional expiry shared by every created assignment.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Port for the backend's tenant RBAC endpoints.
#[async_trait]
pub trait RbacRepository: Send + Sync {
    /// Lists every role of the scope's tenant, inactive ones included.
    async fn list_roles(&self, scope: &BackendScope) -> AppResult<Vec<RbacRole>>;

    /// Creates a role.
    async fn create_role(
        &self,
        scope: &BackendScope,
        input: CreateRbacRoleInput,
    ) -> AppResult<RbacRole>;

    /// Updates a role.
    async fn update_role(
        &self,
        scope: &BackendScope,
        role_id: &RbacRoleId,
        input: UpdateRbacRoleInput,
    ) -> AppResult<RbacRole>;

    /// Lists a user's assignments, expired ones included.
    async fn list_user_assignments(
        &self,
        scope: &BackendScope,
        user_id: &UserId,
    ) -> AppResult<Vec<RbacRoleAssignment>>;

    /// Assigns roles to a user and returns the resulting assignments.
    async fn assign_roles(
        &self,
        scope: &BackendScope,
        user_id: &UserId,
        input: AssignRbacRolesInput,
    ) -> AppResult<Vec<RbacRoleAssignment>>;

    /// Removes role assignments from a user.
    async fn remove_roles(
        &self,
        scope: &BackendScope,
        user_id: &UserId,
        role_ids: &[RbacRoleId],
    ) -> AppResult<()>;
}
