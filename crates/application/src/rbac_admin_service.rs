use std::collections::BTreeSet;
use std::sync::Arc;

use procura_core::{AppError, AppResult};
use procura_domain::{RbacRole, RbacRoleAssignment, RbacRoleId, UserId};
use tracing::{debug, info};

use crate::{
    AssignRbacRolesInput, AuthorizationEngine, BackendScope, CreateRbacRoleInput, RbacRepository,
    SessionContext, UpdateRbacRoleInput,
};

/// Permission domain gating RBAC administration for non-admin users.
pub const RBAC_PERMISSION_DOMAIN: &str = "rbac";

/// Action within [`RBAC_PERMISSION_DOMAIN`] that allows role administration.
pub const RBAC_MANAGE_ACTION: &str = "manage";

/// Application service for tenant role and assignment administration.
///
/// Every operation requires a signed-in, tenant-bound actor who is an admin
/// by name or holds `rbac:manage`.
#[derive(Clone)]
pub struct RbacAdminService {
    engine: AuthorizationEngine,
    repository: Arc<dyn RbacRepository>,
}

impl RbacAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(engine: AuthorizationEngine, repository: Arc<dyn RbacRepository>) -> Self {
        Self { engine, repository }
    }

    /// Lists the tenant's roles.
    pub async fn list_roles(&self, actor: &SessionContext) -> AppResult<Vec<RbacRole>> {
        let scope = self.authorize(actor)?;
        self.repository.list_roles(&scope).await
    }

    /// Creates a role after checking name uniqueness within the tenant.
    pub async fn create_role(
        &self,
        actor: &SessionContext,
        input: CreateRbacRoleInput,
    ) -> AppResult<RbacRole> {
        let scope = self.authorize(actor)?;
        let role_name = validated_role_name(&input.role_name)?;

        let existing = self.repository.list_roles(&scope).await?;
        ensure_unique_name(&existing, &role_name, None)?;

        let role = self
            .repository
            .create_role(
                &scope,
                CreateRbacRoleInput {
                    role_name,
                    description: input.description,
                    permissions: input.permissions,
                },
            )
            .await?;

        info!(
            actor = actor_id(actor),
            role_id = %role.id(),
            role_name = role.role_name(),
            "rbac role created"
        );

        Ok(role)
    }

    /// Updates a role's name, description, grants or active flag.
    pub async fn update_role(
        &self,
        actor: &SessionContext,
        role_id: &RbacRoleId,
        input: UpdateRbacRoleInput,
    ) -> AppResult<RbacRole> {
        let scope = self.authorize(actor)?;

        let existing = self.repository.list_roles(&scope).await?;
        if !existing.iter().any(|role| role.id() == role_id) {
            return Err(AppError::NotFound(format!(
                "rbac role '{role_id}' does not exist"
            )));
        }

        let role_name = input
            .role_name
            .as_deref()
            .map(validated_role_name)
            .transpose()?;
        if let Some(role_name) = role_name.as_deref() {
            ensure_unique_name(&existing, role_name, Some(role_id))?;
        }

        let role = self
            .repository
            .update_role(
                &scope,
                role_id,
                UpdateRbacRoleInput {
                    role_name,
                    ..input
                },
            )
            .await?;

        info!(
            actor = actor_id(actor),
            role_id = %role.id(),
            role_name = role.role_name(),
            is_active = role.is_active(),
            "rbac role updated"
        );

        Ok(role)
    }

    /// Marks a role inactive; its assignments stop conferring anything.
    pub async fn deactivate_role(
        &self,
        actor: &SessionContext,
        role_id: &RbacRoleId,
    ) -> AppResult<RbacRole> {
        self.update_role(
            actor,
            role_id,
            UpdateRbacRoleInput {
                is_active: Some(false),
                ..UpdateRbacRoleInput::default()
            },
        )
        .await
    }

    /// Lists a user's assignments, expired ones included.
    pub async fn list_user_assignments(
        &self,
        actor: &SessionContext,
        user_id: &UserId,
    ) -> AppResult<Vec<RbacRoleAssignment>> {
        let scope = self.authorize(actor)?;
        self.repository.list_user_assignments(&scope, user_id).await
    }

    /// Assigns existing, active roles to a user with an optional future expiry.
    pub async fn assign_roles(
        &self,
        actor: &SessionContext,
        user_id: &UserId,
        input: AssignRbacRolesInput,
    ) -> AppResult<Vec<RbacRoleAssignment>> {
        let scope = self.authorize(actor)?;
        let role_ids = deduplicated(input.role_ids)?;

        if let Some(expires_at) = input.expires_at
            && expires_at <= actor.evaluated_at()
        {
            return Err(AppError::Validation(
                "assignment expiry must be in the future".to_owned(),
            ));
        }

        let roles = self.repository.list_roles(&scope).await?;
        for role_id in &role_ids {
            match roles.iter().find(|role| role.id() == role_id) {
                None => {
                    return Err(AppError::NotFound(format!(
                        "rbac role '{role_id}' does not exist"
                    )));
                }
                Some(role) if !role.is_active() => {
                    return Err(AppError::Validation(format!(
                        "rbac role '{}' is inactive and cannot be assigned",
                        role.role_name()
                    )));
                }
                Some(_) => {}
            }
        }

        let role_count = role_ids.len();
        let assignments = self
            .repository
            .assign_roles(
                &scope,
                user_id,
                AssignRbacRolesInput {
                    role_ids,
                    expires_at: input.expires_at,
                },
            )
            .await?;

        info!(
            actor = actor_id(actor),
            user_id = %user_id,
            role_count,
            expires_at = input.expires_at.map(|value| value.to_rfc3339()),
            "rbac roles assigned"
        );

        Ok(assignments)
    }

    /// Removes role assignments from a user.
    pub async fn remove_roles(
        &self,
        actor: &SessionContext,
        user_id: &UserId,
        role_ids: Vec<RbacRoleId>,
    ) -> AppResult<()> {
        let scope = self.authorize(actor)?;
        let role_ids = deduplicated(role_ids)?;

        self.repository
            .remove_roles(&scope, user_id, &role_ids)
            .await?;

        info!(
            actor = actor_id(actor),
            user_id = %user_id,
            role_count = role_ids.len(),
            "rbac roles removed"
        );

        Ok(())
    }

    fn authorize(&self, actor: &SessionContext) -> AppResult<BackendScope> {
        if actor.active_user().is_none() {
            return Err(AppError::Unauthorized("authentication required".to_owned()));
        }

        if !self.engine.is_admin(actor)
            && !self
                .engine
                .can_perform(actor, RBAC_PERMISSION_DOMAIN, RBAC_MANAGE_ACTION)
        {
            debug!(actor = actor_id(actor), "rbac administration denied");
            return Err(AppError::Forbidden(
                "rbac administration requires an administrator".to_owned(),
            ));
        }

        let scope = actor.backend_scope()?;
        scope.require_tenant()?;
        Ok(scope)
    }
}

fn actor_id(actor: &SessionContext) -> Option<&str> {
    actor.active_user().map(|user| user.id().as_str())
}

fn validated_role_name(role_name: &str) -> AppResult<String> {
    let role_name = role_name.trim();
    if role_name.is_empty() {
        return Err(AppError::Validation(
            "role name must not be empty".to_owned(),
        ));
    }

    Ok(role_name.to_owned())
}

fn ensure_unique_name(
    existing: &[RbacRole],
    role_name: &str,
    except: Option<&RbacRoleId>,
) -> AppResult<()> {
    let taken = existing
        .iter()
        .filter(|role| Some(role.id()) != except)
        .any(|role| role.role_name() == role_name);

    if taken {
        return Err(AppError::Conflict(format!(
            "rbac role '{role_name}' already exists in this tenant"
        )));
    }

    Ok(())
}

fn deduplicated(role_ids: Vec<RbacRoleId>) -> AppResult<Vec<RbacRoleId>> {
    let mut seen = BTreeSet::new();
    let role_ids: Vec<RbacRoleId> = role_ids
        .into_iter()
        .filter(|role_id| seen.insert(role_id.as_str().to_owned()))
        .collect();

    if role_ids.is_empty() {
        return Err(AppError::Validation(
            "at least one role id is required".to_owned(),
        ));
    }

    Ok(role_ids)
}
