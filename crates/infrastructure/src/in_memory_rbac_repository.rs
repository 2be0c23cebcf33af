use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use procura_application::{
    AssignRbacRolesInput, BackendScope, CreateRbacRoleInput, RbacRepository, UpdateRbacRoleInput,
};
use procura_core::{AppError, AppResult, TenantId};
use procura_domain::{RbacRole, RbacRoleAssignment, RbacRoleId, UserId};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory RBAC repository keyed by tenant.
#[derive(Debug, Default)]
pub struct InMemoryRbacRepository {
    roles: RwLock<HashMap<TenantId, Vec<RbacRole>>>,
    assignments: RwLock<HashMap<TenantId, Vec<RbacRoleAssignment>>>,
}

impl InMemoryRbacRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RbacRepository for InMemoryRbacRepository {
    async fn list_roles(&self, scope: &BackendScope) -> AppResult<Vec<RbacRole>> {
        let tenant_id = scope.require_tenant()?;
        Ok(self
            .roles
            .read()
            .await
            .get(tenant_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_role(
        &self,
        scope: &BackendScope,
        input: CreateRbacRoleInput,
    ) -> AppResult<RbacRole> {
        let tenant_id = scope.require_tenant()?;
        let mut roles = self.roles.write().await;
        let tenant_roles = roles.entry(tenant_id.clone()).or_default();

        if tenant_roles
            .iter()
            .any(|role| role.role_name() == input.role_name.trim())
        {
            return Err(AppError::Conflict(format!(
                "rbac role '{}' already exists for tenant '{tenant_id}'",
                input.role_name
            )));
        }

        let now = Utc::now();
        let role = RbacRole::new(
            RbacRoleId::new(Uuid::new_v4().to_string())?,
            tenant_id.clone(),
            input.role_name,
            input.permissions,
        )?
        .with_description(input.description)
        .with_timestamps(Some(now), Some(now));

        tenant_roles.push(role.clone());
        Ok(role)
    }

    async fn update_role(
        &self,
        scope: &BackendScope,
        role_id: &RbacRoleId,
        input: UpdateRbacRoleInput,
    ) -> AppResult<RbacRole> {
        let tenant_id = scope.require_tenant()?;
        let mut roles = self.roles.write().await;
        let stored = roles
            .get_mut(tenant_id)
            .and_then(|tenant_roles| tenant_roles.iter_mut().find(|role| role.id() == role_id))
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "rbac role '{role_id}' does not exist for tenant '{tenant_id}'"
                ))
            })?;

        let updated = RbacRole::new(
            role_id.clone(),
            tenant_id.clone(),
            input
                .role_name
                .unwrap_or_else(|| stored.role_name().to_owned()),
            input
                .permissions
                .unwrap_or_else(|| stored.permissions().clone()),
        )?
        .with_description(
            input
                .description
                .unwrap_or_else(|| stored.description().map(ToOwned::to_owned)),
        )
        .with_active(input.is_active.unwrap_or(stored.is_active()))
        .with_timestamps(stored.created_at(), Some(Utc::now()));

        *stored = updated.clone();
        Ok(updated)
    }

    async fn list_user_assignments(
        &self,
        scope: &BackendScope,
        user_id: &UserId,
    ) -> AppResult<Vec<RbacRoleAssignment>> {
        let tenant_id = scope.require_tenant()?;
        Ok(self
            .assignments
            .read()
            .await
            .get(tenant_id)
            .map(|assignments| {
                assignments
                    .iter()
                    .filter(|assignment| assignment.user_id() == user_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn assign_roles(
        &self,
        scope: &BackendScope,
        user_id: &UserId,
        input: AssignRbacRolesInput,
    ) -> AppResult<Vec<RbacRoleAssignment>> {
        let tenant_id = scope.require_tenant()?;
        let roles = self.roles.read().await;
        let tenant_roles = roles.get(tenant_id).map(Vec::as_slice).unwrap_or_default();

        let now = Utc::now();
        let created = input
            .role_ids
            .iter()
            .map(|role_id| -> AppResult<RbacRoleAssignment> {
                let role = tenant_roles
                    .iter()
                    .find(|role| role.id() == role_id)
                    .ok_or_else(|| {
                        AppError::NotFound(format!(
                            "rbac role '{role_id}' does not exist for tenant '{tenant_id}'"
                        ))
                    })?;

                Ok(RbacRoleAssignment::new(
                    user_id.clone(),
                    role_id.clone(),
                    role.role_name(),
                    tenant_id.clone(),
                    now,
                )
                .with_expires_at(input.expires_at))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let mut assignments = self.assignments.write().await;
        let tenant_assignments = assignments.entry(tenant_id.clone()).or_default();
        tenant_assignments.retain(|assignment| {
            assignment.user_id() != user_id || !input.role_ids.contains(assignment.role_id())
        });
        tenant_assignments.extend(created.iter().cloned());

        Ok(created)
    }

    async fn remove_roles(
        &self,
        scope: &BackendScope,
        user_id: &UserId,
        role_ids: &[RbacRoleId],
    ) -> AppResult<()> {
        let tenant_id = scope.require_tenant()?;
        if let Some(assignments) = self.assignments.write().await.get_mut(tenant_id) {
            assignments.retain(|assignment| {
                assignment.user_id() != user_id || !role_ids.contains(assignment.role_id())
            });
        }

        Ok(())
    }
}
