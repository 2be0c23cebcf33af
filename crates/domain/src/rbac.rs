//! Tenant-scoped RBAC roles, permission maps and user assignments.
//!
//! Permissions are purely additive: a role maps resource domains to the action
//! verbs it grants, and a user's effective grants are the union over every
//! active, non-expired assignment. There is no deny verb.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use procura_core::{AppError, AppResult, NonEmptyString, TenantId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::UserId;

/// Stable identifier of an RBAC role in the backend store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RbacRoleId(NonEmptyString);

impl RbacRoleId {
    /// Creates a validated role identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        Ok(Self(NonEmptyString::new(value.into().trim())?))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for RbacRoleId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Resource-domain to action-verb grants carried by one RBAC role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMap(BTreeMap<String, BTreeSet<String>>);

impl PermissionMap {
    /// Creates an empty permission map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a permission document such as
    /// `{"tenders": ["read", "create"], "bids": ["score"]}`.
    pub fn from_json(document: &Value) -> AppResult<Self> {
        let object = document.as_object().ok_or_else(|| {
            AppError::Validation("permissions must be a JSON object".to_owned())
        })?;

        let mut map = Self::new();
        for (domain, actions) in object {
            let actions = actions.as_array().ok_or_else(|| {
                AppError::Validation(format!(
                    "permissions for domain '{domain}' must be an array of action names"
                ))
            })?;

            let actions = actions
                .iter()
                .map(|action| {
                    action.as_str().map(ToOwned::to_owned).ok_or_else(|| {
                        AppError::Validation(format!(
                            "permissions for domain '{domain}' must only contain strings"
                        ))
                    })
                })
                .collect::<AppResult<Vec<_>>>()?;

            map = map.with_grants(domain, actions)?;
        }

        Ok(map)
    }

    /// Returns a copy with additional grants for `domain`.
    pub fn with_grants<I, S>(mut self, domain: &str, actions: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(AppError::Validation(
                "permission domain must not be empty".to_owned(),
            ));
        }

        let entry = self.0.entry(domain.to_owned()).or_default();
        for action in actions {
            let action = action.as_ref().trim();
            if action.is_empty() {
                return Err(AppError::Validation(format!(
                    "permission action for domain '{domain}' must not be empty"
                )));
            }
            entry.insert(action.to_owned());
        }

        Ok(self)
    }

    /// Returns the granted actions for a domain, if any.
    #[must_use]
    pub fn actions(&self, domain: &str) -> Option<&BTreeSet<String>> {
        self.0.get(domain)
    }

    /// Returns whether the map grants `action` on `domain`.
    #[must_use]
    pub fn grants(&self, domain: &str, action: &str) -> bool {
        self.actions(domain)
            .is_some_and(|actions| actions.contains(action))
    }

    /// Adds every grant of `other` to this map.
    pub fn merge(&mut self, other: &Self) {
        for (domain, actions) in &other.0 {
            self.0
                .entry(domain.clone())
                .or_default()
                .extend(actions.iter().cloned());
        }
    }

    /// Iterates over domains and their granted actions.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.0
            .iter()
            .map(|(domain, actions)| (domain.as_str(), actions))
    }

    /// Returns whether the map grants nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }

    /// Returns the JSON document form used by the backend.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(domain, actions)| {
                    (
                        domain.clone(),
                        Value::Array(actions.iter().cloned().map(Value::String).collect()),
                    )
                })
                .collect(),
        )
    }
}

/// Tenant-defined, dynamically assignable permission bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacRole {
    id: RbacRoleId,
    tenant_id: TenantId,
    role_name: NonEmptyString,
    description: Option<String>,
    permissions: PermissionMap,
    is_active: bool,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl RbacRole {
    /// Creates an active role. The role name is kept case-sensitive.
    pub fn new(
        id: RbacRoleId,
        tenant_id: TenantId,
        role_name: impl Into<String>,
        permissions: PermissionMap,
    ) -> AppResult<Self> {
        let role_name = role_name.into().trim().to_owned();

        Ok(Self {
            id,
            tenant_id,
            role_name: NonEmptyString::new(role_name)?,
            description: None,
            permissions,
            is_active: true,
            created_at: None,
            updated_at: None,
        })
    }

    /// Returns the role with an optional description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });
        self
    }

    /// Returns the role with the given active flag.
    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Returns the role with audit timestamps.
    #[must_use]
    pub fn with_timestamps(
        mut self,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> &RbacRoleId {
        &self.id
    }

    /// Returns the owning tenant.
    #[must_use]
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns the tenant-unique role name.
    #[must_use]
    pub fn role_name(&self) -> &str {
        self.role_name.as_str()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the granted permissions.
    #[must_use]
    pub fn permissions(&self) -> &PermissionMap {
        &self.permissions
    }

    /// Returns whether the role currently grants anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp, when known.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the last update timestamp, when known.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Link between a user and an RBAC role inside one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacRoleAssignment {
    user_id: UserId,
    role_id: RbacRoleId,
    role_name: String,
    tenant_id: TenantId,
    assigned_at: DateTime<Utc>,
    assigned_by: Option<UserId>,
    expires_at: Option<DateTime<Utc>>,
}

impl RbacRoleAssignment {
    /// Creates a non-expiring assignment.
    #[must_use]
    pub fn new(
        user_id: UserId,
        role_id: RbacRoleId,
        role_name: impl Into<String>,
        tenant_id: TenantId,
        assigned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            role_id,
            role_name: role_name.into(),
            tenant_id,
            assigned_at,
            assigned_by: None,
            expires_at: None,
        }
    }

    /// Returns the assignment with the assigning administrator recorded.
    #[must_use]
    pub fn with_assigned_by(mut self, assigned_by: Option<UserId>) -> Self {
        self.assigned_by = assigned_by;
        self
    }

    /// Returns the assignment with an expiry instant.
    #[must_use]
    pub fn with_expires_at(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Returns the assigned user.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the assigned role identifier.
    #[must_use]
    pub fn role_id(&self) -> &RbacRoleId {
        &self.role_id
    }

    /// Returns the assigned role name as reported by the store.
    #[must_use]
    pub fn role_name(&self) -> &str {
        self.role_name.as_str()
    }

    /// Returns the tenant scope.
    #[must_use]
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns when the role was assigned.
    #[must_use]
    pub fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }

    /// Returns who assigned the role, if recorded.
    #[must_use]
    pub fn assigned_by(&self) -> Option<&UserId> {
        self.assigned_by.as_ref()
    }

    /// Returns the expiry instant, if any.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns whether the assignment still confers its role at `instant`.
    #[must_use]
    pub fn is_effective_at(&self, instant: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at > instant)
    }
}

/// Cached RBAC roles and assignments fetched for the current session user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacSnapshot {
    roles: Vec<RbacRole>,
    assignments: Vec<RbacRoleAssignment>,
    fetched_at: DateTime<Utc>,
}

impl RbacSnapshot {
    /// Creates a snapshot from the fetched tenant roles and user assignments.
    #[must_use]
    pub fn new(
        roles: Vec<RbacRole>,
        assignments: Vec<RbacRoleAssignment>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            roles,
            assignments,
            fetched_at,
        }
    }

    /// Returns all cached tenant roles.
    #[must_use]
    pub fn roles(&self) -> &[RbacRole] {
        &self.roles
    }

    /// Returns all cached assignments, expired ones included.
    #[must_use]
    pub fn assignments(&self) -> &[RbacRoleAssignment] {
        &self.assignments
    }

    /// Returns when the snapshot was fetched.
    #[must_use]
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Returns the active roles conferred by assignments effective at `instant`,
    /// in assignment order and without duplicates.
    #[must_use]
    pub fn effective_roles(&self, instant: DateTime<Utc>) -> Vec<&RbacRole> {
        let mut effective: Vec<&RbacRole> = Vec::new();
        for assignment in &self.assignments {
            if !assignment.is_effective_at(instant) {
                continue;
            }

            let role = self.roles.iter().find(|role| {
                role.id() == assignment.role_id() && role.tenant_id() == assignment.tenant_id()
            });

            if let Some(role) = role.filter(|role| role.is_active())
                && !effective.iter().any(|known| known.id() == role.id())
            {
                effective.push(role);
            }
        }

        effective
    }
}
