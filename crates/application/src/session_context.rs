use chrono::{DateTime, Utc};
use procura_core::{AccessToken, AppError, AppResult, TenantId};
use procura_domain::{RbacRole, RbacSnapshot, SessionUser};

/// Credentials forwarded to the procurement backend on behalf of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendScope {
    /// Bearer token issued at login.
    pub token: AccessToken,
    /// Tenant the session is bound to, when known.
    pub tenant_id: Option<TenantId>,
}

impl BackendScope {
    /// Returns the tenant or fails for operations that are tenant-scoped.
    pub fn require_tenant(&self) -> AppResult<&TenantId> {
        self.tenant_id.as_ref().ok_or_else(|| {
            AppError::Validation("operation requires a tenant-scoped session".to_owned())
        })
    }
}

/// Immutable snapshot of one session, passed explicitly to every
/// authorization, navigation and guard decision.
///
/// `evaluated_at` is the instant assignment expiry is judged against.
#[derive(Debug, Clone)]
pub struct SessionContext {
    user: Option<SessionUser>,
    token: Option<AccessToken>,
    rbac_snapshot: Option<RbacSnapshot>,
    evaluated_at: DateTime<Utc>,
}

impl SessionContext {
    /// Creates a context with no signed-in user.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            user: None,
            token: None,
            rbac_snapshot: None,
            evaluated_at: Utc::now(),
        }
    }

    /// Creates a context for a signed-in user.
    #[must_use]
    pub fn authenticated(user: SessionUser, token: Option<AccessToken>) -> Self {
        Self {
            user: Some(user),
            token,
            rbac_snapshot: None,
            evaluated_at: Utc::now(),
        }
    }

    /// Returns the context with cached RBAC data attached.
    #[must_use]
    pub fn with_rbac_snapshot(mut self, rbac_snapshot: Option<RbacSnapshot>) -> Self {
        self.rbac_snapshot = rbac_snapshot;
        self
    }

    /// Returns the context evaluated at a fixed instant.
    #[must_use]
    pub fn at(mut self, evaluated_at: DateTime<Utc>) -> Self {
        self.evaluated_at = evaluated_at;
        self
    }

    /// Returns the signed-in user, active or not.
    #[must_use]
    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Returns the signed-in user only while the account is active.
    #[must_use]
    pub fn active_user(&self) -> Option<&SessionUser> {
        self.user.as_ref().filter(|user| user.is_active())
    }

    /// Returns the backend token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    /// Returns the cached RBAC snapshot, if one was fetched.
    #[must_use]
    pub fn rbac_snapshot(&self) -> Option<&RbacSnapshot> {
        self.rbac_snapshot.as_ref()
    }

    /// Returns the instant used for expiry checks.
    #[must_use]
    pub fn evaluated_at(&self) -> DateTime<Utc> {
        self.evaluated_at
    }

    /// Returns the RBAC roles conferring permissions right now.
    ///
    /// Without a snapshot no permission maps are known and the result is empty.
    #[must_use]
    pub fn effective_rbac_roles(&self) -> Vec<&RbacRole> {
        if self.active_user().is_none() {
            return Vec::new();
        }

        self.rbac_snapshot
            .as_ref()
            .map(|snapshot| snapshot.effective_roles(self.evaluated_at))
            .unwrap_or_default()
    }

    /// Returns the RBAC role names the user currently holds.
    ///
    /// A fetched snapshot is authoritative; otherwise the names reported at
    /// login are used as-is.
    #[must_use]
    pub fn held_rbac_role_names(&self) -> Vec<&str> {
        let Some(user) = self.active_user() else {
            return Vec::new();
        };

        match &self.rbac_snapshot {
            Some(snapshot) => snapshot
                .effective_roles(self.evaluated_at)
                .into_iter()
                .map(RbacRole::role_name)
                .collect(),
            None => user.rbac_roles().iter().map(String::as_str).collect(),
        }
    }

    /// Returns the backend credentials of this session.
    pub fn backend_scope(&self) -> AppResult<BackendScope> {
        let user = self
            .active_user()
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;
        let token = self
            .token
            .clone()
            .ok_or_else(|| AppError::Unauthorized("session has no backend token".to_owned()))?;

        Ok(BackendScope {
            token,
            tenant_id: user.tenant_id().cloned(),
        })
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::anonymous()
    }
}
