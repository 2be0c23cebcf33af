use std::collections::BTreeSet;

use procura_domain::{PermissionMap, Role};
use tracing::debug;

use crate::{RoleNameMatcher, SessionContext};

/// Name-list authorization over the session's enum role and held RBAC roles,
/// plus permission queries over the cached RBAC snapshot.
///
/// Every check is a pure function of the [`SessionContext`]; absent users,
/// missing RBAC data and unknown names all resolve to "no".
#[derive(Debug, Clone, Default)]
pub struct AuthorizationEngine {
    matcher: RoleNameMatcher,
}

impl AuthorizationEngine {
    /// Creates an engine comparing role names with `matcher`.
    #[must_use]
    pub fn new(matcher: RoleNameMatcher) -> Self {
        Self { matcher }
    }

    /// Returns the role-name matcher in use.
    #[must_use]
    pub fn matcher(&self) -> &RoleNameMatcher {
        &self.matcher
    }

    /// Returns whether the user's enum role or any held RBAC role matches one
    /// of `names`.
    #[must_use]
    pub fn has_any_role<S: AsRef<str>>(&self, context: &SessionContext, names: &[S]) -> bool {
        let Some(user) = context.active_user() else {
            return false;
        };

        self.matcher.matches_any(user.role().as_str(), names)
            || context
                .held_rbac_role_names()
                .into_iter()
                .any(|held| self.matcher.matches_any(held, names))
    }

    /// Returns whether every entry of `names` is held. An empty list is
    /// satisfied by any signed-in user.
    #[must_use]
    pub fn has_all_roles<S: AsRef<str>>(&self, context: &SessionContext, names: &[S]) -> bool {
        if context.active_user().is_none() {
            return false;
        }

        names
            .iter()
            .all(|name| self.has_any_role(context, &[name.as_ref()]))
    }

    /// Alias of [`Self::has_any_role`] used by page-level checks.
    #[must_use]
    pub fn can_access<S: AsRef<str>>(&self, context: &SessionContext, names: &[S]) -> bool {
        self.has_any_role(context, names)
    }

    /// Returns the enum role followed by held RBAC role names, deduplicated
    /// by canonical name in first-seen order.
    #[must_use]
    pub fn all_user_roles(&self, context: &SessionContext) -> Vec<String> {
        let Some(user) = context.active_user() else {
            return Vec::new();
        };

        let mut seen = BTreeSet::new();
        std::iter::once(user.role().as_str())
            .chain(context.held_rbac_role_names())
            .filter(|name| seen.insert(self.matcher.canonical(name)))
            .map(ToOwned::to_owned)
            .collect()
    }

    /// Name-list ADMIN check.
    #[must_use]
    pub fn is_admin(&self, context: &SessionContext) -> bool {
        self.holds(context, Role::Admin)
    }

    /// Name-list BUYER check.
    #[must_use]
    pub fn is_buyer(&self, context: &SessionContext) -> bool {
        self.holds(context, Role::Buyer)
    }

    /// Name-list VENDOR check.
    #[must_use]
    pub fn is_vendor(&self, context: &SessionContext) -> bool {
        self.holds(context, Role::Vendor)
    }

    /// Name-list FINANCE check.
    #[must_use]
    pub fn is_finance(&self, context: &SessionContext) -> bool {
        self.holds(context, Role::Finance)
    }

    /// Name-list MANAGER check.
    #[must_use]
    pub fn is_manager(&self, context: &SessionContext) -> bool {
        self.holds(context, Role::Manager)
    }

    /// Name-list APPROVER check.
    #[must_use]
    pub fn is_approver(&self, context: &SessionContext) -> bool {
        self.holds(context, Role::Approver)
    }

    /// Returns the union of actions granted on `domain` by every active,
    /// unexpired RBAC assignment.
    #[must_use]
    pub fn effective_permissions(&self, context: &SessionContext, domain: &str) -> BTreeSet<String> {
        context
            .effective_rbac_roles()
            .into_iter()
            .filter_map(|role| role.permissions().actions(domain))
            .flatten()
            .cloned()
            .collect()
    }

    /// Returns the union of grants across all domains.
    #[must_use]
    pub fn effective_permission_map(&self, context: &SessionContext) -> PermissionMap {
        context
            .effective_rbac_roles()
            .into_iter()
            .fold(PermissionMap::new(), |mut merged, role| {
                merged.merge(role.permissions());
                merged
            })
    }

    /// Returns whether `action` on `domain` is granted.
    #[must_use]
    pub fn can_perform(&self, context: &SessionContext, domain: &str, action: &str) -> bool {
        let allowed = context
            .effective_rbac_roles()
            .into_iter()
            .any(|role| role.permissions().grants(domain, action));

        if !allowed {
            debug!(
                user_id = context.active_user().map(|user| user.id().as_str()),
                domain, action, "permission check denied"
            );
        }

        allowed
    }

    fn holds(&self, context: &SessionContext, role: Role) -> bool {
        self.has_any_role(context, &[role.as_str()])
    }
}
