//! Hierarchy-based role predicates.
//!
//! These answer "does this user's enum role stand in for role X" through the
//! static role hierarchy. They are a separate family from the name-list checks
//! of [`crate::AuthorizationEngine`] (`has_any_role`, `is_admin`, ...), which
//! compare role names and also consider RBAC roles. Call sites pick one family
//! on purpose; the two are not interchangeable.

use procura_domain::{DEFAULT_LOGIN_PATH, Portal, Role, SessionUser, path_has_prefix};

/// Returns whether the user's enum role satisfies `required` via the
/// hierarchy. An absent or deactivated user satisfies nothing.
#[must_use]
pub fn has_role(user: Option<&SessionUser>, required: Role) -> bool {
    active(user).is_some_and(|user| user.role().satisfies(required))
}

/// Exact ADMIN check; admin status is never inherited.
#[must_use]
pub fn require_admin(user: Option<&SessionUser>) -> bool {
    active(user).is_some_and(|user| user.role() == Role::Admin)
}

/// Exact VENDOR check; vendor status is never inherited.
#[must_use]
pub fn require_vendor(user: Option<&SessionUser>) -> bool {
    active(user).is_some_and(|user| user.role() == Role::Vendor)
}

/// Hierarchy check for BUYER.
#[must_use]
pub fn require_buyer(user: Option<&SessionUser>) -> bool {
    has_role(user, Role::Buyer)
}

/// Hierarchy check for FINANCE.
#[must_use]
pub fn require_finance(user: Option<&SessionUser>) -> bool {
    has_role(user, Role::Finance)
}

/// Hierarchy check for MANAGER.
#[must_use]
pub fn require_manager(user: Option<&SessionUser>) -> bool {
    has_role(user, Role::Manager)
}

/// Hierarchy check for APPROVER.
#[must_use]
pub fn require_approver(user: Option<&SessionUser>) -> bool {
    has_role(user, Role::Approver)
}

/// Returns the landing route for the user's role, used after login and by
/// guard redirects. Not an access decision.
#[must_use]
pub fn role_based_redirect(user: Option<&SessionUser>) -> String {
    let Some(user) = active(user) else {
        return DEFAULT_LOGIN_PATH.to_owned();
    };

    let portal = match user.role() {
        Role::Admin => Portal::Admin,
        Role::Buyer | Role::Manager | Role::Approver => Portal::Buyer,
        Role::Finance => Portal::Finance,
        Role::Vendor => Portal::Vendor,
        Role::User => Portal::Business,
    };

    portal.home_path()
}

/// Prefix rules applied by [`is_route_allowed`], in evaluation order.
const ROUTE_RULES: &[(&str, RouteRule)] = &[
    ("/admin", RouteRule::Exact(Role::Admin)),
    ("/buyer", RouteRule::Hierarchy(Role::Buyer)),
    ("/finance", RouteRule::Hierarchy(Role::Finance)),
    ("/vendor", RouteRule::Exact(Role::Vendor)),
];

#[derive(Debug, Clone, Copy)]
enum RouteRule {
    Exact(Role),
    Hierarchy(Role),
}

/// Returns whether the path's prefix rule admits the user.
///
/// Paths outside the rule table are allowed: the open default is deliberate,
/// and authentication itself is enforced by the route guard, not here.
#[must_use]
pub fn is_route_allowed(path: &str, user: Option<&SessionUser>) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();

    match ROUTE_RULES
        .iter()
        .find(|(prefix, _)| path_has_prefix(path, prefix))
    {
        Some((_, RouteRule::Exact(role))) => {
            active(user).is_some_and(|user| user.role() == *role)
        }
        Some((_, RouteRule::Hierarchy(role))) => has_role(user, *role),
        None => true,
    }
}

fn active(user: Option<&SessionUser>) -> Option<&SessionUser> {
    user.filter(|user| user.is_active())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use procura_domain::{EmailAddress, Role, SessionUser, UserId};

    use super::{
        has_role, is_route_allowed, require_admin, require_approver, require_buyer,
        require_finance, require_manager, require_vendor, role_based_redirect,
    };

    fn user_with_role(role: Role) -> SessionUser {
        SessionUser::new(
            UserId::new("u-1").unwrap_or_else(|_| unreachable!()),
            EmailAddress::new("u@acme.com").unwrap_or_else(|_| unreachable!()),
            role,
        )
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::all().to_vec())
    }

    proptest! {
        #[test]
        fn every_role_satisfies_itself(role in any_role()) {
            prop_assert!(has_role(Some(&user_with_role(role)), role));
        }

        #[test]
        fn absent_user_satisfies_nothing(role in any_role()) {
            prop_assert!(!has_role(None, role));
        }

        #[test]
        fn admin_satisfies_every_role(role in any_role()) {
            prop_assert!(has_role(Some(&user_with_role(Role::Admin)), role));
        }

        #[test]
        fn require_admin_is_exact(role in any_role()) {
            prop_assert_eq!(require_admin(Some(&user_with_role(role))), role == Role::Admin);
        }

        #[test]
        fn require_vendor_is_exact(role in any_role()) {
            prop_assert_eq!(require_vendor(Some(&user_with_role(role))), role == Role::Vendor);
        }
    }

    #[test]
    fn vendor_and_finance_satisfy_only_themselves() {
        for role in Role::all() {
            let vendor = user_with_role(Role::Vendor);
            let finance = user_with_role(Role::Finance);
            assert_eq!(has_role(Some(&vendor), *role), *role == Role::Vendor);
            assert_eq!(has_role(Some(&finance), *role), *role == Role::Finance);
        }
    }

    #[test]
    fn convenience_predicates_follow_the_hierarchy() {
        let manager = user_with_role(Role::Manager);
        assert!(require_buyer(Some(&manager)));
        assert!(require_manager(Some(&manager)));
        assert!(!require_finance(Some(&manager)));
        assert!(!require_approver(Some(&manager)));

        let admin = user_with_role(Role::Admin);
        assert!(require_finance(Some(&admin)));
        assert!(require_approver(Some(&admin)));
        assert!(!require_vendor(Some(&admin)));
    }

    #[test]
    fn deactivated_users_fail_every_predicate() {
        let admin = user_with_role(Role::Admin).with_active(false);
        assert!(!has_role(Some(&admin), Role::User));
        assert!(!require_admin(Some(&admin)));
        assert_eq!(role_based_redirect(Some(&admin)), "/login");
    }

    #[test]
    fn redirects_follow_role() {
        let cases = [
            (Role::Admin, "/admin/dashboard"),
            (Role::Buyer, "/buyer/dashboard"),
            (Role::Manager, "/buyer/dashboard"),
            (Role::Approver, "/buyer/dashboard"),
            (Role::Finance, "/finance/dashboard"),
            (Role::Vendor, "/vendor/dashboard"),
            (Role::User, "/business/dashboard"),
        ];
        for (role, expected) in cases {
            assert_eq!(role_based_redirect(Some(&user_with_role(role))), expected);
        }
        assert_eq!(role_based_redirect(None), "/login");
    }

    #[test]
    fn route_rules_apply_per_prefix() {
        let admin = user_with_role(Role::Admin);
        let manager = user_with_role(Role::Manager);
        let vendor = user_with_role(Role::Vendor);

        assert!(is_route_allowed("/admin/users", Some(&admin)));
        assert!(!is_route_allowed("/admin/users", Some(&manager)));
        assert!(is_route_allowed("/buyer/tenders", Some(&manager)));
        assert!(is_route_allowed("/finance", Some(&admin)));
        assert!(!is_route_allowed("/finance/invoices", Some(&manager)));
        assert!(is_route_allowed("/vendor/bids?tab=open", Some(&vendor)));
        assert!(!is_route_allowed("/vendor/bids", Some(&admin)));
    }

    #[test]
    fn unknown_paths_are_open() {
        let vendor = user_with_role(Role::Vendor);
        assert!(is_route_allowed("/profile", Some(&vendor)));
        assert!(is_route_allowed("/administrator", Some(&vendor)));
        assert!(is_route_allowed("/", None));
    }
}
