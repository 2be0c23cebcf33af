use procura_domain::{Portal, UNAUTHORIZED_PATH};
use tracing::debug;
use url::form_urlencoded;

use crate::{AuthorizationEngine, SessionContext, role_guards};

/// Query parameter carrying the tenant slug through login redirects.
pub const TENANT_QUERY_PARAMETER: &str = "tenant";

/// Outcome of guarding one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The page may be rendered.
    Render,
    /// No signed-in user; send the visitor to the portal login.
    RedirectToLogin {
        /// Login route, with the tenant forwarded when present.
        location: String,
    },
    /// Signed in but lacking the portal role.
    RedirectToUnauthorized {
        /// Unauthorized page route.
        location: String,
    },
}

impl GuardDecision {
    /// Returns the redirect target, if the decision redirects.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Render => None,
            Self::RedirectToLogin { location } | Self::RedirectToUnauthorized { location } => {
                Some(location.as_str())
            }
        }
    }

    fn unauthorized() -> Self {
        Self::RedirectToUnauthorized {
            location: UNAUTHORIZED_PATH.to_owned(),
        }
    }
}

/// Per-portal page guard. Pure; re-evaluate it on every navigation.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    engine: AuthorizationEngine,
}

impl RouteGuard {
    /// Creates a guard backed by `engine`.
    #[must_use]
    pub fn new(engine: AuthorizationEngine) -> Self {
        Self { engine }
    }

    /// Decides whether `target` (path with optional query string) may render.
    #[must_use]
    pub fn decide(&self, context: &SessionContext, target: &str) -> GuardDecision {
        let (path, query) = split_target(target);

        let Some(portal) = Portal::from_path(path) else {
            return if role_guards::is_route_allowed(path, context.active_user()) {
                GuardDecision::Render
            } else {
                GuardDecision::unauthorized()
            };
        };

        if portal.is_public_path(path) {
            return GuardDecision::Render;
        }

        self.decide_for_portal(context, portal, tenant_from_query(query).as_deref())
    }

    /// Decides access to a portal's protected pages.
    #[must_use]
    pub fn decide_for_portal(
        &self,
        context: &SessionContext,
        portal: Portal,
        tenant: Option<&str>,
    ) -> GuardDecision {
        if context.active_user().is_none() {
            return GuardDecision::RedirectToLogin {
                location: login_location(portal, tenant),
            };
        }

        if self.portal_allows(context, portal) {
            GuardDecision::Render
        } else {
            debug!(
                portal = portal.as_str(),
                user_id = context.active_user().map(|user| user.id().as_str()),
                "portal access denied"
            );
            GuardDecision::unauthorized()
        }
    }

    /// Returns whether the signed-in user passes the portal's role check.
    #[must_use]
    pub fn portal_allows(&self, context: &SessionContext, portal: Portal) -> bool {
        match portal {
            Portal::Admin => self.engine.is_admin(context),
            Portal::Vendor => self.engine.is_vendor(context),
            Portal::Buyer => {
                self.engine.is_buyer(context)
                    || self.engine.is_manager(context)
                    || self.engine.is_approver(context)
            }
            Portal::Finance => self.engine.is_finance(context),
            Portal::Business => context.active_user().is_some(),
        }
    }
}

fn split_target(target: &str) -> (&str, &str) {
    let target = target.split('#').next().unwrap_or_default();
    target.split_once('?').unwrap_or((target, ""))
}

fn tenant_from_query(query: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == TENANT_QUERY_PARAMETER)
        .map(|(_, value)| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn login_location(portal: Portal, tenant: Option<&str>) -> String {
    match tenant.map(str::trim).filter(|tenant| !tenant.is_empty()) {
        Some(tenant) => format!(
            "{}?{}",
            portal.login_path(),
            form_urlencoded::Serializer::new(String::new())
                .append_pair(TENANT_QUERY_PARAMETER, tenant)
                .finish()
        ),
        None => portal.login_path(),
    }
}

#[cfg(test)]
mod tests {
    use procura_domain::{EmailAddress, Portal, Role, SessionUser, UserId};

    use crate::SessionContext;

    use super::{GuardDecision, RouteGuard};

    fn signed_in(role: Role, rbac_roles: &[&str]) -> SessionContext {
        SessionContext::authenticated(
            SessionUser::new(
                UserId::new("u-1").unwrap_or_else(|_| unreachable!()),
                EmailAddress::new("u@acme.com").unwrap_or_else(|_| unreachable!()),
                role,
            )
            .with_rbac_roles(rbac_roles.iter().copied()),
            None,
        )
    }

    fn login(location: &str) -> GuardDecision {
        GuardDecision::RedirectToLogin {
            location: location.to_owned(),
        }
    }

    fn unauthorized() -> GuardDecision {
        GuardDecision::RedirectToUnauthorized {
            location: "/unauthorized".to_owned(),
        }
    }

    #[test]
    fn vendor_is_turned_away_from_admin_pages() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.decide(&signed_in(Role::Vendor, &[]), "/admin/users"),
            unauthorized()
        );
    }

    #[test]
    fn anonymous_visitor_keeps_tenant_on_login_redirect() {
        let guard = RouteGuard::default();
        let anonymous = SessionContext::anonymous();

        assert_eq!(
            guard.decide(&anonymous, "/vendor/dashboard?tenant=acme"),
            login("/vendor/login?tenant=acme")
        );
        assert_eq!(
            guard.decide(&anonymous, "/vendor/dashboard?tenant="),
            login("/vendor/login")
        );
        assert_eq!(guard.decide(&anonymous, "/finance"), login("/finance/login"));
    }

    #[test]
    fn forwarded_tenant_is_percent_encoded() {
        let decision =
            RouteGuard::default().decide(&SessionContext::anonymous(), "/buyer?tenant=a%26b%20c");
        assert_eq!(decision, login("/buyer/login?tenant=a%26b+c"));
    }

    #[test]
    fn public_portal_pages_always_render() {
        let guard = RouteGuard::default();
        let anonymous = SessionContext::anonymous();
        assert_eq!(guard.decide(&anonymous, "/vendor/login"), GuardDecision::Render);
        assert_eq!(
            guard.decide(&anonymous, "/vendor/register?tenant=acme"),
            GuardDecision::Render
        );
        assert_eq!(
            guard.decide(&anonymous, "/admin/forgot-password"),
            GuardDecision::Render
        );
    }

    #[test]
    fn buyer_portal_admits_managers_and_approvers() {
        let guard = RouteGuard::default();
        for role in [Role::Buyer, Role::Manager, Role::Approver] {
            assert_eq!(
                guard.decide(&signed_in(role, &[]), "/buyer/tenders"),
                GuardDecision::Render
            );
        }
        assert_eq!(
            guard.decide(&signed_in(Role::Finance, &[]), "/buyer/tenders"),
            unauthorized()
        );
    }

    #[test]
    fn rbac_names_open_portals() {
        let guard = RouteGuard::default();
        let context = signed_in(Role::User, &["Finance"]);
        assert!(guard.portal_allows(&context, Portal::Finance));
        assert!(!guard.portal_allows(&context, Portal::Admin));
    }

    #[test]
    fn business_portal_admits_any_signed_in_user() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.decide(&signed_in(Role::Vendor, &[]), "/business/catalog"),
            GuardDecision::Render
        );
        assert_eq!(
            guard.decide(
                &SessionContext::authenticated(
                    SessionUser::new(
                        UserId::new("u-2").unwrap_or_else(|_| unreachable!()),
                        EmailAddress::new("x@acme.com").unwrap_or_else(|_| unreachable!()),
                        Role::User,
                    )
                    .with_active(false),
                    None,
                ),
                "/business/catalog"
            ),
            login("/business/login")
        );
    }

    #[test]
    fn paths_outside_portals_render() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.decide(&SessionContext::anonymous(), "/profile"),
            GuardDecision::Render
        );
        assert_eq!(
            guard.decide(&signed_in(Role::Vendor, &[]), "/administrator"),
            GuardDecision::Render
        );
    }

    #[test]
    fn redirect_location_is_exposed() {
        assert_eq!(unauthorized().location(), Some("/unauthorized"));
        assert_eq!(GuardDecision::Render.location(), None);
    }
}
