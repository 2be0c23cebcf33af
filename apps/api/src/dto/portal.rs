use std::collections::BTreeMap;

use procura_application::GuardDecision;
use procura_domain::{NavItem, NavSection, PermissionMap};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Menu entry visible to the caller.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/nav-item-response.ts"
)]
pub struct NavItemResponse {
    pub id: String,
    pub label: String,
    pub href: String,
    pub badge: Option<String>,
    pub children: Vec<NavItemResponse>,
}

impl From<&NavItem> for NavItemResponse {
    fn from(value: &NavItem) -> Self {
        Self {
            id: value.id().to_owned(),
            label: value.label().to_owned(),
            href: value.href().to_owned(),
            badge: value.badge().map(ToOwned::to_owned),
            children: value.children().iter().map(Self::from).collect(),
        }
    }
}

/// Menu section visible to the caller.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/nav-section-response.ts"
)]
pub struct NavSectionResponse {
    pub section: String,
    pub items: Vec<NavItemResponse>,
}

impl From<&NavSection> for NavSectionResponse {
    fn from(value: &NavSection) -> Self {
        Self {
            section: value.section().to_owned(),
            items: value.items().iter().map(NavItemResponse::from).collect(),
        }
    }
}

/// Query for a page guard decision.
#[derive(Debug, Deserialize)]
pub struct GuardQuery {
    pub path: String,
}

/// Page guard outcome.
#[derive(Debug, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/guard-decision-response.ts"
)]
pub struct GuardDecisionResponse {
    pub decision: String,
    pub location: Option<String>,
}

impl From<GuardDecision> for GuardDecisionResponse {
    fn from(value: GuardDecision) -> Self {
        let decision = match &value {
            GuardDecision::Render => "render",
            GuardDecision::RedirectToLogin { .. } => "redirect_to_login",
            GuardDecision::RedirectToUnauthorized { .. } => "redirect_to_unauthorized",
        };

        Self {
            decision: decision.to_owned(),
            location: value.location().map(ToOwned::to_owned),
        }
    }
}

/// How a role list is matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-check-mode.ts"
)]
pub enum AccessCheckMode {
    #[default]
    Any,
    All,
}

/// Incoming payload for a role-based access check.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-check-request.ts"
)]
pub struct AccessCheckRequest {
    pub roles: Vec<String>,
    #[serde(default)]
    pub mode: AccessCheckMode,
}

/// Access check result.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-check-response.ts"
)]
pub struct AccessCheckResponse {
    pub allowed: bool,
}

/// Union of permission grants from the caller's effective RBAC roles.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permissions-response.ts"
)]
pub struct PermissionsResponse {
    pub permissions: BTreeMap<String, Vec<String>>,
}

impl From<&PermissionMap> for PermissionsResponse {
    fn from(value: &PermissionMap) -> Self {
        Self {
            permissions: value
                .iter()
                .map(|(domain, actions)| (domain.to_owned(), actions.iter().cloned().collect()))
                .collect(),
        }
    }
}
