//! Application services and ports.
//!
//! Authorization, navigation filtering and route guarding are synchronous
//! functions of a [`SessionContext`]; only the backend ports are async.

#![forbid(unsafe_code)]

mod auth_ports;
mod authorization_engine;
mod navigation_filter;
mod rbac_admin_service;
mod rbac_ports;
mod role_name_matcher;
mod route_guard;
mod session_context;
mod session_service;

/// Hierarchy-based role predicates over the enum role.
pub mod role_guards;

pub use auth_ports::{AuthGateway, AuthenticatedSession, LoginCredentials, ProfileUpdate};
pub use authorization_engine::AuthorizationEngine;
pub use navigation_filter::filter_navigation;
pub use rbac_admin_service::{RBAC_MANAGE_ACTION, RBAC_PERMISSION_DOMAIN, RbacAdminService};
pub use rbac_ports::{
    AssignRbacRolesInput, CreateRbacRoleInput, RbacRepository, UpdateRbacRoleInput,
};
pub use role_name_matcher::RoleNameMatcher;
pub use route_guard::{GuardDecision, RouteGuard, TENANT_QUERY_PARAMETER};
pub use session_context::{BackendScope, SessionContext};
pub use session_service::{MAX_DISPLAY_NAME_LENGTH, SessionService};
