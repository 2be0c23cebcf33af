//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod navigation;
mod portal;
mod rbac;
mod role;
mod user;

pub use navigation::{NavItem, NavSection};
pub use portal::{DEFAULT_LOGIN_PATH, Portal, UNAUTHORIZED_PATH, path_has_prefix};
pub use rbac::{PermissionMap, RbacRole, RbacRoleAssignment, RbacRoleId, RbacSnapshot};
pub use role::Role;
pub use user::{EmailAddress, SessionUser, UserId};
