mod auth;
mod common;
mod portal;
mod rbac;

pub use auth::{LoginRequest, LoginResponse, UpdateProfileRequest};
pub use common::{HealthResponse, SessionUserResponse};
pub use portal::{
    AccessCheckMode, AccessCheckRequest, AccessCheckResponse, GuardDecisionResponse, GuardQuery,
    NavItemResponse, NavSectionResponse, PermissionsResponse,
};
pub use rbac::{
    AssignRbacRolesRequest, CreateRbacRoleRequest, RbacRoleAssignmentResponse, RbacRoleResponse,
    RemoveRbacRolesRequest, UpdateRbacRoleRequest,
};
