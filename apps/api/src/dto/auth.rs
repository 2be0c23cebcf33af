use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::SessionUserResponse;

/// Incoming payload for email and password sign-in.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Tenant carried over from the `tenant` query parameter of the login page.
    #[serde(default)]
    pub tenant: Option<String>,
}

/// Sign-in result with the landing route for the user's role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-response.ts"
)]
pub struct LoginResponse {
    pub user: SessionUserResponse,
    pub redirect_to: String,
}

/// Incoming payload for self-service profile changes.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-profile-request.ts"
)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
