use std::fmt::{Debug, Formatter};

use async_trait::async_trait;
use procura_core::{AccessToken, AppResult, TenantId};
use procura_domain::{EmailAddress, SessionUser, UserId};

use crate::BackendScope;

/// Email and password submitted to a portal login form.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    /// Login email.
    pub email: EmailAddress,
    /// Plain-text password, forwarded once to the backend.
    pub password: String,
    /// Tenant the login form was opened for, if any.
    pub tenant_id: Option<TenantId>,
}

impl Debug for LoginCredentials {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// Token and user returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    /// Bearer token for later backend calls.
    pub token: AccessToken,
    /// Signed-in user as reported by the backend.
    pub user: SessionUser,
}

/// Validated self-service profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New display name, if changed.
    pub display_name: Option<String>,
    /// New email, if changed.
    pub email: Option<EmailAddress>,
}

/// Port for the backend's authentication and profile endpoints.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchanges credentials for a token and user.
    async fn login(&self, credentials: LoginCredentials) -> AppResult<AuthenticatedSession>;

    /// Updates the user's profile and returns the stored user.
    async fn update_profile(
        &self,
        scope: &BackendScope,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> AppResult<SessionUser>;
}
