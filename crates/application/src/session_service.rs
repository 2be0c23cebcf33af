use std::sync::Arc;

use chrono::Utc;
use procura_core::{AppError, AppResult, TenantId};
use procura_domain::{EmailAddress, RbacSnapshot, SessionUser};
use tracing::{info, warn};

use crate::{
    AuthGateway, AuthenticatedSession, LoginCredentials, ProfileUpdate, RbacRepository,
    SessionContext,
};

/// Longest accepted display name, in characters.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 120;

/// Application service for sign-in, RBAC snapshot loading and profile updates.
#[derive(Clone)]
pub struct SessionService {
    auth_gateway: Arc<dyn AuthGateway>,
    rbac_repository: Arc<dyn RbacRepository>,
}

impl SessionService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(auth_gateway: Arc<dyn AuthGateway>, rbac_repository: Arc<dyn RbacRepository>) -> Self {
        Self {
            auth_gateway,
            rbac_repository,
        }
    }

    /// Signs a user in against the backend.
    ///
    /// `tenant` is the tenant the login form was opened for. It binds the
    /// session when the backend reports the user without one.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        tenant: Option<&str>,
    ) -> AppResult<AuthenticatedSession> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(AppError::Validation("password must not be empty".to_owned()));
        }
        let tenant_id = tenant
            .filter(|value| !value.trim().is_empty())
            .map(TenantId::new)
            .transpose()?;

        let mut session = self
            .auth_gateway
            .login(LoginCredentials {
                email,
                password: password.to_owned(),
                tenant_id: tenant_id.clone(),
            })
            .await?;

        if session.user.tenant_id().is_none() {
            session.user = session.user.with_tenant(tenant_id);
        }

        if !session.user.is_active() {
            warn!(user_id = %session.user.id(), "login rejected for deactivated account");
            return Err(AppError::Forbidden("account is deactivated".to_owned()));
        }

        info!(
            user_id = %session.user.id(),
            role = session.user.role().as_str(),
            tenant_id = session.user.tenant_id().map(|tenant_id| tenant_id.as_str()),
            "user signed in"
        );

        Ok(session)
    }

    /// Fetches the tenant roles and the user's assignments.
    ///
    /// Returns `None` for users that are not bound to a tenant.
    pub async fn fetch_rbac_snapshot(
        &self,
        context: &SessionContext,
    ) -> AppResult<Option<RbacSnapshot>> {
        let scope = context.backend_scope()?;
        let Some(user) = context.active_user() else {
            return Ok(None);
        };
        if scope.tenant_id.is_none() {
            return Ok(None);
        }

        let roles = self.rbac_repository.list_roles(&scope).await?;
        let assignments = self
            .rbac_repository
            .list_user_assignments(&scope, user.id())
            .await?;

        Ok(Some(RbacSnapshot::new(roles, assignments, Utc::now())))
    }

    /// Fetches the RBAC snapshot, falling back to `None` on failure so the
    /// session keeps the role names reported at login.
    pub async fn load_rbac_snapshot(&self, context: &SessionContext) -> Option<RbacSnapshot> {
        match self.fetch_rbac_snapshot(context).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(
                    user_id = context.active_user().map(|user| user.id().as_str()),
                    error = %error,
                    "rbac snapshot unavailable; using login role names"
                );
                None
            }
        }
    }

    /// Validates and applies a self-service profile update.
    ///
    /// Only the display name and email are taken from the backend's answer;
    /// tenant, role and RBAC names stay as they were at sign-in.
    pub async fn update_profile(
        &self,
        context: &SessionContext,
        display_name: Option<String>,
        email: Option<String>,
    ) -> AppResult<SessionUser> {
        let scope = context.backend_scope()?;
        let user = context
            .active_user()
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

        let update = validated_profile_update(display_name, email)?;
        let updated = self
            .auth_gateway
            .update_profile(&scope, user.id(), update)
            .await?;

        info!(user_id = %user.id(), "profile updated");

        let display_name = updated
            .display_name()
            .or(user.display_name())
            .map(str::to_owned);
        Ok(user
            .clone()
            .with_display_name(display_name)
            .with_email(updated.email().clone()))
    }
}

fn validated_profile_update(
    display_name: Option<String>,
    email: Option<String>,
) -> AppResult<ProfileUpdate> {
    let display_name = display_name
        .map(|value| {
            let value = value.trim().to_owned();
            if value.is_empty() {
                return Err(AppError::Validation(
                    "display name must not be empty".to_owned(),
                ));
            }
            if value.chars().count() > MAX_DISPLAY_NAME_LENGTH {
                return Err(AppError::Validation(format!(
                    "display name must not exceed {MAX_DISPLAY_NAME_LENGTH} characters"
                )));
            }

            Ok(value)
        })
        .transpose()?;
    let email = email.map(EmailAddress::new).transpose()?;

    if display_name.is_none() && email.is_none() {
        return Err(AppError::Validation(
            "profile update must change at least one field".to_owned(),
        ));
    }

    Ok(ProfileUpdate {
        display_name,
        email,
    })
}

#[cfg(test)]
mod tests;
