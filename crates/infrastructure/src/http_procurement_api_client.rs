use std::time::Duration;

use async_trait::async_trait;
use procura_application::{
    AssignRbacRolesInput, AuthGateway, AuthenticatedSession, BackendScope, CreateRbacRoleInput,
    LoginCredentials, ProfileUpdate, RbacRepository, UpdateRbacRoleInput,
};
use procura_core::{AccessToken, AppError, AppResult};
use procura_domain::{RbacRole, RbacRoleAssignment, RbacRoleId, SessionUser, UserId};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

mod wire;

use wire::{
    AssignmentPayload, CreateRolePayload, ErrorPayload, LoginPayload, LoginResponsePayload,
    ProfilePayload, RbacRolePayload, RoleIdsPayload, UpdateRolePayload, UserPayload,
};

/// Header carrying the tenant of the calling session.
pub const TENANT_HEADER: &str = "X-Tenant-Id";

/// REST adapter for the procurement backend's auth, profile and RBAC
/// endpoints.
#[derive(Debug, Clone)]
pub struct HttpProcurementApiClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpProcurementApiClient {
    /// Creates a client rooted at `base_url`, e.g. `https://api.example.com/v1`.
    pub fn new(http_client: reqwest::Client, base_url: Url) -> AppResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "backend url '{base_url}' cannot be used as a base url"
            )));
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Creates a client with its own connection pool and request timeout.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build backend http client: {error}"))
            })?;

        Self::new(http_client, base_url)
    }

    /// Returns the configured backend root.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!("backend url '{}' has no path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn authorized(
        &self,
        builder: reqwest::RequestBuilder,
        scope: &BackendScope,
    ) -> reqwest::RequestBuilder {
        let builder = builder.bearer_auth(scope.token.expose());
        match &scope.tenant_id {
            Some(tenant_id) => builder.header(TENANT_HEADER, tenant_id.as_str()),
            None => builder,
        }
    }

    fn login_request(&self, credentials: &LoginCredentials) -> AppResult<reqwest::RequestBuilder> {
        let builder = self
            .http_client
            .post(self.endpoint(&["auth", "login"])?)
            .json(&LoginPayload {
                email: credentials.email.as_str(),
                password: credentials.password.as_str(),
            });

        Ok(match &credentials.tenant_id {
            Some(tenant_id) => builder.header(TENANT_HEADER, tenant_id.as_str()),
            None => builder,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        operation: &str,
    ) -> AppResult<T> {
        let response = self.send(builder, operation).await?;
        response.json::<T>().await.map_err(|error| {
            AppError::Internal(format!(
                "backend returned an unreadable response for {operation}: {error}"
            ))
        })
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        operation: &str,
    ) -> AppResult<reqwest::Response> {
        let response = builder.send().await.map_err(|error| {
            warn!(operation, error = %error, "backend request failed");
            AppError::Internal(format!("backend request for {operation} failed: {error}"))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(operation, status = status.as_u16(), "backend rejected request");
        Err(error_for_status(status, &body))
    }
}

/// Maps a non-success backend status onto the matching application error.
pub(crate) fn error_for_status(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(ErrorPayload::into_message)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected backend response")
                .to_owned()
        });

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        other => AppError::Internal(format!("backend responded with {other}: {message}")),
    }
}

#[async_trait]
impl AuthGateway for HttpProcurementApiClient {
    async fn login(&self, credentials: LoginCredentials) -> AppResult<AuthenticatedSession> {
        let response: LoginResponsePayload = self
            .send_json(self.login_request(&credentials)?, "login")
            .await?;

        let mut user = response.user.into_session_user()?;
        if user.tenant_id().is_none() {
            user = user.with_tenant(credentials.tenant_id);
        }

        Ok(AuthenticatedSession {
            token: AccessToken::new(response.token)?,
            user,
        })
    }

    async fn update_profile(
        &self,
        scope: &BackendScope,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> AppResult<SessionUser> {
        let url = self.endpoint(&["users", user_id.as_str(), "profile"])?;
        let user: UserPayload = self
            .send_json(
                self.authorized(self.http_client.put(url), scope)
                    .json(&ProfilePayload::from(&update)),
                "profile update",
            )
            .await?;

        user.into_session_user()
    }
}

#[async_trait]
impl RbacRepository for HttpProcurementApiClient {
    async fn list_roles(&self, scope: &BackendScope) -> AppResult<Vec<RbacRole>> {
        let url = self.endpoint(&["rbac", "roles"])?;
        let roles: Vec<RbacRolePayload> = self
            .send_json(self.authorized(self.http_client.get(url), scope), "role listing")
            .await?;

        roles
            .into_iter()
            .map(|role| role.into_rbac_role(scope))
            .collect()
    }

    async fn create_role(
        &self,
        scope: &BackendScope,
        input: CreateRbacRoleInput,
    ) -> AppResult<RbacRole> {
        let url = self.endpoint(&["rbac", "roles"])?;
        let role: RbacRolePayload = self
            .send_json(
                self.authorized(self.http_client.post(url), scope)
                    .json(&CreateRolePayload::from(&input)),
                "role creation",
            )
            .await?;

        role.into_rbac_role(scope)
    }

    async fn update_role(
        &self,
        scope: &BackendScope,
        role_id: &RbacRoleId,
        input: UpdateRbacRoleInput,
    ) -> AppResult<RbacRole> {
        let url = self.endpoint(&["rbac", "roles", role_id.as_str()])?;
        let role: RbacRolePayload = self
            .send_json(
                self.authorized(self.http_client.put(url), scope)
                    .json(&UpdateRolePayload::from(&input)),
                "role update",
            )
            .await?;

        role.into_rbac_role(scope)
    }

    async fn list_user_assignments(
        &self,
        scope: &BackendScope,
        user_id: &UserId,
    ) -> AppResult<Vec<RbacRoleAssignment>> {
        let url = self.endpoint(&["users", user_id.as_str(), "rbac-roles"])?;
        let assignments: Vec<AssignmentPayload> = self
            .send_json(
                self.authorized(self.http_client.get(url), scope),
                "assignment listing",
            )
            .await?;

        assignments
            .into_iter()
            .map(|assignment| assignment.into_assignment(scope))
            .collect()
    }

    async fn assign_roles(
        &self,
        scope: &BackendScope,
        user_id: &UserId,
        input: AssignRbacRolesInput,
    ) -> AppResult<Vec<RbacRoleAssignment>> {
        let url = self.endpoint(&["users", user_id.as_str(), "rbac-roles"])?;
        let assignments: Vec<AssignmentPayload> = self
            .send_json(
                self.authorized(self.http_client.post(url), scope)
                    .json(&RoleIdsPayload::new(&input.role_ids, input.expires_at)),
                "role assignment",
            )
            .await?;

        assignments
            .into_iter()
            .map(|assignment| assignment.into_assignment(scope))
            .collect()
    }

    async fn remove_roles(
        &self,
        scope: &BackendScope,
        user_id: &UserId,
        role_ids: &[RbacRoleId],
    ) -> AppResult<()> {
        let url = self.endpoint(&["users", user_id.as_str(), "rbac-roles"])?;
        self.send(
            self.authorized(self.http_client.delete(url), scope)
                .json(&RoleIdsPayload::new(role_ids, None)),
            "role removal",
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests;
