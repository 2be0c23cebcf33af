use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use procura_application::{
    AuthGateway, AuthenticatedSession, AuthorizationEngine, BackendScope, CreateRbacRoleInput,
    LoginCredentials, ProfileUpdate, RbacAdminService, RbacRepository, RouteGuard,
    SessionContext, SessionService,
};
use procura_core::{AccessToken, AppError, AppResult, TenantId};
use procura_domain::{EmailAddress, PermissionMap, RbacRole, Role, SessionUser, UserId};
use procura_infrastructure::InMemoryRbacRepository;
use tokio::sync::Mutex;
use tower_sessions::{MemoryStore, Session};

use crate::state::AppState;

pub const TENANT: &str = "acme";
pub const PASSWORD: &str = "correct horse";

#[derive(Default)]
pub struct FakeAuthGateway {
    users: Mutex<HashMap<String, SessionUser>>,
    profile_fields_only: bool,
}

impl FakeAuthGateway {
    pub async fn with_user(self, user: SessionUser) -> Self {
        self.users
            .lock()
            .await
            .insert(user.email().as_str().to_owned(), user);
        self
    }

    /// Answers profile updates with id, email, role and display name only,
    /// leaving out tenant and RBAC names.
    pub fn with_profile_fields_only(mut self) -> Self {
        self.profile_fields_only = true;
        self
    }
}

#[async_trait]
impl AuthGateway for FakeAuthGateway {
    async fn login(&self, credentials: LoginCredentials) -> AppResult<AuthenticatedSession> {
        let users = self.users.lock().await;
        let user = users
            .get(credentials.email.as_str())
            .filter(|_| credentials.password == PASSWORD)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_owned()))?;

        Ok(AuthenticatedSession {
            token: AccessToken::new(format!("token-{}", user.id()))?,
            user,
        })
    }

    async fn update_profile(
        &self,
        _scope: &BackendScope,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> AppResult<SessionUser> {
        let mut users = self.users.lock().await;
        let (key, user) = users
            .iter()
            .find(|(_, user)| user.id() == user_id)
            .map(|(key, user)| (key.clone(), user.clone()))
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;

        let mut updated = user;
        if let Some(display_name) = update.display_name {
            updated = updated.with_display_name(Some(display_name));
        }
        if let Some(email) = update.email {
            updated = updated.with_email(email);
        }

        users.remove(&key);
        users.insert(updated.email().as_str().to_owned(), updated.clone());

        if self.profile_fields_only {
            return Ok(SessionUser::new(
                updated.id().clone(),
                updated.email().clone(),
                updated.role(),
            )
            .with_display_name(updated.display_name().map(str::to_owned)));
        }
        Ok(updated)
    }
}

pub fn user(id: &str, role: Role) -> SessionUser {
    tenantless_user(id, role).with_tenant(TenantId::new(TENANT).ok())
}

/// A user the backend reports without a `tenantId`.
pub fn tenantless_user(id: &str, role: Role) -> SessionUser {
    SessionUser::new(
        UserId::new(id).unwrap_or_else(|_| unreachable!()),
        EmailAddress::new(format!("{id}@acme.test")).unwrap_or_else(|_| unreachable!()),
        role,
    )
}

pub fn signed_in(user: SessionUser) -> SessionContext {
    let token = AccessToken::new(format!("token-{}", user.id())).ok();
    SessionContext::authenticated(user, token)
}

pub fn backend_scope() -> BackendScope {
    BackendScope {
        token: AccessToken::new("seed-token").unwrap_or_else(|_| unreachable!()),
        tenant_id: TenantId::new(TENANT).ok(),
    }
}

pub async fn seed_role(
    repository: &InMemoryRbacRepository,
    role_name: &str,
    permissions: PermissionMap,
) -> RbacRole {
    repository
        .create_role(
            &backend_scope(),
            CreateRbacRoleInput {
                role_name: role_name.to_owned(),
                description: None,
                permissions,
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!())
}

pub fn app_state(
    auth_gateway: FakeAuthGateway,
    repository: Arc<InMemoryRbacRepository>,
) -> AppState {
    let authorization_engine = AuthorizationEngine::default();

    AppState {
        session_service: SessionService::new(Arc::new(auth_gateway), repository.clone()),
        rbac_admin_service: RbacAdminService::new(authorization_engine.clone(), repository),
        route_guard: RouteGuard::new(authorization_engine.clone()),
        authorization_engine,
        frontend_url: "http://localhost:3000".to_owned(),
    }
}

pub fn empty_session() -> Session {
    Session::new(None, Arc::new(MemoryStore::default()), None)
}
