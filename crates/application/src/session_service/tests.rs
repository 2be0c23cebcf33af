use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use procura_core::{AccessToken, AppError, AppResult, TenantId};
use procura_domain::{
    EmailAddress, PermissionMap, RbacRole, RbacRoleAssignment, RbacRoleId, Role, SessionUser,
    UserId,
};
use tokio::sync::Mutex;

use crate::{
    AssignRbacRolesInput, AuthGateway, AuthenticatedSession, AuthorizationEngine, BackendScope,
    CreateRbacRoleInput, LoginCredentials, ProfileUpdate, RbacRepository, SessionContext,
    UpdateRbacRoleInput,
};

use super::SessionService;

fn tenant() -> TenantId {
    TenantId::new("acme").unwrap_or_else(|_| unreachable!())
}

fn stored_user(active: bool) -> SessionUser {
    SessionUser::new(
        UserId::new("u-1").unwrap_or_else(|_| unreachable!()),
        EmailAddress::new("buyer@acme.com").unwrap_or_else(|_| unreachable!()),
        Role::User,
    )
    .with_tenant(Some(tenant()))
    .with_rbac_roles(["FROM_LOGIN"])
    .with_active(active)
}

struct FakeAuthGateway {
    user: SessionUser,
    password: String,
    last_login_tenant: Mutex<Option<TenantId>>,
    last_update: Mutex<Option<ProfileUpdate>>,
}

impl FakeAuthGateway {
    fn new(user: SessionUser) -> Self {
        Self {
            user,
            password: "correct horse".to_owned(),
            last_login_tenant: Mutex::new(None),
            last_update: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AuthGateway for FakeAuthGateway {
    async fn login(&self, credentials: LoginCredentials) -> AppResult<AuthenticatedSession> {
        if credentials.email != *self.user.email() || credentials.password != self.password {
            return Err(AppError::Unauthorized("invalid credentials".to_owned()));
        }
        *self.last_login_tenant.lock().await = credentials.tenant_id;

        Ok(AuthenticatedSession {
            token: AccessToken::new("token-1")?,
            user: self.user.clone(),
        })
    }

    async fn update_profile(
        &self,
        _scope: &BackendScope,
        _user_id: &UserId,
        update: ProfileUpdate,
    ) -> AppResult<SessionUser> {
        *self.last_update.lock().await = Some(update.clone());
        // Answers with only the profile fields, the way the backend's
        // profile endpoint does.
        let email = update.email.unwrap_or_else(|| self.user.email().clone());
        Ok(
            SessionUser::new(self.user.id().clone(), email, self.user.role())
                .with_display_name(update.display_name),
        )
    }
}

struct FakeRbacRepository {
    available: bool,
}

#[async_trait]
impl RbacRepository for FakeRbacRepository {
    async fn list_roles(&self, scope: &BackendScope) -> AppResult<Vec<RbacRole>> {
        if !self.available {
            return Err(AppError::Internal("backend unavailable".to_owned()));
        }

        Ok(vec![RbacRole::new(
            RbacRoleId::new("r-1")?,
            scope.require_tenant()?.clone(),
            "TENDER_READER",
            PermissionMap::new().with_grants("tenders", ["read"])?,
        )?])
    }

    async fn create_role(
        &self,
        _scope: &BackendScope,
        _input: CreateRbacRoleInput,
    ) -> AppResult<RbacRole> {
        Err(AppError::Internal("not used".to_owned()))
    }

    async fn update_role(
        &self,
        _scope: &BackendScope,
        _role_id: &RbacRoleId,
        _input: UpdateRbacRoleInput,
    ) -> AppResult<RbacRole> {
        Err(AppError::Internal("not used".to_owned()))
    }

    async fn list_user_assignments(
        &self,
        scope: &BackendScope,
        user_id: &UserId,
    ) -> AppResult<Vec<RbacRoleAssignment>> {
        Ok(vec![RbacRoleAssignment::new(
            user_id.clone(),
            RbacRoleId::new("r-1")?,
            "TENDER_READER",
            scope.require_tenant()?.clone(),
            Utc::now(),
        )])
    }

    async fn assign_roles(
        &self,
        _scope: &BackendScope,
        _user_id: &UserId,
        _input: AssignRbacRolesInput,
    ) -> AppResult<Vec<RbacRoleAssignment>> {
        Err(AppError::Internal("not used".to_owned()))
    }

    async fn remove_roles(
        &self,
        _scope: &BackendScope,
        _user_id: &UserId,
        _role_ids: &[RbacRoleId],
    ) -> AppResult<()> {
        Err(AppError::Internal("not used".to_owned()))
    }
}

fn service(user: SessionUser, rbac_available: bool) -> (SessionService, Arc<FakeAuthGateway>) {
    let gateway = Arc::new(FakeAuthGateway::new(user));
    (
        SessionService::new(
            gateway.clone(),
            Arc::new(FakeRbacRepository {
                available: rbac_available,
            }),
        ),
        gateway,
    )
}

fn signed_in(user: SessionUser) -> SessionContext {
    SessionContext::authenticated(user, AccessToken::new("token-1").ok())
}

#[tokio::test]
async fn login_returns_token_and_user() {
    let (service, _) = service(stored_user(true), true);

    let session = service.login("Buyer@Acme.com", "correct horse", None).await;
    assert!(session.is_ok());
    assert!(
        session
            .map(|session| session.token.expose() == "token-1")
            .unwrap_or(false)
    );
}

#[tokio::test]
async fn login_rejects_bad_input_and_credentials() {
    let (service, _) = service(stored_user(true), true);

    assert!(matches!(
        service.login("not-an-email", "x", None).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        service.login("buyer@acme.com", "", None).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        service.login("buyer@acme.com", "wrong", None).await,
        Err(AppError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn login_tenant_binds_users_reported_without_one() {
    let user = stored_user(true).with_tenant(None);
    let (service, gateway) = service(user, true);

    let session = service
        .login("buyer@acme.com", "correct horse", Some(" acme "))
        .await;
    let Ok(session) = session else {
        unreachable!("login should succeed");
    };
    assert_eq!(session.user.tenant_id(), Some(&tenant()));
    assert_eq!(*gateway.last_login_tenant.lock().await, Some(tenant()));

    let context = signed_in(session.user);
    let snapshot = service.fetch_rbac_snapshot(&context).await;
    assert!(snapshot.is_ok_and(|snapshot| snapshot.is_some()));
}

#[tokio::test]
async fn backend_tenant_wins_over_login_tenant() {
    let (service, _) = service(stored_user(true), true);

    let session = service
        .login("buyer@acme.com", "correct horse", Some("globex"))
        .await;
    assert!(session.is_ok_and(|session| session.user.tenant_id() == Some(&tenant())));
}

#[tokio::test]
async fn malformed_login_tenant_is_rejected() {
    let (service, gateway) = service(stored_user(true).with_tenant(None), true);

    assert!(matches!(
        service
            .login("buyer@acme.com", "correct horse", Some("acme corp"))
            .await,
        Err(AppError::Validation(_))
    ));
    assert!(gateway.last_login_tenant.lock().await.is_none());

    let session = service
        .login("buyer@acme.com", "correct horse", Some("  "))
        .await;
    assert!(session.is_ok_and(|session| session.user.tenant_id().is_none()));
}

#[tokio::test]
async fn deactivated_accounts_cannot_sign_in() {
    let (service, _) = service(stored_user(false), true);
    assert!(matches!(
        service.login("buyer@acme.com", "correct horse", None).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn snapshot_drives_permissions() {
    let (service, _) = service(stored_user(true), true);
    let context = signed_in(stored_user(true));

    let snapshot = service.load_rbac_snapshot(&context).await;
    assert!(snapshot.is_some());

    let context = context.with_rbac_snapshot(snapshot);
    let engine = AuthorizationEngine::default();
    assert!(engine.can_perform(&context, "tenders", "read"));
    assert_eq!(context.held_rbac_role_names(), vec!["TENDER_READER"]);
}

#[tokio::test]
async fn snapshot_failure_falls_back_to_login_roles() {
    let (service, _) = service(stored_user(true), false);
    let context = signed_in(stored_user(true));

    assert!(service.fetch_rbac_snapshot(&context).await.is_err());

    let snapshot = service.load_rbac_snapshot(&context).await;
    assert!(snapshot.is_none());

    let context = context.with_rbac_snapshot(snapshot);
    assert_eq!(context.held_rbac_role_names(), vec!["FROM_LOGIN"]);
}

#[tokio::test]
async fn users_without_tenant_get_no_snapshot() {
    let user = stored_user(true).with_tenant(None);
    let (service, _) = service(user.clone(), true);

    let snapshot = service.fetch_rbac_snapshot(&signed_in(user)).await;
    assert!(matches!(snapshot, Ok(None)));
}

#[tokio::test]
async fn profile_updates_are_validated() {
    let (service, gateway) = service(stored_user(true), true);
    let context = signed_in(stored_user(true));

    let updated = service
        .update_profile(
            &context,
            Some("  Jane Buyer ".to_owned()),
            Some("JANE@acme.com".to_owned()),
        )
        .await;
    assert!(updated.is_ok());
    assert_eq!(
        updated
            .as_ref()
            .map(|user| user.email().as_str().to_owned())
            .unwrap_or_default(),
        "jane@acme.com"
    );
    assert_eq!(
        gateway
            .last_update
            .lock()
            .await
            .as_ref()
            .and_then(|update| update.display_name.clone()),
        Some("Jane Buyer".to_owned())
    );

    assert!(matches!(
        service.update_profile(&context, None, None).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        service
            .update_profile(&context, Some("   ".to_owned()), None)
            .await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        service
            .update_profile(&context, None, Some("broken".to_owned()))
            .await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn profile_update_keeps_tenant_and_rbac_names() {
    let (service, _) = service(stored_user(true), true);
    let context = signed_in(stored_user(true).with_display_name(Some("Jane".to_owned())));

    let updated = service
        .update_profile(&context, None, Some("jane@acme.com".to_owned()))
        .await;
    let Ok(updated) = updated else {
        unreachable!("profile update should succeed");
    };

    assert_eq!(updated.email().as_str(), "jane@acme.com");
    assert_eq!(updated.display_name(), Some("Jane"));
    assert_eq!(updated.tenant_id(), Some(&tenant()));
    assert_eq!(updated.rbac_roles(), ["FROM_LOGIN".to_owned()]);
    assert_eq!(updated.role(), Role::User);
}

#[tokio::test]
async fn profile_update_requires_session_token() {
    let (service, _) = service(stored_user(true), true);
    let context = SessionContext::authenticated(stored_user(true), None);

    assert!(matches!(
        service
            .update_profile(&context, Some("Jane".to_owned()), None)
            .await,
        Err(AppError::Unauthorized(_))
    ));
}
