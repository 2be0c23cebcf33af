use procura_application::SessionContext;
use procura_core::{AccessToken, AppError};
use procura_domain::{RbacSnapshot, SessionUser};
use tower_sessions::Session;

use crate::error::ApiResult;

mod profile;
mod session;

pub use profile::update_profile_handler;
pub use session::{login_handler, logout_handler, me_handler, refresh_rbac_handler};

pub const SESSION_TOKEN_KEY: &str = "token";
pub const SESSION_USER_KEY: &str = "user";
pub const SESSION_RBAC_SNAPSHOT_KEY: &str = "rbac_snapshot";

/// Rebuilds the authorization context from the persisted session values.
///
/// A session without a stored user yields an anonymous context.
pub async fn load_session_context(session: &Session) -> ApiResult<SessionContext> {
    let Some(user) = session
        .get::<SessionUser>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session user: {error}")))?
    else {
        return Ok(SessionContext::anonymous());
    };

    let token = session
        .get::<AccessToken>(SESSION_TOKEN_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session token: {error}")))?;
    let rbac_snapshot = session
        .get::<RbacSnapshot>(SESSION_RBAC_SNAPSHOT_KEY)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to read session rbac snapshot: {error}"))
        })?;

    Ok(SessionContext::authenticated(user, token).with_rbac_snapshot(rbac_snapshot))
}

/// Persists the user, token and RBAC snapshot of `context`.
async fn store_session_context(session: &Session, context: &SessionContext) -> ApiResult<()> {
    if let Some(user) = context.user() {
        session
            .insert(SESSION_USER_KEY, user)
            .await
            .map_err(|error| AppError::Internal(format!("failed to persist session: {error}")))?;
    }

    if let Some(token) = context.token() {
        session
            .insert(SESSION_TOKEN_KEY, token)
            .await
            .map_err(|error| AppError::Internal(format!("failed to persist session: {error}")))?;
    }

    store_rbac_snapshot(session, context.rbac_snapshot()).await
}

async fn store_rbac_snapshot(
    session: &Session,
    rbac_snapshot: Option<&RbacSnapshot>,
) -> ApiResult<()> {
    match rbac_snapshot {
        Some(rbac_snapshot) => session
            .insert(SESSION_RBAC_SNAPSHOT_KEY, rbac_snapshot)
            .await
            .map_err(|error| AppError::Internal(format!("failed to persist session: {error}")))?,
        None => {
            session
                .remove_value(SESSION_RBAC_SNAPSHOT_KEY)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to clear session rbac snapshot: {error}"))
                })?;
        }
    }

    Ok(())
}
