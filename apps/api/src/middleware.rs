use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use procura_core::AppError;
use tower_sessions::Session;

use crate::auth::load_session_context;
use crate::error::ApiResult;
use crate::state::AppState;

/// Rejects requests without an active signed-in user and exposes the session
/// context to handlers as an extension.
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let context = load_session_context(&session).await?;
    if context.active_user().is_none() {
        return Err(AppError::Unauthorized("authentication required".to_owned()).into());
    }

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if headers
            .get("sec-fetch-site")
            .is_some_and(|fetch_site| fetch_site == HeaderValue::from_static("cross-site"))
        {
            return Err(AppError::Forbidden("cross-site request blocked".to_owned()).into());
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if !is_allowed_origin(&state.frontend_url, origin, referer) {
            return Err(AppError::Forbidden("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn is_allowed_origin(frontend_url: &str, origin: &str, referer: &str) -> bool {
    let frontend_url = frontend_url.trim_end_matches('/');
    origin == frontend_url
        || referer
            .strip_prefix(frontend_url)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
