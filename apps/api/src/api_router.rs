use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use procura_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

pub fn build_router<Store>(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route("/auth/me/profile", put(auth::update_profile_handler))
        .route("/auth/rbac/refresh", post(auth::refresh_rbac_handler))
        .route(
            "/api/navigation/{portal}",
            get(handlers::portal::navigation_handler),
        )
        .route(
            "/api/permissions",
            get(handlers::portal::permissions_handler),
        )
        .route(
            "/api/permissions/{domain}",
            get(handlers::portal::domain_permissions_handler),
        )
        .route("/api/access", post(handlers::portal::access_check_handler))
        .route(
            "/api/rbac/roles",
            get(handlers::rbac::list_roles_handler).post(handlers::rbac::create_role_handler),
        )
        .route(
            "/api/rbac/roles/{role_id}",
            put(handlers::rbac::update_role_handler),
        )
        .route(
            "/api/rbac/roles/{role_id}/deactivate",
            post(handlers::rbac::deactivate_role_handler),
        )
        .route(
            "/api/users/{user_id}/rbac-roles",
            get(handlers::rbac::list_user_roles_handler)
                .post(handlers::rbac::assign_user_roles_handler)
                .delete(handlers::rbac::remove_user_roles_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/api/guard", get(handlers::portal::guard_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
