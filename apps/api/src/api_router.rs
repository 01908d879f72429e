use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{delete, get, post};
use beauty_control_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<MemoryStore>,
) -> Result<Router, AppError> {
    let business_routes = Router::new()
        .route(
            "/api/business/validate",
            post(handlers::business::validate_business_handler),
        )
        .route(
            "/api/business/accessible",
            get(handlers::business::list_accessible_businesses_handler),
        )
        .route(
            "/api/business/switch",
            post(handlers::business::switch_business_handler),
        )
        .route(
            "/api/business/active",
            get(handlers::business::active_business_handler),
        )
        .route(
            "/api/business/check-permission",
            post(handlers::business::check_business_permission_handler),
        )
        .route(
            "/api/business/cache/{business_id}",
            delete(handlers::business::invalidate_business_cache_handler),
        )
        .route(
            "/api/business/logout",
            post(handlers::business::logout_handler),
        )
        .route_layer(from_fn(middleware::require_user));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/session",
            post(handlers::session::sign_in_handler).get(handlers::session::current_user_handler),
        )
        .route(
            "/api/catalog/roles",
            get(handlers::catalog::list_roles_handler),
        )
        .route(
            "/api/access/permissions",
            post(handlers::access::check_permissions_handler),
        )
        .route(
            "/api/access/route",
            post(handlers::access::check_route_handler),
        )
        .route(
            "/api/navigation",
            get(handlers::navigation::navigation_handler),
        )
        .merge(business_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
