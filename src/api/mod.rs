use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{
    AuthService, BookingService, MemoryAuthService, MemoryBookingService, StatsService,
    TokenService,
};
use crate::store::Store;

mod admin;
pub mod auth;
mod bookings;
mod error;
pub mod i18n;
mod observability;
mod system;
mod types;
mod validation;

pub use error::{ApiError, ErrorKind};
pub use i18n::Locale;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,

    pub booking_service: Arc<dyn BookingService>,

    pub stats_service: Arc<StatsService>,

    pub locale: Locale,

    pub cors_allowed_origins: Vec<String>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

/// Builds the stores and services. Each call starts from empty tables.
pub fn create_app_state(
    config: &Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let locale: Locale = config
        .general
        .locale
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let store = Store::new(config.security.clone());
    let tokens = Arc::new(TokenService::new(
        &config.security.jwt_secret,
        config.security.token_ttl_days,
    ));

    let auth_service = Arc::new(MemoryAuthService::new(
        store.clone(),
        tokens,
        config.security.reissue_token_on_profile_update,
    ));
    let booking_service = Arc::new(MemoryBookingService::new(store.clone()));
    let stats_service = Arc::new(StatsService::new(store.clone()));

    Ok(Arc::new(AppState {
        auth_service,
        booking_service,
        stats_service,
        locale,
        cors_allowed_origins: config.server.cors_allowed_origins.clone(),
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/", get(system::index))
        .route("/health", get(system::health))
        .route("/auth/has-admin", get(auth::has_admin))
        .route("/auth/init-admin", post(auth::init_admin))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let cors_origins = state.cors_allowed_origins.clone();
    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(public_routes)
        .merge(create_user_router(state.clone()))
        .merge(create_admin_router(state.clone()))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            i18n::localize_errors,
        ))
        .layer(middleware::from_fn(observability::logging_middleware))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

/// Routes for any signed-in account.
fn create_user_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/profile", put(auth::update_profile))
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/my", get(bookings::list_my_bookings))
        .route("/bookings/{id}", delete(bookings::delete_booking))
        .route_layer(middleware::from_fn_with_state(state, auth::require_auth))
}

/// Routes that additionally require the admin role.
fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", get(bookings::list_all_bookings))
        .route("/bookings/{id}", put(bookings::update_booking_status))
        .route("/admin/stats", get(admin::get_stats))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{id}/role", put(admin::set_user_role))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state, auth::require_auth))
}
