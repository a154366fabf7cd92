use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use shared::jwt::JwtConfig;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::routes::{appointments, auth, groups, health, medications, users};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: JwtConfig,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let jwt = JwtConfig::with_leeway(
        &config.jwt.secret,
        config.jwt.token_expiry_secs,
        config.jwt.leeway_secs,
    );
    let request_timeout_secs = config.server.request_timeout_secs;

    let state = AppState {
        pool,
        config: Arc::new(config),
        jwt,
    };

    // Build CORS layer based on configuration
    let cors = if state.config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = state
            .config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/users/register", post(auth::register))
        .route("/api/users/login", post(auth::login));

    // Protected routes: the UserAuth extractor rejects requests without a
    // valid x-auth-token before any handler logic runs.
    let protected_routes = Router::new()
        // User routes
        .route("/api/users/me", get(users::get_me))
        .route("/api/users/me", delete(users::delete_account))
        // Group routes
        .route("/api/groups", post(groups::create_group))
        .route("/api/groups/join", post(groups::join_group))
        .route("/api/groups/leave", post(groups::leave_group))
        .route("/api/groups", delete(groups::delete_group))
        // Medication routes
        .route("/api/medications", get(medications::list_medications))
        .route("/api/medications", post(medications::create_medication))
        .route("/api/medications/:id", put(medications::update_medication))
        .route(
            "/api/medications/:id",
            delete(medications::delete_medication),
        )
        .route(
            "/api/medications/:id/administer",
            post(medications::record_administration),
        )
        .route(
            "/api/medications/:id/administrations/:admin_id",
            put(medications::update_administration),
        )
        .route(
            "/api/medications/:id/administrations/:admin_id",
            delete(medications::delete_administration),
        )
        // Appointment routes
        .route("/api/appointments", get(appointments::list_appointments))
        .route("/api/appointments", post(appointments::create_appointment))
        .route(
            "/api/appointments/:id",
            put(appointments::update_appointment),
        )
        .route(
            "/api/appointments/:id",
            delete(appointments::delete_appointment),
        )
        .route(
            "/api/appointments/:id/complete",
            patch(appointments::mark_complete),
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
