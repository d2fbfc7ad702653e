use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::handlers;
use crate::middleware::auth::auth_middleware;
use crate::websocket;
use axum::{middleware, routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    Router::new()
        .nest("/api", api_routes())
        // WebSocket route (auth handled inside the handler via query token)
        .route("/ws", routing::get(websocket::notification::ws_handler))
}

fn api_routes() -> Router {
    let rate_limit_config = RateLimitConfig::from_env();

    let auth = auth_routes(&rate_limit_config);
    let intake = intake_routes(&rate_limit_config);
    let protected =
        protected_routes(&rate_limit_config).layer(middleware::from_fn(auth_middleware));

    auth.merge(intake).merge(protected)
}

/// Login is the only credentialed entry point; it gets the tightest
/// rate limit.
fn auth_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new().route("/auth/login", routing::post(handlers::login));

    with_optional_rate_limit(router, config.enabled, config.auth)
}

/// Public intake: anyone, including anonymous reporters, can file a
/// complaint and presign its evidence uploads.
fn intake_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route(
            "/denuncias",
            routing::post(handlers::complaint::create_complaint),
        )
        .route(
            "/storage/subida",
            routing::post(handlers::storage::presign_upload),
        );

    with_optional_rate_limit(router, config.enabled, config.auth)
}

/// Everything else requires a session. Role checks happen inside the
/// handlers.
fn protected_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Auth
        .route("/auth/me", routing::get(handlers::get_current_user))
        .route("/auth/logout", routing::post(handlers::auth::logout))
        // Complaints
        .route(
            "/denuncias",
            routing::get(handlers::complaint::list_complaints),
        )
        .route(
            "/denuncias/{id}",
            routing::get(handlers::complaint::get_complaint)
                .put(handlers::complaint::update_complaint)
                .delete(handlers::complaint::delete_complaint),
        )
        .route(
            "/denuncias/{id}/estado",
            routing::patch(handlers::complaint::change_complaint_state),
        )
        // Routing between review units
        .route(
            "/gestion/denuncias/{id}/derivar",
            routing::post(handlers::management::derive_complaint),
        )
        .route(
            "/gestion/denunciados/{id}/identificar",
            routing::post(handlers::management::identify_participant),
        )
        // Technical reports
        .route(
            "/informes-tecnicos",
            routing::post(handlers::technical_report::create_report),
        )
        .route(
            "/informes-tecnicos/{denuncia_id}",
            routing::get(handlers::technical_report::get_report)
                .put(handlers::technical_report::update_report),
        )
        // Protective measures
        .route(
            "/solicitudes/medidas",
            routing::post(handlers::measure::create_measure_request)
                .get(handlers::measure::list_measure_worklist),
        )
        .route(
            "/solicitudes/medidas/mias",
            routing::get(handlers::measure::list_own_measure_requests),
        )
        // Notifications
        .route(
            "/notificaciones",
            routing::get(handlers::notification::list_notifications),
        )
        .route(
            "/notificaciones/no-leidas",
            routing::get(handlers::notification::unread_count),
        )
        .route(
            "/notificaciones/leer-todas",
            routing::put(handlers::notification::mark_all_notifications_read),
        )
        .route(
            "/notificaciones/{id}/leer",
            routing::put(handlers::notification::mark_notification_read),
        )
        // Evidence objects
        .route(
            "/storage/descarga",
            routing::post(handlers::storage::presign_download),
        )
        .route(
            "/storage/{key}",
            routing::delete(handlers::storage::delete_object),
        );

    with_optional_rate_limit(router, config.enabled, config.protected)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
        .expect("Invalid rate limit configuration");

    router.layer(GovernorLayer::new(governor_conf))
}
