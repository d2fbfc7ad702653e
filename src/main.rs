mod config;
mod error;
mod handlers;
mod middleware;
mod migration;
mod models;
mod response;
mod routes;
mod services;
mod utils;
mod websocket;

use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use serde_json::json;
use services::storage::StorageService;
use std::env;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use websocket::hub::NotificationHub;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        // Auth routes
        crate::handlers::login,
        crate::handlers::auth::logout,
        crate::handlers::get_current_user,
        // Complaint routes
        crate::handlers::complaint::create_complaint,
        crate::handlers::complaint::list_complaints,
        crate::handlers::complaint::get_complaint,
        crate::handlers::complaint::update_complaint,
        crate::handlers::complaint::change_complaint_state,
        crate::handlers::complaint::delete_complaint,
        // Management routes
        crate::handlers::management::derive_complaint,
        crate::handlers::management::identify_participant,
        // Technical report routes
        crate::handlers::technical_report::create_report,
        crate::handlers::technical_report::update_report,
        crate::handlers::technical_report::get_report,
        // Measure routes
        crate::handlers::measure::create_measure_request,
        crate::handlers::measure::list_measure_worklist,
        crate::handlers::measure::list_own_measure_requests,
        // Notification routes
        crate::handlers::notification::list_notifications,
        crate::handlers::notification::unread_count,
        crate::handlers::notification::mark_notification_read,
        crate::handlers::notification::mark_all_notifications_read,
        // Storage routes
        crate::handlers::storage::presign_upload,
        crate::handlers::storage::presign_download,
        crate::handlers::storage::delete_object,
    ),
    components(
        schemas(
            crate::response::ApiResponse<serde_json::Value>,
            crate::response::PaginatedResponse<serde_json::Value>,
            crate::response::PaginationQuery,
            crate::error::AppError,
            // Auth
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::AuthResponse,
            crate::handlers::auth::PersonResponse,
            // Complaint
            crate::handlers::complaint::CreateComplaintRequest,
            crate::handlers::complaint::UpdateComplaintRequest,
            crate::handlers::complaint::ChangeStateRequest,
            crate::handlers::complaint::ParticipantInput,
            crate::handlers::complaint::EvidenceInput,
            crate::handlers::complaint::ComplaintDetailResponse,
            // Management
            crate::handlers::management::DeriveRequest,
            crate::handlers::management::IdentifyParticipantRequest,
            crate::handlers::management::IdentifyResponse,
            // Technical report
            crate::handlers::technical_report::CreateReportRequest,
            crate::handlers::technical_report::UpdateReportRequest,
            // Measure
            crate::handlers::measure::CreateMeasureRequest,
            // Notification
            crate::handlers::notification::UnreadCountResponse,
            // Storage
            crate::handlers::storage::PresignUploadRequest,
            crate::handlers::storage::PresignUploadResponse,
            crate::handlers::storage::PresignDownloadRequest,
            crate::handlers::storage::PresignDownloadResponse,
        )
    ),
    tags(
        (name = "auth", description = "Authentication operations"),
        (name = "denuncias", description = "Complaint intake and tracking"),
        (name = "gestion", description = "Routing and participant identification"),
        (name = "informes-tecnicos", description = "Technical report operations"),
        (name = "solicitudes", description = "Protective measure requests"),
        (name = "notificaciones", description = "Notification operations"),
        (name = "storage", description = "Evidence object operations"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "denuncias=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration before doing anything else
    let jwt_config = validate_config()?;

    // Initialize JWT config
    utils::jwt::init_jwt_config(jwt_config)?;

    tracing::info!("Starting Denuncias API v{}...", env!("CARGO_PKG_VERSION"));

    let db = config::database::get_database().await?;
    tracing::info!("Database connected successfully");

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let hub = NotificationHub::new();

    let storage_config = config::storage::StorageConfig::from_env()?;
    let storage = StorageService::new(&storage_config).await;

    let email_service = services::email::EmailService::from_env();
    if email_service.is_configured() {
        tracing::info!("SMTP email service configured");
    } else {
        tracing::warn!("SMTP not configured, emails will be skipped");
    }

    let app = create_app()
        .layer(Extension(db))
        .layer(Extension(hub))
        .layer(Extension(storage))
        .layer(Extension(email_service));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Validate all required configuration at startup (fail-fast).
fn validate_config() -> anyhow::Result<crate::config::jwt::JwtConfig> {
    // JWT config is validated and cached
    let jwt_config = config::jwt::JwtConfig::from_env()?;

    // DATABASE_URL is checked here for early error; actual connection happens later
    config::database::DatabaseConfig::from_env()?;

    // Object storage credentials must be present before accepting uploads
    config::storage::StorageConfig::from_env()?;

    Ok(jwt_config)
}

fn build_cors_layer() -> CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    let origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins_str == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

fn create_app() -> Router {
    Router::new()
        .route("/", get(health_check))
        .merge(routes::create_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum::middleware::from_fn(
            middleware::security::security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Health check successful", body = serde_json::Value)
    )
)]
async fn health_check(Extension(db): Extension<DatabaseConnection>) -> impl IntoResponse {
    let db_ok = db
        .query_one(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT 1".to_string(),
        ))
        .await
        .is_ok();

    let status = if db_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
