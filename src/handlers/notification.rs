use crate::error::AppResult;
use crate::middleware::auth::parse_person_id;
use crate::middleware::AuthUser;
use crate::models::NotificationModel;
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::notification::NotificationService;
use crate::websocket::hub::NotificationHub;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub unread: u64,
}

#[utoipa::path(
    get,
    path = "/api/notificaciones",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Own notifications, newest first", body = PaginatedResponse<NotificationModel>),
        (status = 401, description = "Unauthorized", body = crate::error::AppError),
    ),
    tag = "notificaciones"
)]
pub async fn list_notifications(
    Extension(db): Extension<DatabaseConnection>,
    Extension(hub): Extension<NotificationHub>,
    auth_user: AuthUser,
    Query(query): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let person_id = parse_person_id(&auth_user)?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let service = NotificationService::new(db, hub);
    let (items, total) = service.list_for_person(person_id, page, per_page).await?;

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/notificaciones/no-leidas",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Unread notification count", body = UnreadCountResponse),
    ),
    tag = "notificaciones"
)]
pub async fn unread_count(
    Extension(db): Extension<DatabaseConnection>,
    Extension(hub): Extension<NotificationHub>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let person_id = parse_person_id(&auth_user)?;

    let service = NotificationService::new(db, hub);
    let unread = service.unread_count(person_id).await?;

    Ok(ApiResponse::ok(UnreadCountResponse { unread }))
}

#[utoipa::path(
    put,
    path = "/api/notificaciones/{id}/leer",
    params(("id" = i32, Path, description = "Notification id")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Notification marked as read", body = String),
        (status = 404, description = "Not found or not yours", body = crate::error::AppError),
    ),
    tag = "notificaciones"
)]
pub async fn mark_notification_read(
    Extension(db): Extension<DatabaseConnection>,
    Extension(hub): Extension<NotificationHub>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let person_id = parse_person_id(&auth_user)?;

    let service = NotificationService::new(db, hub);
    service.mark_read(id, person_id).await?;

    Ok(ApiResponse::ok("Notificación leída"))
}

#[utoipa::path(
    put,
    path = "/api/notificaciones/leer-todas",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "All own notifications marked as read", body = u64),
    ),
    tag = "notificaciones"
)]
pub async fn mark_all_notifications_read(
    Extension(db): Extension<DatabaseConnection>,
    Extension(hub): Extension<NotificationHub>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let person_id = parse_person_id(&auth_user)?;

    let service = NotificationService::new(db, hub);
    let updated = service.mark_all_read(person_id).await?;

    Ok(ApiResponse::ok(updated))
}
