use crate::error::{AppError, AppResult};
use crate::middleware::auth::{self, parse_person_id, require_any_role};
use crate::middleware::AuthUser;
use crate::models::{notification, MeasureRequestModel};
use crate::response::{ApiResponse, PaginatedResponse};
use crate::services::email::EmailService;
use crate::services::measure::MeasureService;
use crate::services::notification::NotificationService;
use crate::websocket::hub::NotificationHub;
use axum::{extract::Query, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMeasureRequest {
    /// Complaint the measure protects
    pub denuncia_id: i32,
    /// Kind of protective measure requested
    #[validate(length(min = 1, max = 100))]
    pub measure_type: String,
    /// Why the measure is needed
    #[validate(length(min = 1, max = 5000))]
    pub reason: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MeasureListQuery {
    /// Filter by status; defaults to "Pendiente Informe"
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[utoipa::path(
    post,
    path = "/api/solicitudes/medidas",
    request_body = CreateMeasureRequest,
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Measure request registered", body = MeasureRequestModel),
        (status = 404, description = "Complaint not found", body = AppError),
    ),
    tag = "solicitudes"
)]
pub async fn create_measure_request(
    Extension(db): Extension<DatabaseConnection>,
    Extension(hub): Extension<NotificationHub>,
    Extension(email): Extension<EmailService>,
    auth_user: AuthUser,
    Json(payload): Json<CreateMeasureRequest>,
) -> AppResult<impl IntoResponse> {
    let requester_person_id = parse_person_id(&auth_user)?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = MeasureService::new(db.clone());
    let saved = service
        .create(
            payload.denuncia_id,
            requester_person_id,
            &payload.measure_type,
            &payload.reason,
        )
        .await?;

    let notifier = NotificationService::new(db, hub);
    if let Err(e) = notifier
        .notify_role(
            auth::role::DIRGEGEN,
            Some(requester_person_id),
            notification::kind::NUEVA_SOLICITUD,
            "Nueva solicitud de medida",
            &format!(
                "Se solicitó la medida \"{}\" para la denuncia #{}",
                saved.measure_type, saved.complaint_id
            ),
            Some(saved.complaint_id),
            Some(&email),
        )
        .await
    {
        tracing::warn!(
            measure_id = saved.id,
            "Failed to notify Dirgegen of measure request: {}",
            e
        );
    }

    Ok(ApiResponse::ok(saved))
}

#[utoipa::path(
    get,
    path = "/api/solicitudes/medidas",
    params(MeasureListQuery),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Pending measure worklist", body = PaginatedResponse<MeasureRequestModel>),
        (status = 403, description = "Forbidden", body = AppError),
    ),
    tag = "solicitudes"
)]
pub async fn list_measure_worklist(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(query): Query<MeasureListQuery>,
) -> AppResult<impl IntoResponse> {
    require_any_role(&auth_user, auth::role::GESTION)?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let service = MeasureService::new(db);
    let (items, total) = service
        .list_worklist(query.status.as_deref(), page, per_page)
        .await?;

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/solicitudes/medidas/mias",
    params(MeasureListQuery),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Caller's own measure requests", body = PaginatedResponse<MeasureRequestModel>),
    ),
    tag = "solicitudes"
)]
pub async fn list_own_measure_requests(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(query): Query<MeasureListQuery>,
) -> AppResult<impl IntoResponse> {
    let person_id = parse_person_id(&auth_user)?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let service = MeasureService::new(db);
    let (items, total) = service.list_for_requester(person_id, page, per_page).await?;

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}
