use crate::error::{AppError, AppResult};
use crate::middleware::auth::{self, parse_person_id, require_any_role};
use crate::middleware::AuthUser;
use crate::models::{
    notification, person, ComplaintModel, ComplaintStateModel, ComplaintTypeModel,
    EvidenceFileModel, MeasureRequestModel, ParticipantModel, Person, StateHistoryModel,
    TechnicalReportModel,
};
use crate::response::{ApiResponse, PaginatedResponse};
use crate::services::complaint::{
    ComplaintDetail, ComplaintFilter, ComplaintService, ComplaintUpdate, EvidenceEntry,
    NewComplaint, ParticipantEntry,
};
use crate::services::email::EmailService;
use crate::services::notification::NotificationService;
use crate::utils::rut;
use crate::websocket::hub::NotificationHub;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ParticipantInput {
    /// Free-text name, possibly partial ("N.N.", a nickname)
    pub name: Option<String>,
    /// National ID if known
    pub rut: Option<String>,
}

impl From<ParticipantInput> for ParticipantEntry {
    fn from(input: ParticipantInput) -> Self {
        Self {
            name: input.name,
            rut: input.rut,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EvidenceInput {
    /// Object key returned by the upload presign endpoint
    #[validate(length(min = 1, max = 512))]
    pub object_key: String,
    /// Original file name
    #[validate(length(min = 1, max = 255))]
    pub original_name: String,
    /// MIME type
    #[validate(length(min = 1, max = 100))]
    pub content_type: String,
    /// Size in bytes
    #[validate(range(min = 1))]
    pub size_bytes: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateComplaintRequest {
    /// Reporter's RUT; omit for anonymous reports
    pub reporter_rut: Option<String>,
    /// Reporter's name, used when creating the person record
    #[validate(length(max = 200))]
    pub reporter_name: Option<String>,
    /// Complaint type (catalog id)
    pub type_id: i32,
    /// Initial state; defaults to Recibida
    pub state_id: Option<i32>,
    /// Date of the incident
    pub incident_date: chrono::NaiveDate,
    /// Narrative of the facts
    #[validate(length(min = 10, max = 20000))]
    pub narrative: String,
    /// Where it happened
    #[validate(length(max = 300))]
    pub location: Option<String>,
    #[serde(default)]
    pub accused: Vec<ParticipantInput>,
    #[serde(default)]
    pub witnesses: Vec<ParticipantInput>,
    #[serde(default)]
    #[validate(nested)]
    pub evidence: Vec<EvidenceInput>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateComplaintRequest {
    pub incident_date: Option<chrono::NaiveDate>,
    #[validate(length(min = 10, max = 20000))]
    pub narrative: Option<String>,
    #[validate(length(max = 300))]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeStateRequest {
    /// Target state (catalog id)
    pub state_id: i32,
    /// Effective timestamp; defaults to now
    pub changed_at: Option<chrono::NaiveDateTime>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ComplaintListQuery {
    /// Filter by state id
    pub state_id: Option<i32>,
    /// Filter by type id
    pub type_id: Option<i32>,
    /// Filter by review area (DIRGEGEN, VRA, VRAE)
    pub area: Option<String>,
    /// Filter by reporter RUT (staff only)
    pub reporter_rut: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComplaintDetailResponse {
    pub complaint: ComplaintModel,
    pub complaint_type: ComplaintTypeModel,
    pub state: ComplaintStateModel,
    pub history: Vec<StateHistoryModel>,
    pub participants: Vec<ParticipantModel>,
    pub evidence: Vec<EvidenceFileModel>,
    pub measures: Vec<MeasureRequestModel>,
    pub technical_report: Option<TechnicalReportModel>,
}

impl From<ComplaintDetail> for ComplaintDetailResponse {
    fn from(detail: ComplaintDetail) -> Self {
        Self {
            complaint: detail.complaint,
            complaint_type: detail.complaint_type,
            state: detail.state,
            history: detail.history,
            participants: detail.participants,
            evidence: detail.evidence,
            measures: detail.measures,
            technical_report: detail.technical_report,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/denuncias",
    request_body = CreateComplaintRequest,
    responses(
        (status = 200, description = "Complaint registered", body = ComplaintDetailResponse),
        (status = 400, description = "Validation error", body = AppError),
    ),
    tag = "denuncias"
)]
pub async fn create_complaint(
    Extension(db): Extension<DatabaseConnection>,
    Extension(hub): Extension<NotificationHub>,
    Extension(email): Extension<EmailService>,
    Json(payload): Json<CreateComplaintRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if let Some(raw) = payload.reporter_rut.as_deref() {
        if rut::validate(raw).is_none() {
            return Err(AppError::Validation("RUT inválido".to_string()));
        }
    }

    let service = ComplaintService::new(db.clone());
    let detail = service
        .create(NewComplaint {
            reporter_rut: payload.reporter_rut,
            reporter_name: payload.reporter_name,
            type_id: payload.type_id,
            initial_state_id: payload.state_id,
            incident_date: payload.incident_date,
            narrative: payload.narrative,
            location: payload.location,
            accused: payload.accused.into_iter().map(Into::into).collect(),
            witnesses: payload.witnesses.into_iter().map(Into::into).collect(),
            evidence: payload
                .evidence
                .into_iter()
                .map(|e| EvidenceEntry {
                    object_key: e.object_key,
                    original_name: e.original_name,
                    content_type: e.content_type,
                    size_bytes: e.size_bytes,
                })
                .collect(),
        })
        .await?;

    // Alert the review area's staff. Delivery problems must not undo an
    // already committed complaint.
    let area_role = detail.complaint_type.area.to_lowercase();
    let notifier = NotificationService::new(db, hub);
    if let Err(e) = notifier
        .notify_role(
            &area_role,
            None,
            notification::kind::NUEVA_DENUNCIA,
            "Nueva denuncia recibida",
            &format!(
                "Se registró la denuncia #{} de tipo {}",
                detail.complaint.id, detail.complaint_type.name
            ),
            Some(detail.complaint.id),
            Some(&email),
        )
        .await
    {
        tracing::warn!(
            complaint_id = detail.complaint.id,
            "Failed to notify {} staff: {}",
            area_role,
            e
        );
    }

    Ok(ApiResponse::ok(ComplaintDetailResponse::from(detail)))
}

#[utoipa::path(
    get,
    path = "/api/denuncias",
    params(ComplaintListQuery),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Complaint page", body = PaginatedResponse<ComplaintModel>),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "denuncias"
)]
pub async fn list_complaints(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(query): Query<ComplaintListQuery>,
) -> AppResult<impl IntoResponse> {
    let person_id = parse_person_id(&auth_user)?;

    // Staff see everything; reporters only their own cases.
    let mut filter = ComplaintFilter {
        state_id: query.state_id,
        type_id: query.type_id,
        area: query.area,
        reporter_person_id: None,
    };
    if auth_user.has_any_role(auth::role::GESTION) || auth_user.has_role(auth::role::REVISOR) {
        if let Some(raw) = query.reporter_rut.as_deref() {
            let normalized = rut::validate(raw)
                .ok_or_else(|| AppError::Validation("RUT inválido".to_string()))?;
            // No such person means no matching complaints
            let person = Person::find()
                .filter(person::Column::Rut.eq(&normalized))
                .one(&db)
                .await?;
            match person {
                Some(p) => filter.reporter_person_id = Some(p.id),
                None => {
                    let page = query.page.unwrap_or(1).max(1);
                    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
                    return Ok(ApiResponse::ok(PaginatedResponse::new(
                        vec![],
                        0,
                        page,
                        per_page,
                    )));
                }
            }
        }
    } else {
        filter.reporter_person_id = Some(person_id);
    }

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let service = ComplaintService::new(db);
    let (items, total) = service.list(filter, page, per_page).await?;

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/denuncias/{id}",
    params(("id" = i32, Path, description = "Complaint id")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Complaint detail", body = ComplaintDetailResponse),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "denuncias"
)]
pub async fn get_complaint(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let person_id = parse_person_id(&auth_user)?;

    let service = ComplaintService::new(db);
    let detail = service.get_detail(id).await?;

    if !auth_user.has_any_role(auth::role::GESTION)
        && !auth_user.has_role(auth::role::REVISOR)
        && detail.complaint.reporter_person_id != Some(person_id)
    {
        return Err(AppError::Forbidden);
    }

    Ok(ApiResponse::ok(ComplaintDetailResponse::from(detail)))
}

#[utoipa::path(
    put,
    path = "/api/denuncias/{id}",
    params(("id" = i32, Path, description = "Complaint id")),
    request_body = UpdateComplaintRequest,
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Updated complaint", body = ComplaintModel),
        (status = 403, description = "Forbidden", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "denuncias"
)]
pub async fn update_complaint(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateComplaintRequest>,
) -> AppResult<impl IntoResponse> {
    require_any_role(&auth_user, auth::role::GESTION)?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ComplaintService::new(db);
    let updated = service
        .update(
            id,
            ComplaintUpdate {
                incident_date: payload.incident_date,
                narrative: payload.narrative,
                location: payload.location,
            },
        )
        .await?;

    Ok(ApiResponse::ok(updated))
}

#[utoipa::path(
    patch,
    path = "/api/denuncias/{id}/estado",
    params(("id" = i32, Path, description = "Complaint id")),
    request_body = ChangeStateRequest,
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "State changed", body = ComplaintModel),
        (status = 400, description = "Illegal transition", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "denuncias"
)]
pub async fn change_complaint_state(
    Extension(db): Extension<DatabaseConnection>,
    Extension(hub): Extension<NotificationHub>,
    Extension(email): Extension<EmailService>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<ChangeStateRequest>,
) -> AppResult<impl IntoResponse> {
    let acting_person_id = require_any_role(&auth_user, auth::role::GESTION)?;

    let service = ComplaintService::new(db.clone());
    let updated = service
        .change_state(id, payload.state_id, payload.changed_at)
        .await?;

    if let Some(reporter_id) = updated.reporter_person_id {
        let state_label = crate::models::complaint_state::state::ALL
            .iter()
            .find(|(state_id, _)| *state_id == updated.state_id)
            .map(|(_, label)| *label)
            .unwrap_or("desconocido");

        let notifier = NotificationService::new(db, hub);
        if let Err(e) = notifier
            .notify(
                reporter_id,
                notification::kind::CAMBIO_ESTADO,
                "Cambio de estado de su denuncia",
                &format!("Su denuncia #{} pasó al estado {}", updated.id, state_label),
                Some(updated.id),
                Some(&email),
            )
            .await
        {
            tracing::warn!(
                complaint_id = id,
                acting_person_id,
                "Failed to notify reporter of state change: {}",
                e
            );
        }
    }

    Ok(ApiResponse::ok(updated))
}

#[utoipa::path(
    delete,
    path = "/api/denuncias/{id}",
    params(("id" = i32, Path, description = "Complaint id")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Complaint deleted", body = String),
        (status = 403, description = "Forbidden", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "denuncias"
)]
pub async fn delete_complaint(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    auth::require_role(&auth_user, auth::role::ADMIN)?;

    let service = ComplaintService::new(db);
    service.delete(id).await?;

    Ok(ApiResponse::ok("Denuncia eliminada"))
}
