use crate::error::{AppError, AppResult};
use crate::middleware::auth::{self, require_any_role};
use crate::middleware::AuthUser;
use crate::models::{ComplaintModel, ParticipantModel, PersonModel};
use crate::response::ApiResponse;
use crate::services::management::{IdentifyRequest, ManagementService};
use crate::utils::rut;
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DeriveRequest {
    /// Target complaint type (catalog id); sets the review area
    pub type_id: i32,
    /// State assigned on arrival at the new unit
    pub state_id: i32,
    /// Free-text routing note
    #[validate(length(max = 2000))]
    pub observacion: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct IdentifyParticipantRequest {
    /// National ID of the identified person
    #[validate(length(min = 3, max = 15))]
    pub rut: String,
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IdentifyResponse {
    pub participant: ParticipantModel,
    pub person: PersonModel,
}

#[utoipa::path(
    post,
    path = "/api/gestion/denuncias/{id}/derivar",
    params(("id" = i32, Path, description = "Complaint id")),
    request_body = DeriveRequest,
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Complaint re-routed", body = ComplaintModel),
        (status = 400, description = "Unknown type or state", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "gestion"
)]
pub async fn derive_complaint(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<DeriveRequest>,
) -> AppResult<impl IntoResponse> {
    let acting_person_id = require_any_role(&auth_user, auth::role::GESTION)?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ManagementService::new(db);
    let updated = service
        .derive(
            id,
            payload.type_id,
            payload.state_id,
            payload.observacion.as_deref(),
            acting_person_id,
        )
        .await?;

    Ok(ApiResponse::ok(updated))
}

#[utoipa::path(
    post,
    path = "/api/gestion/denunciados/{id}/identificar",
    params(("id" = i32, Path, description = "Participant id")),
    request_body = IdentifyParticipantRequest,
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Participant linked to a person", body = IdentifyResponse),
        (status = 400, description = "Invalid RUT", body = AppError),
        (status = 404, description = "Participant not found", body = AppError),
    ),
    tag = "gestion"
)]
pub async fn identify_participant(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<IdentifyParticipantRequest>,
) -> AppResult<impl IntoResponse> {
    require_any_role(&auth_user, auth::role::GESTION)?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if rut::validate(&payload.rut).is_none() {
        return Err(AppError::Validation("RUT inválido".to_string()));
    }

    let service = ManagementService::new(db);
    let (participant, person) = service
        .identify_participant(
            id,
            IdentifyRequest {
                rut: payload.rut,
                name: payload.name,
                email: payload.email,
                phone: payload.phone,
            },
        )
        .await?;

    Ok(ApiResponse::ok(IdentifyResponse {
        participant,
        person,
    }))
}
