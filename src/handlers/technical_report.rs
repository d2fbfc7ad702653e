use crate::error::{AppError, AppResult};
use crate::middleware::auth::{self, require_any_role, require_role};
use crate::middleware::AuthUser;
use crate::models::TechnicalReportModel;
use crate::response::ApiResponse;
use crate::services::technical_report::{ReportContent, TechnicalReportService};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReportRequest {
    /// Complaint the report belongs to
    pub denuncia_id: i32,
    /// Established facts
    #[validate(length(min = 1, max = 50000))]
    pub facts: String,
    /// Legal and psychosocial analysis
    #[validate(length(min = 1, max = 50000))]
    pub analysis: String,
    /// Conclusion and recommendation
    #[validate(length(min = 1, max = 50000))]
    pub conclusion: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReportRequest {
    #[validate(length(min = 1, max = 50000))]
    pub facts: String,
    #[validate(length(min = 1, max = 50000))]
    pub analysis: String,
    #[validate(length(min = 1, max = 50000))]
    pub conclusion: String,
}

#[utoipa::path(
    post,
    path = "/api/informes-tecnicos",
    request_body = CreateReportRequest,
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Report filed, case moved to En Investigación", body = TechnicalReportModel),
        (status = 400, description = "Report already exists", body = AppError),
        (status = 404, description = "Complaint not found", body = AppError),
    ),
    tag = "informes-tecnicos"
)]
pub async fn create_report(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateReportRequest>,
) -> AppResult<impl IntoResponse> {
    // Reports are authored by Dirgegen; other review units only read them
    let author_person_id = require_role(&auth_user, auth::role::DIRGEGEN)?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = TechnicalReportService::new(db);
    let report = service
        .create(
            payload.denuncia_id,
            author_person_id,
            ReportContent {
                facts: payload.facts,
                analysis: payload.analysis,
                conclusion: payload.conclusion,
            },
        )
        .await?;

    Ok(ApiResponse::ok(report))
}

#[utoipa::path(
    put,
    path = "/api/informes-tecnicos/{denuncia_id}",
    params(("denuncia_id" = i32, Path, description = "Complaint id")),
    request_body = UpdateReportRequest,
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Report overwritten", body = TechnicalReportModel),
        (status = 404, description = "Report not found", body = AppError),
    ),
    tag = "informes-tecnicos"
)]
pub async fn update_report(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(denuncia_id): Path<i32>,
    Json(payload): Json<UpdateReportRequest>,
) -> AppResult<impl IntoResponse> {
    require_role(&auth_user, auth::role::DIRGEGEN)?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = TechnicalReportService::new(db);
    let report = service
        .update(
            denuncia_id,
            ReportContent {
                facts: payload.facts,
                analysis: payload.analysis,
                conclusion: payload.conclusion,
            },
        )
        .await?;

    Ok(ApiResponse::ok(report))
}

#[utoipa::path(
    get,
    path = "/api/informes-tecnicos/{denuncia_id}",
    params(("denuncia_id" = i32, Path, description = "Complaint id")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Filed report", body = TechnicalReportModel),
        (status = 404, description = "Report not found", body = AppError),
    ),
    tag = "informes-tecnicos"
)]
pub async fn get_report(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(denuncia_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_any_role(&auth_user, auth::role::GESTION)?;

    let service = TechnicalReportService::new(db);
    let report = service.get_by_complaint(denuncia_id).await?;

    Ok(ApiResponse::ok(report))
}
