use crate::error::{AppError, AppResult};
use crate::middleware::auth::{self, parse_person_id, require_any_role};
use crate::middleware::AuthUser;
use crate::models::{evidence_file, EvidenceFile};
use crate::response::ApiResponse;
use crate::services::storage::StorageService;
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PresignUploadRequest {
    /// Original file name
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    /// MIME type of the file
    #[validate(length(min = 1, max = 100))]
    pub content_type: String,
    /// Size in bytes
    #[validate(range(min = 1))]
    pub size_bytes: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PresignUploadResponse {
    /// Key under which the object will be stored
    pub object_key: String,
    /// Presigned PUT URL, uploaded to directly by the client
    pub upload_url: String,
    /// URL validity in seconds
    pub expires_in_secs: u64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PresignDownloadRequest {
    /// Key of an evidence object already attached to a complaint
    #[validate(length(min = 1, max = 512))]
    pub object_key: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PresignDownloadResponse {
    pub object_key: String,
    pub download_url: String,
}

#[utoipa::path(
    post,
    path = "/api/storage/subida",
    request_body = PresignUploadRequest,
    responses(
        (status = 200, description = "Presigned upload URL", body = PresignUploadResponse),
        (status = 400, description = "Rejected file type or name", body = AppError),
        (status = 413, description = "File too large", body = AppError),
    ),
    tag = "storage"
)]
pub async fn presign_upload(
    Extension(storage): Extension<StorageService>,
    Json(payload): Json<PresignUploadRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let presigned = storage
        .presign_upload(&payload.file_name, &payload.content_type, payload.size_bytes)
        .await?;

    Ok(ApiResponse::ok(PresignUploadResponse {
        object_key: presigned.object_key,
        upload_url: presigned.url,
        expires_in_secs: presigned.expires_in_secs,
    }))
}

#[utoipa::path(
    post,
    path = "/api/storage/descarga",
    request_body = PresignDownloadRequest,
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Presigned download URL", body = PresignDownloadResponse),
        (status = 404, description = "Evidence file not found", body = AppError),
    ),
    tag = "storage"
)]
pub async fn presign_download(
    Extension(db): Extension<DatabaseConnection>,
    Extension(storage): Extension<StorageService>,
    auth_user: AuthUser,
    Json(payload): Json<PresignDownloadRequest>,
) -> AppResult<impl IntoResponse> {
    parse_person_id(&auth_user)?;

    // Only keys registered as evidence can be fetched
    let file = EvidenceFile::find()
        .filter(evidence_file::Column::ObjectKey.eq(&payload.object_key))
        .one(&db)
        .await?
        .ok_or_else(|| AppError::NotFound("Archivo no encontrado".to_string()))?;

    let download_url = storage.presign_download(&file.object_key).await?;

    Ok(ApiResponse::ok(PresignDownloadResponse {
        object_key: file.object_key,
        download_url,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/storage/{key}",
    params(("key" = String, Path, description = "Object key")),
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Object removed from the bucket", body = String),
        (status = 403, description = "Forbidden", body = AppError),
    ),
    tag = "storage"
)]
pub async fn delete_object(
    Extension(db): Extension<DatabaseConnection>,
    Extension(storage): Extension<StorageService>,
    auth_user: AuthUser,
    Path(key): Path<String>,
) -> AppResult<impl IntoResponse> {
    require_any_role(&auth_user, auth::role::GESTION)?;

    storage.delete(&key).await?;

    // Drop the metadata row too, if the key was already attached
    if let Some(file) = EvidenceFile::find()
        .filter(evidence_file::Column::ObjectKey.eq(&key))
        .one(&db)
        .await?
    {
        file.delete(&db).await?;
    }

    Ok(ApiResponse::ok("Archivo eliminado"))
}
