use crate::error::{AppError, AppResult};
use crate::middleware::auth::parse_person_id;
use crate::middleware::AuthUser;
use crate::models::PersonModel;
use crate::response::ApiResponse;
use crate::services::auth::AuthService;
use crate::utils::cookie::{build_auth_cookie, build_clear_cookie, SESSION_COOKIE};
use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// National ID (RUT), with or without dots
    #[validate(length(min = 3, max = 15))]
    pub rut: String,
    /// Account password
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Session token (also set as an HttpOnly cookie)
    pub token: String,
    /// Person ID
    pub person_id: i32,
    /// Display name
    pub name: String,
    /// Role list embedded in the token
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PersonResponse {
    /// Person ID
    pub id: i32,
    /// National ID (RUT)
    pub rut: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Role list
    pub roles: Vec<String>,
}

impl From<PersonModel> for PersonResponse {
    fn from(person: PersonModel) -> Self {
        let roles = person.role_list();
        Self {
            id: person.id,
            rut: person.rut,
            name: person.name,
            email: person.email,
            phone: person.phone,
            roles,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid RUT", body = AppError),
        (status = 401, description = "Invalid credentials", body = AppError),
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = AuthService::new(db);
    let (person, token) = service.login(&payload.rut, &payload.password).await?;

    let response = AuthResponse {
        token: token.clone(),
        person_id: person.id,
        name: person.name.clone(),
        roles: person.role_list(),
    };

    let mut http_response = ApiResponse::ok(response).into_response();
    set_session_cookie(&mut http_response, &token)?;
    Ok(http_response)
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Session cookie cleared", body = String),
    ),
    tag = "auth"
)]
pub async fn logout() -> AppResult<impl IntoResponse> {
    let mut response = ApiResponse::ok("Sesión cerrada").into_response();
    append_set_cookie(&mut response, &build_clear_cookie(SESSION_COOKIE))?;
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Current account", body = PersonResponse),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "auth"
)]
pub async fn get_current_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let person_id = parse_person_id(&auth_user)?;

    let service = AuthService::new(db);
    let person = service.get_person_by_id(person_id).await?;

    Ok(ApiResponse::ok(PersonResponse::from(person)))
}

fn set_session_cookie(response: &mut Response, token: &str) -> AppResult<()> {
    let max_age = crate::config::jwt::JwtConfig::from_env()
        .map(|c| c.token_expiry)
        .unwrap_or(86400);
    let cookie = build_auth_cookie(SESSION_COOKIE, token, max_age);
    append_set_cookie(response, &cookie)
}

fn append_set_cookie(response: &mut Response, cookie_value: &str) -> AppResult<()> {
    let value = HeaderValue::from_str(cookie_value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid cookie value: {e}")))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(())
}
