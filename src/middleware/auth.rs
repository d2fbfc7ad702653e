use crate::{
    error::AppError,
    models::Person,
    utils::{
        cookie::{extract_cookie, SESSION_COOKIE},
        jwt::decode_jwt,
    },
};
use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response, Extension};
use sea_orm::{DatabaseConnection, EntityTrait};

pub mod role {
    pub const ADMIN: &str = "admin";
    pub const DIRGEGEN: &str = "dirgegen";
    pub const VRA: &str = "vra";
    pub const VRAE: &str = "vrae";
    pub const REVISOR: &str = "revisor";
    pub const DENUNCIANTE: &str = "denunciante";

    /// Roles allowed to re-route complaints and identify accused persons.
    pub const GESTION: &[&str] = &[ADMIN, DIRGEGEN, VRA, VRAE];
}

/// Authenticated caller, extracted from the JWT claims.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub person_id: String,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|r| self.has_role(r))
    }
}

/// JWT authentication middleware.
///
/// Reads the token from the HttpOnly session cookie (Bearer header
/// accepted as fallback), verifies it, checks the account still exists,
/// and attaches the caller to request extensions.
pub async fn auth_middleware(
    Extension(db): Extension<DatabaseConnection>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_cookie(&headers, SESSION_COOKIE)
        .or_else(|| extract_bearer_token(&headers))
        .ok_or(AppError::Unauthorized)?;

    let claims = decode_jwt(&token).map_err(|_| AppError::Unauthorized)?;

    let person_id: i32 = claims
        .sub
        .parse()
        .map_err(|_| AppError::Validation("Invalid person ID in token".to_string()))?;

    // The account must still exist; role claims are trusted for the
    // token's 24h lifetime.
    Person::find_by_id(person_id)
        .one(&db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let auth_user = AuthUser {
        person_id: claims.sub,
        roles: claims.roles,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;

    let token = auth_header.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Parse person_id from AuthUser string to i32
pub fn parse_person_id(auth_user: &AuthUser) -> crate::error::AppResult<i32> {
    auth_user
        .person_id
        .parse()
        .map_err(|_| AppError::Validation("Invalid person ID".to_string()))
}

/// Require one specific role; returns the caller's person id.
pub fn require_role(auth_user: &AuthUser, role: &str) -> crate::error::AppResult<i32> {
    if !auth_user.has_role(role) && !auth_user.has_role(role::ADMIN) {
        return Err(AppError::Forbidden);
    }
    parse_person_id(auth_user)
}

/// Require any of the given roles; returns the caller's person id.
pub fn require_any_role(auth_user: &AuthUser, roles: &[&str]) -> crate::error::AppResult<i32> {
    if !auth_user.has_any_role(roles) && !auth_user.has_role(role::ADMIN) {
        return Err(AppError::Forbidden);
    }
    parse_person_id(auth_user)
}

/// Extractor for AuthUser from request extensions
use axum::extract::FromRequestParts;

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
