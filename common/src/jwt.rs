use actix_web::{HttpMessage, dev::ServiceRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    env_config::JwtConfig,
    error::{AppError, Res},
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub user_id: Uuid,
    /// Tenant the user belongs to. None for platform admins.
    pub client_id: Option<Uuid>,
    pub is_admin: bool,
    pub admin_role: Option<String>,
    pub exp: usize,
}

pub struct ClaimsSpec {
    pub user_id: Uuid,
    pub client_id: Option<Uuid>,
    pub is_admin: bool,
    pub admin_role: Option<String>,
}

/// Generates JWT token based on user object and JWT configuration options
pub fn generate_jwt(spec: ClaimsSpec, config: &JwtConfig) -> Res<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(config.expiration_hours))
        .ok_or_else(|| AppError::Internal("Invalid token expiration".to_string()))?
        .timestamp();

    let claims = JwtClaims {
        user_id: spec.user_id,
        client_id: spec.client_id,
        is_admin: spec.is_admin,
        admin_role: spec.admin_role,
        exp: expiration as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(AppError::from)
}

/// Extracts claims object from JWT token.
/// Requires JWT secret.
pub fn validate_jwt(token: &str, secret: &str) -> Res<JwtClaims> {
    let token_data = jsonwebtoken::decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Reads validated claims previously inserted by the auth middleware.
pub fn get_jwt_claims(req: &ServiceRequest) -> Option<JwtClaims> {
    req.extensions().get::<JwtClaims>().cloned()
}

/// Same lookup from inside a handler. Only reachable behind the auth
/// middleware, so a miss is a wiring bug surfaced as 401 rather than 500.
pub fn claims_from_request(req: &actix_web::HttpRequest) -> Res<JwtClaims> {
    req.extensions()
        .get::<JwtClaims>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Missing authentication".to_string()))
}
