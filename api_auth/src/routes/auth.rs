use std::sync::Arc;

use actix_web::{Responder, post, web};
use common::env_config::Config;
use common::error::Res;
use common::http::Success;
use common::jwt::{self, ClaimsSpec};
use sqlx::PgPool;

use crate::dtos::auth::{
    AuthResponse, FORGOT_PASSWORD_RESPONSE, ForgotPasswordRequest, LoginRequest, MessageResponse,
    ResetPasswordRequest,
};
use crate::services;

/// Authenticates a user and returns a bearer token for the dashboard or
/// admin API.
#[post("/login")]
async fn post_login(
    req: web::Json<LoginRequest>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let user = services::auth::authenticate_user(&pool, &req).await?;

    let token = jwt::generate_jwt(
        ClaimsSpec {
            user_id: user.id,
            client_id: user.client_id,
            is_admin: user.is_admin,
            admin_role: user.admin_role.clone(),
        },
        &config.jwt_config,
    )?;

    Success::ok(AuthResponse {
        token,
        user_id: user.id,
        is_admin: user.is_admin,
    })
}

/// Starts a password reset. Responds with the same body whether or not the
/// email is registered, so the endpoint cannot be used to enumerate
/// accounts.
#[post("/forgot-password")]
async fn post_forgot_password(
    req: web::Json<ForgotPasswordRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    services::auth::start_password_reset(&pool, &req.email).await;

    Success::ok(MessageResponse {
        message: FORGOT_PASSWORD_RESPONSE,
    })
}

/// Completes a password reset with a token from the emailed link.
#[post("/reset-password")]
async fn post_reset_password(
    req: web::Json<ResetPasswordRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    services::auth::complete_password_reset(&pool, &req.token, &req.password).await?;

    Success::ok(MessageResponse {
        message: "Password updated",
    })
}
