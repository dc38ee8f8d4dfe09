use chrono::{Duration, Utc};
use common::{
    error::{AppError, Res},
    password::{hash_password, validate_password_policy, verify_password},
    token::generate_token,
};
use db::{dtos::user::NewPasswordReset, models::user::User};
use sqlx::PgPool;

use crate::dtos::auth::LoginRequest;

/// Reset links stay valid for one hour.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Authenticates an existing user by email and password.
///
/// Both an unknown email and a wrong password map to the same Unauthorized
/// error so the login endpoint does not leak which emails are registered.
pub async fn authenticate_user(pool: &PgPool, login_data: &LoginRequest) -> Res<User> {
    let record = db::user::get_user_with_password_hash(pool, &login_data.email).await?;

    let Some((user, credentials)) = record else {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    if verify_password(&login_data.password, &credentials.password_hash) {
        Ok(user)
    } else {
        Err(AppError::Unauthorized("Invalid credentials".to_string()))
    }
}

/// Creates a password reset token for the account, if one exists.
///
/// Always succeeds from the caller's point of view. Email delivery is
/// handled by an external notification pipeline; the generated link is
/// logged for it to pick up, and a failure here must never change the
/// endpoint's response.
pub async fn start_password_reset(pool: &PgPool, email: &str) {
    let user = match db::user::get_user_by_email(pool, email).await {
        Ok(Some(user)) => user,
        Ok(None) => return,
        Err(e) => {
            log::warn!("Password reset lookup failed for {}: {}", email, e);
            return;
        }
    };

    let reset = NewPasswordReset {
        user_id: user.id,
        token: generate_token(),
        expires_at: (Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS)).naive_utc(),
    };

    match db::password_reset::insert(pool, &reset).await {
        Ok(row) => log::info!("Password reset link issued for user {}: /reset-password?token={}", user.id, row.token),
        Err(e) => log::warn!("Failed to store password reset for user {}: {}", user.id, e),
    }
}

/// Consumes a reset token and sets the new password. Tokens are single use
/// and expire after one hour.
pub async fn complete_password_reset(pool: &PgPool, token: &str, password: &str) -> Res<()> {
    validate_password_policy(password)?;

    let reset = db::password_reset::get_valid_by_token(pool, token)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired reset token".to_string()))?;

    let password_hash = hash_password(password)?;

    let mut tx = pool.begin().await?;
    db::user::update_credentials(&mut *tx, reset.user_id, &password_hash).await?;
    db::password_reset::mark_used(&mut *tx, reset.id).await?;
    tx.commit().await?;

    Ok(())
}
