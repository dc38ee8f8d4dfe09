use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};

use crate::{dtos::user::NewPasswordReset, models::user::PasswordReset};

pub async fn insert<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: &NewPasswordReset,
) -> Res<PasswordReset> {
    sqlx::query_as::<_, PasswordReset>(
        r#"
        INSERT INTO password_resets (user_id, token, expires_at)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(data.user_id)
    .bind(&data.token)
    .bind(data.expires_at)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Looks up a token that is unused and unexpired.
pub async fn get_valid_by_token<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    token: &str,
) -> Res<Option<PasswordReset>> {
    sqlx::query_as::<_, PasswordReset>(
        "SELECT * FROM password_resets WHERE token = $1 AND used = FALSE AND expires_at > now()",
    )
    .bind(token)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn mark_used<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    reset_id: uuid::Uuid,
) -> Res<()> {
    sqlx::query("UPDATE password_resets SET used = TRUE WHERE id = $1")
        .bind(reset_id)
        .execute(executor)
        .await?;
    Ok(())
}
