use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::invite::NewInvitation,
    models::invite::{AdminInvitation, InviteStatus},
};

pub async fn exists_pending_for_email<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<bool> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM admin_invitations
            WHERE lower(email) = lower($1) AND status = 'pending'
        )
        "#,
    )
    .bind(email)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn insert<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: &NewInvitation,
) -> Res<AdminInvitation> {
    sqlx::query_as::<_, AdminInvitation>(
        r#"
        INSERT INTO admin_invitations (email, role, custom_permissions, token, status, expires_at, invited_by)
        VALUES ($1, $2, $3, $4, 'pending', $5, $6)
        RETURNING *
        "#,
    )
    .bind(&data.email)
    .bind(&data.role)
    .bind(&data.custom_permissions)
    .bind(&data.token)
    .bind(data.expires_at)
    .bind(data.invited_by)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_by_token<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    token: &str,
) -> Res<Option<AdminInvitation>> {
    sqlx::query_as::<_, AdminInvitation>("SELECT * FROM admin_invitations WHERE token = $1")
        .bind(token)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    invitation_id: Uuid,
) -> Res<Option<AdminInvitation>> {
    sqlx::query_as::<_, AdminInvitation>("SELECT * FROM admin_invitations WHERE id = $1")
        .bind(invitation_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn list_all<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
) -> Res<Vec<AdminInvitation>> {
    sqlx::query_as::<_, AdminInvitation>(
        "SELECT * FROM admin_invitations ORDER BY created_at DESC",
    )
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

/// Transitions an invitation out of pending. The WHERE guard makes the
/// transition single-shot: a second accept or cancel matches zero rows.
pub async fn transition_from_pending<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    invitation_id: Uuid,
    to: InviteStatus,
) -> Res<Option<AdminInvitation>> {
    sqlx::query_as::<_, AdminInvitation>(
        r#"
        UPDATE admin_invitations
        SET status = $2,
            accepted_at = CASE WHEN $2 = 'accepted' THEN now() ELSE accepted_at END
        WHERE id = $1 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(invitation_id)
    .bind(to.as_str())
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}
