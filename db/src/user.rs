use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use sqlx::types::JsonValue;
use uuid::Uuid;

use crate::{
    dtos::user::NewAdminUser,
    models::user::{AuthCredentials, User},
};

pub async fn exists_user_by_email<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1))")
        .bind(email)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_user_by_email<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
        .bind(email)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_user_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

/// Creates an admin actor. The password hash is stored alongside in
/// auth_credentials by the caller within the same transaction.
pub async fn insert_admin_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: &NewAdminUser,
) -> Res<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, first_name, last_name, is_admin, admin_role, custom_permissions)
        VALUES ($1, $2, $3, TRUE, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&data.email)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.role)
    .bind(&data.custom_permissions)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn insert_credentials<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    password_hash: &str,
) -> Res<()> {
    sqlx::query("INSERT INTO auth_credentials (user_id, password_hash) VALUES ($1, $2)")
        .bind(user_id)
        .bind(password_hash)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn update_credentials<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    password_hash: &str,
) -> Res<()> {
    sqlx::query("UPDATE auth_credentials SET password_hash = $2 WHERE user_id = $1")
        .bind(user_id)
        .bind(password_hash)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn get_user_with_password_hash<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<Option<(User, AuthCredentials)>> {
    let row = sqlx::query_as::<_, UserWithHash>(
        r#"
        SELECT u.*, ac.password_hash
        FROM users u
        JOIN auth_credentials ac ON u.id = ac.user_id
        WHERE lower(u.email) = lower($1)
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)?;

    Ok(row.map(|record| {
        let credentials = AuthCredentials {
            user_id: record.id,
            password_hash: record.password_hash,
        };
        (
            User {
                id: record.id,
                email: record.email,
                first_name: record.first_name,
                last_name: record.last_name,
                client_id: record.client_id,
                is_admin: record.is_admin,
                admin_role: record.admin_role,
                custom_permissions: record.custom_permissions,
                created_at: record.created_at,
                updated_at: record.updated_at,
            },
            credentials,
        )
    }))
}

#[derive(sqlx::FromRow)]
struct UserWithHash {
    id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    client_id: Option<Uuid>,
    is_admin: bool,
    admin_role: Option<String>,
    custom_permissions: Option<JsonValue>,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
    password_hash: String,
}

pub async fn list_admins<'e, E: Executor<'e, Database = Postgres>>(executor: E) -> Res<Vec<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE is_admin = TRUE ORDER BY created_at")
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

/// Demotes an admin actor. The user row survives so audit entries keep a
/// valid actor reference.
pub async fn remove_admin<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<User> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET is_admin = FALSE, admin_role = NULL, custom_permissions = NULL,
            updated_at = now()
        WHERE id = $1 AND is_admin = TRUE
        RETURNING *
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_custom_permissions<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    custom_permissions: &JsonValue,
) -> Res<User> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET custom_permissions = $2, updated_at = now()
        WHERE id = $1 AND is_admin = TRUE
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(custom_permissions)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}
