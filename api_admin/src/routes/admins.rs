use std::sync::Arc;

use actix_web::{HttpRequest, Responder, delete, get, put, web};
use common::error::{AppError, Res};
use common::http::Success;
use common::permissions::Capability;
use db::models::audit::AuditAction;
use serde_json::json;
use sqlx::PgPool;
use sqlx::types::JsonValue;
use uuid::Uuid;

use crate::dtos::admin::PermissionsUpdateRequest;
use crate::gateway;
use crate::services;

fn admin_not_found(e: AppError) -> AppError {
    match e {
        AppError::Database(sqlx::Error::RowNotFound) => {
            AppError::NotFound("Admin not found".to_string())
        }
        other => other,
    }
}

#[get("/admins")]
async fn get_admins(req: HttpRequest, pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    gateway::authorize(&pool, &req, Capability::ViewAdmins).await?;

    Success::ok(db::user::list_admins(pool.get_ref().as_ref()).await?)
}

/// Demotes an admin. The user row stays so existing audit entries keep a
/// valid actor reference; access ends on their next request because the
/// gateway re-reads the row.
#[delete("/admins/{user_id}")]
async fn delete_admin(
    req: HttpRequest,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let ctx = gateway::authorize(&pool, &req, Capability::RemoveAdmins).await?;
    let user_id = path.into_inner();

    if ctx.actor.id == user_id {
        return Err(AppError::BadRequest(
            "Admins cannot remove themselves".to_string(),
        ));
    }

    let before = db::user::get_user_by_id(pool.get_ref().as_ref(), user_id)
        .await
        .map_err(admin_not_found)?;
    let removed = db::user::remove_admin(pool.get_ref().as_ref(), user_id)
        .await
        .map_err(admin_not_found)?;

    gateway::record(
        &pool,
        &ctx,
        AuditAction::AdminRemoved,
        "user",
        user_id.to_string(),
        Some(json!({
            "before": { "admin_role": &before.admin_role },
            "after": { "admin_role": null },
        })),
        Some(json!({ "email": &removed.email })),
    )
    .await;

    Success::ok(removed)
}

/// Replaces an admin's capability override map. The map is validated
/// against the capability enum; unknown keys never reach storage.
#[put("/admins/{user_id}/permissions")]
async fn put_admin_permissions(
    req: HttpRequest,
    path: web::Path<Uuid>,
    update: web::Json<PermissionsUpdateRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let ctx = gateway::authorize(&pool, &req, Capability::EditAdminPermissions).await?;
    let user_id = path.into_inner();

    let sanitized = services::invite::sanitize_overrides(Some(&update.custom_permissions))
        .unwrap_or(JsonValue::Object(serde_json::Map::new()));

    let before = db::user::get_user_by_id(pool.get_ref().as_ref(), user_id)
        .await
        .map_err(admin_not_found)?;
    let updated = db::user::update_custom_permissions(pool.get_ref().as_ref(), user_id, &sanitized)
        .await
        .map_err(admin_not_found)?;

    gateway::record(
        &pool,
        &ctx,
        AuditAction::AdminPermissionsChanged,
        "user",
        user_id.to_string(),
        Some(json!({
            "before": { "custom_permissions": &before.custom_permissions },
            "after": { "custom_permissions": &updated.custom_permissions },
        })),
        Some(json!({ "email": &updated.email })),
    )
    .await;

    Success::ok(updated)
}
