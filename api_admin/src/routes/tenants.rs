use std::sync::Arc;

use actix_web::{HttpRequest, Responder, delete, get, patch, post, web};
use common::error::{AppError, Res};
use common::http::Success;
use common::permissions::Capability;
use db::dtos::client::ClientUpdateRequest;
use db::models::audit::AuditAction;
use db::models::client::Client;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::gateway;

fn tenant_not_found(e: AppError) -> AppError {
    match e {
        AppError::Database(sqlx::Error::RowNotFound) => {
            AppError::NotFound("Tenant not found".to_string())
        }
        other => other,
    }
}

fn profile_json(client: &Client) -> serde_json::Value {
    json!({
        "business_name": client.business_name,
        "contact_email": client.contact_email,
        "phone": client.phone,
        "timezone": client.timezone,
        "is_active": client.is_active,
    })
}

#[get("/tenants")]
async fn get_tenants(req: HttpRequest, pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    gateway::authorize(&pool, &req, Capability::ViewTenants).await?;

    Success::ok(db::client::list_all(pool.get_ref().as_ref()).await?)
}

#[get("/tenants/{tenant_id}")]
async fn get_tenant(
    req: HttpRequest,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    gateway::authorize(&pool, &req, Capability::ViewTenants).await?;

    let tenant = db::client::get_by_id(pool.get_ref().as_ref(), path.into_inner())
        .await
        .map_err(tenant_not_found)?;

    Success::ok(tenant)
}

#[patch("/tenants/{tenant_id}")]
async fn patch_tenant(
    req: HttpRequest,
    path: web::Path<Uuid>,
    update: web::Json<ClientUpdateRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let ctx = gateway::authorize(&pool, &req, Capability::EditTenants).await?;
    let tenant_id = path.into_inner();

    let before = db::client::get_by_id(pool.get_ref().as_ref(), tenant_id)
        .await
        .map_err(tenant_not_found)?;
    let after = db::client::update_profile(pool.get_ref().as_ref(), tenant_id, &update).await?;

    gateway::record(
        &pool,
        &ctx,
        AuditAction::TenantUpdated,
        "tenant",
        tenant_id.to_string(),
        Some(json!({ "before": profile_json(&before), "after": profile_json(&after) })),
        None,
    )
    .await;

    Success::ok(after)
}

#[post("/tenants/{tenant_id}/suspend")]
async fn post_suspend_tenant(
    req: HttpRequest,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let ctx = gateway::authorize(&pool, &req, Capability::SuspendTenants).await?;
    let tenant_id = path.into_inner();

    let tenant = db::client::set_operational(pool.get_ref().as_ref(), tenant_id, false)
        .await
        .map_err(tenant_not_found)?;

    gateway::record(
        &pool,
        &ctx,
        AuditAction::TenantSuspended,
        "tenant",
        tenant_id.to_string(),
        Some(json!({ "before": { "is_active": true }, "after": { "is_active": false } })),
        Some(json!({ "business_name": &tenant.business_name })),
    )
    .await;

    Success::ok(tenant)
}

#[post("/tenants/{tenant_id}/reactivate")]
async fn post_reactivate_tenant(
    req: HttpRequest,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let ctx = gateway::authorize(&pool, &req, Capability::SuspendTenants).await?;
    let tenant_id = path.into_inner();

    let tenant = db::client::set_operational(pool.get_ref().as_ref(), tenant_id, true)
        .await
        .map_err(tenant_not_found)?;

    gateway::record(
        &pool,
        &ctx,
        AuditAction::TenantReactivated,
        "tenant",
        tenant_id.to_string(),
        Some(json!({ "before": { "is_active": false }, "after": { "is_active": true } })),
        Some(json!({ "business_name": &tenant.business_name })),
    )
    .await;

    Success::ok(tenant)
}

/// Hard delete. Calls and tenant users go with the row via ON DELETE
/// CASCADE, so the before-image in the audit entry is all that remains.
#[delete("/tenants/{tenant_id}")]
async fn delete_tenant(
    req: HttpRequest,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let ctx = gateway::authorize(&pool, &req, Capability::DeleteTenants).await?;
    let tenant_id = path.into_inner();

    let before = db::client::get_by_id(pool.get_ref().as_ref(), tenant_id)
        .await
        .map_err(tenant_not_found)?;
    let rows = db::client::delete_client(pool.get_ref().as_ref(), tenant_id).await?;
    if rows == 0 {
        return Err(AppError::NotFound("Tenant not found".to_string()));
    }

    gateway::record(
        &pool,
        &ctx,
        AuditAction::TenantDeleted,
        "tenant",
        tenant_id.to_string(),
        Some(json!({ "before": profile_json(&before), "after": null })),
        None,
    )
    .await;

    Success::ok(json!({ "deleted": true }))
}
