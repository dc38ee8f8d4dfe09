use std::sync::Arc;

use actix_web::{HttpRequest, Responder, get, put, web};
use common::error::Res;
use common::http::Success;
use common::permissions::Capability;
use db::dtos::settings::SettingsUpdate;
use db::models::audit::AuditAction;
use serde_json::json;
use sqlx::PgPool;

use crate::gateway;
use crate::services;

/// Reads the settings singleton, creating it with defaults on first access.
#[get("/settings")]
async fn get_settings(req: HttpRequest, pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    gateway::authorize(&pool, &req, Capability::ViewSettings).await?;

    Success::ok(db::settings::get_or_create(&pool).await?)
}

/// Merges the given fields into the singleton. Absent fields keep their
/// stored values.
#[put("/settings")]
async fn put_settings(
    req: HttpRequest,
    update: web::Json<SettingsUpdate>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let ctx = gateway::authorize(&pool, &req, Capability::EditSettings).await?;

    let before = db::settings::get_or_create(&pool).await?;
    let after = services::settings::update_settings(&pool, &update).await?;

    gateway::record(
        &pool,
        &ctx,
        AuditAction::SettingsUpdated,
        "settings",
        after.id.to_string(),
        Some(json!({ "before": &before, "after": &after })),
        None,
    )
    .await;

    Success::ok(after)
}
