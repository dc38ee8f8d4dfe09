use std::sync::Arc;

use actix_web::{HttpRequest, Responder, get, web};
use common::error::Res;
use common::http::Success;
use common::permissions::Capability;
use db::dtos::audit::AuditFilter;
use sqlx::PgPool;

use crate::dtos::admin::SummaryQuery;
use crate::gateway;

/// Filtered read over the audit trail, newest first.
#[get("/audit")]
async fn get_audit_log(
    req: HttpRequest,
    filter: web::Query<AuditFilter>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    gateway::authorize(&pool, &req, Capability::ViewAuditLog).await?;

    let entries = db::audit::query(pool.get_ref().as_ref(), filter.into_inner()).await?;

    Success::ok(entries)
}

/// Activity rollup: totals, per-action counts, most active actors and the
/// latest high-risk entries.
#[get("/audit/summary")]
async fn get_audit_summary(
    req: HttpRequest,
    query: web::Query<SummaryQuery>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    gateway::authorize(&pool, &req, Capability::ViewAuditLog).await?;

    let summary = db::audit::aggregate(&pool, query.from, query.to).await?;

    Success::ok(summary)
}
