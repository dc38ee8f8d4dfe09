use std::sync::Arc;

use actix_web::{HttpRequest, Responder, get, web};
use chrono::{Duration, Utc};
use common::error::{AppError, Res};
use common::http::Success;
use common::jwt;
use sqlx::PgPool;

use crate::dtos::billing::ReportQuery;
use crate::services;

/// Billing and ROI report for the authenticated tenant. Defaults to the
/// last thirty days when no window is given.
#[get("/report")]
async fn get_report(
    http_req: HttpRequest,
    query: web::Query<ReportQuery>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let claims = jwt::claims_from_request(&http_req)?;
    let client_id = claims
        .client_id
        .ok_or_else(|| AppError::Forbidden("Reports are scoped to a tenant account".to_string()))?;

    let to = query.to.unwrap_or_else(|| Utc::now().naive_utc());
    let from = query.from.unwrap_or_else(|| to - Duration::days(30));
    if from > to {
        return Err(AppError::BadRequest(
            "Window start must not be after its end".to_string(),
        ));
    }

    let report = services::report::billing_report(&pool, client_id, from, to).await?;

    Success::ok(report)
}
