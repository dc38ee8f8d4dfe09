use std::sync::Arc;

use actix_web::{HttpRequest, Responder, get, post, web};
use common::error::{AppError, Res};
use common::http::Success;
use common::jwt;
use common::plans::PLAN_CATALOG;
use sqlx::PgPool;

use crate::dtos::billing::{CheckoutResponse, SubscribeRequest};
use crate::services;

/// Lists the subscription catalog.
#[get("/plans")]
async fn get_plans() -> Res<impl Responder> {
    Success::ok(PLAN_CATALOG)
}

/// Starts a hosted checkout for the authenticated tenant.
#[post("/subscribe")]
async fn post_subscribe(
    http_req: HttpRequest,
    req: web::Json<SubscribeRequest>,
    pool: web::Data<Arc<PgPool>>,
    stripe_client: web::Data<Arc<stripe::Client>>,
) -> Res<impl Responder> {
    let claims = jwt::claims_from_request(&http_req)?;
    let client_id = claims
        .client_id
        .ok_or_else(|| AppError::Forbidden("Only tenant accounts can subscribe".to_string()))?;

    let session =
        services::checkout::start_checkout(&pool, &stripe_client, client_id, &req).await?;

    let checkout_url = session
        .url
        .clone()
        .ok_or_else(|| AppError::Internal("Checkout session has no redirect URL".to_string()))?;

    Success::created(CheckoutResponse { checkout_url })
}
