use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, post, web};
use common::env_config::Config;
use common::error::{AppError, Res};
use serde_json::json;
use sqlx::PgPool;

use crate::services;

/// Payment-provider event delivery. Authenticated by the signature header
/// alone; any verified event, handled or not, gets a 200 so the provider
/// stops retrying it.
#[post("/webhook")]
async fn post_webhook(
    req: HttpRequest,
    payload: web::Bytes,
    pool: web::Data<Arc<PgPool>>,
    stripe_client: web::Data<Arc<stripe::Client>>,
    config: web::Data<Arc<Config>>,
) -> Res<HttpResponse> {
    let signature = req
        .headers()
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing stripe-signature header".to_string()))?;

    let payload = std::str::from_utf8(&payload)
        .map_err(|_| AppError::BadRequest("Webhook payload is not valid UTF-8".to_string()))?;

    let event = services::webhook::construct_event(payload, signature, &config.stripe_webhook_secret)?;
    services::webhook::process_event(&pool, &stripe_client, event).await?;

    Ok(HttpResponse::Ok().json(json!({ "received": true })))
}
