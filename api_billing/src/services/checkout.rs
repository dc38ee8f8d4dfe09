use common::error::{AppError, Res};
use common::plans::price_id_for;
use sqlx::PgPool;
use stripe::{
    CheckoutSession, CheckoutSessionMode, Client as StripeClient, CreateCheckoutSession,
    CustomerId,
};
use uuid::Uuid;

use crate::dtos::billing::SubscribeRequest;

/// Creates a hosted checkout session for the tenant. The price comes from
/// the plan catalog, never from the request, so a client cannot subscribe
/// at an arbitrary price id.
pub async fn start_checkout(
    pool: &PgPool,
    stripe_client: &StripeClient,
    client_id: Uuid,
    req: &SubscribeRequest,
) -> Res<CheckoutSession> {
    let client = db::client::get_by_id(pool, client_id).await?;

    let customer_id = client.stripe_customer_id.parse::<CustomerId>().map_err(|e| {
        AppError::Internal(format!(
            "Failed to parse customer id: {}. {}",
            client.stripe_customer_id, e
        ))
    })?;

    let price_id = price_id_for(req.plan, req.interval);

    let params = CreateCheckoutSession {
        payment_method_types: Some(vec![stripe::CreateCheckoutSessionPaymentMethodTypes::Card]),
        line_items: Some(vec![stripe::CreateCheckoutSessionLineItems {
            price: Some(price_id.to_string()),
            quantity: Some(1),
            ..Default::default()
        }]),
        mode: Some(CheckoutSessionMode::Subscription),
        success_url: Some(req.success_url.as_str()),
        cancel_url: Some(req.cancel_url.as_str()),
        customer: Some(customer_id),
        ..Default::default()
    };

    CheckoutSession::create(stripe_client, params)
        .await
        .map_err(AppError::from)
}
