use chrono::{DateTime, NaiveDateTime, Utc};
use common::error::{AppError, Res};
use common::plans::{interval_for_price, plan_for_price, rate_for};
use db::dtos::client::BillingUpdate;
use db::models::client::SubscriptionStatus;
use sqlx::PgPool;
use stripe::{Client, Event, EventObject, EventType, Subscription, Webhook};

/// Creates an event for the webhook based on the request payload and signature.
/// Signature verification is a constant-time HMAC-SHA256 over the raw body;
/// a mismatch rejects the delivery before anything is parsed or written.
pub fn construct_event(payload: &str, signature: &str, webhook_secret: &str) -> Res<Event> {
    match Webhook::construct_event(payload, signature, webhook_secret) {
        Ok(event) => Ok(event),
        Err(e) => {
            log::error!("Error constructing webhook event: {}", e);
            Err(AppError::BadRequest(format!("Webhook Error: {}", e)))
        }
    }
}

/// The fields of a provider subscription object that drive our state
/// machine, flattened out of the Stripe types so the mapping below stays
/// a pure function.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionEventData {
    pub stripe_customer_id: String,
    pub stripe_subscription_id: String,
    pub price_id: Option<String>,
    pub provider_active: bool,
    pub period_end: i64,
}

fn extract_subscription_data(subscription: &Subscription) -> SubscriptionEventData {
    SubscriptionEventData {
        stripe_customer_id: subscription.customer.id().to_string(),
        stripe_subscription_id: subscription.id.to_string(),
        price_id: subscription
            .items
            .data
            .first()
            .and_then(|item| item.price.as_ref())
            .map(|price| price.id.to_string()),
        provider_active: matches!(subscription.status, stripe::SubscriptionStatus::Active),
        period_end: subscription.current_period_end,
    }
}

/// Maps one subscription event to the tenant billing state it implies.
///
/// The plan is resolved through the catalog only; an event whose price id
/// is not in the catalog returns None and is dropped by the caller (with a
/// warning) rather than guessed at. The same input always produces the
/// same update, and the update is applied as an upsert, so redelivery is
/// harmless.
pub fn billing_update_for(data: &SubscriptionEventData) -> Option<BillingUpdate> {
    let price_id = data.price_id.as_deref()?;
    let plan = plan_for_price(price_id)?;
    let interval = interval_for_price(price_id)?;

    let (status, is_active) = if data.provider_active {
        (SubscriptionStatus::Active, true)
    } else {
        (SubscriptionStatus::Suspended, false)
    };

    Some(BillingUpdate {
        stripe_customer_id: data.stripe_customer_id.clone(),
        stripe_subscription_id: data.stripe_subscription_id.clone(),
        plan: plan.tier,
        billing_interval: interval,
        minutes_included: plan.minutes_included,
        monthly_rate: rate_for(plan, interval),
        overage_rate: plan.overage_rate,
        subscription_status: status,
        is_active,
        current_period_end: timestamp_to_naive(data.period_end),
    })
}

/// Status transition implied by an invoice payment event. A succeeded
/// payment also restores the operational flag, recovering a past_due
/// tenant; a failed payment leaves the tenant functioning until the
/// grace-period policy suspends it.
pub fn invoice_transition(payment_succeeded: bool) -> (SubscriptionStatus, Option<bool>) {
    if payment_succeeded {
        (SubscriptionStatus::Active, Some(true))
    } else {
        (SubscriptionStatus::PastDue, None)
    }
}

fn timestamp_to_naive(timestamp: i64) -> NaiveDateTime {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or_else(|| Utc::now().naive_utc())
}

/// Processes the webhook event. Unrecognized event types are logged and
/// ignored; they are a successful no-op, not an error.
pub async fn process_event(pool: &PgPool, stripe_client: &Client, event: Event) -> Res<()> {
    log::info!("Processing webhook event: {}", event.type_);

    match event.type_ {
        EventType::CustomerSubscriptionCreated | EventType::CustomerSubscriptionUpdated => {
            if let EventObject::Subscription(subscription) = event.data.object {
                apply_subscription(pool, &subscription).await?;
            }
        }
        EventType::CustomerSubscriptionDeleted => {
            if let EventObject::Subscription(subscription) = event.data.object {
                let customer_id = subscription.customer.id().to_string();
                let effective_end = subscription
                    .ended_at
                    .or(subscription.canceled_at)
                    .unwrap_or(subscription.current_period_end);
                let updated = db::client::set_status_by_customer(
                    pool,
                    &customer_id,
                    SubscriptionStatus::Canceled,
                    Some(false),
                    Some(timestamp_to_naive(effective_end)),
                )
                .await?;
                match updated {
                    Some(client) => {
                        log::info!("Subscription canceled for tenant {}", client.id)
                    }
                    None => log::warn!(
                        "Subscription deleted for unknown customer {}",
                        customer_id
                    ),
                }
            }
        }
        EventType::InvoicePaymentSucceeded | EventType::InvoicePaymentFailed => {
            if let EventObject::Invoice(invoice) = event.data.object {
                let Some(customer_id) = invoice.customer.as_ref().map(|c| c.id().to_string())
                else {
                    log::warn!("Invoice event without a customer reference, dropping");
                    return Ok(());
                };
                let succeeded = matches!(event.type_, EventType::InvoicePaymentSucceeded);
                let (status, is_active) = invoice_transition(succeeded);
                let updated = db::client::set_status_by_customer(
                    pool,
                    &customer_id,
                    status,
                    is_active,
                    None,
                )
                .await?;
                match updated {
                    Some(client) => log::info!(
                        "Invoice payment {} for tenant {}, status now {}",
                        if succeeded { "succeeded" } else { "failed" },
                        client.id,
                        status.as_str()
                    ),
                    None => log::warn!("Invoice event for unknown customer {}", customer_id),
                }
            }
        }
        EventType::CheckoutSessionCompleted => {
            if let EventObject::CheckoutSession(session) = event.data.object {
                // The session only references the subscription; fetch it and
                // run the same created/updated path rather than a second
                // transition.
                let Some(subscription_id) =
                    session.subscription.as_ref().map(|s| s.id().to_string())
                else {
                    log::warn!("Checkout session {} without a subscription, dropping", session.id);
                    return Ok(());
                };
                let subscription =
                    common::stripe::retrieve_subscription(stripe_client, &subscription_id).await?;
                apply_subscription(pool, &subscription).await?;
            }
        }
        _ => {
            log::info!("Unhandled event type: {}", event.type_);
        }
    }

    Ok(())
}

async fn apply_subscription(pool: &PgPool, subscription: &Subscription) -> Res<()> {
    let data = extract_subscription_data(subscription);

    let Some(update) = billing_update_for(&data) else {
        // Data-integrity gap: the provider references a price we do not
        // sell. Surface it in the logs and drop the event.
        log::warn!(
            "Subscription {} for customer {} has unresolvable price {:?}, dropping event",
            data.stripe_subscription_id,
            data.stripe_customer_id,
            data.price_id
        );
        return Ok(());
    };

    let client = db::client::apply_billing_update(pool, &update).await?;
    log::info!(
        "Tenant {} now on plan {} ({}), status {}",
        client.id,
        update.plan.as_str(),
        update.billing_interval.as_str(),
        update.subscription_status.as_str()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::plans::{BillingInterval, PlanTier};

    fn event_data(price_id: &str, active: bool) -> SubscriptionEventData {
        SubscriptionEventData {
            stripe_customer_id: "cus_123".to_string(),
            stripe_subscription_id: "sub_456".to_string(),
            price_id: Some(price_id.to_string()),
            provider_active: active,
            period_end: 1_760_000_000,
        }
    }

    #[test]
    fn complete_monthly_event_maps_to_complete_plan() {
        let update = billing_update_for(&event_data("price_callpilot_complete_monthly", true))
            .expect("catalog price resolves");
        assert_eq!(update.plan, PlanTier::Complete);
        assert_eq!(update.billing_interval, BillingInterval::Month);
        assert_eq!(update.minutes_included, 1000);
        assert_eq!(update.subscription_status, SubscriptionStatus::Active);
        assert!(update.is_active);
    }

    #[test]
    fn inactive_provider_status_maps_to_suspended() {
        let update = billing_update_for(&event_data("price_callpilot_starter_annual", false))
            .expect("catalog price resolves");
        assert_eq!(update.subscription_status, SubscriptionStatus::Suspended);
        assert!(!update.is_active);
        assert_eq!(update.billing_interval, BillingInterval::Year);
    }

    #[test]
    fn unknown_price_is_dropped_not_guessed() {
        assert!(billing_update_for(&event_data("price_from_another_app", true)).is_none());

        let mut data = event_data("price_callpilot_starter_monthly", true);
        data.price_id = None;
        assert!(billing_update_for(&data).is_none());
    }

    #[test]
    fn same_event_yields_identical_update() {
        // The update is applied as a keyed upsert, so equality of the
        // derived update is what makes redelivery idempotent.
        let data = event_data("price_callpilot_complete_monthly", true);
        let first = billing_update_for(&data).unwrap();
        let second = billing_update_for(&data).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn failed_then_succeeded_invoice_recovers_tenant() {
        let (status, _) = invoice_transition(false);
        assert_eq!(status, SubscriptionStatus::PastDue);

        let (status, is_active) = invoice_transition(true);
        assert_eq!(status, SubscriptionStatus::Active);
        assert_eq!(is_active, Some(true));
    }

    #[test]
    fn failed_invoice_leaves_operational_flag_untouched() {
        let (_, is_active) = invoice_transition(false);
        assert_eq!(is_active, None);
    }

    #[test]
    fn invalid_signature_is_rejected() {
        let result = construct_event(
            r#"{"id":"evt_test"}"#,
            "t=1700000000,v1=deadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef",
            "whsec_test_secret",
        );
        assert!(result.is_err());
    }
}
