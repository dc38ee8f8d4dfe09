use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::client::{BillingUpdate, ClientUpdateRequest},
    models::client::{Client, SubscriptionStatus},
};

/// Applies one subscription event to the tenant row, creating the tenant
/// lazily when the customer is not known yet.
///
/// Keyed on stripe_customer_id so redelivery of the same event is a no-op:
/// every column is SET to the event-derived value rather than accumulated.
/// This is also the only place minutes_used resets to zero.
pub async fn apply_billing_update<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    update: &BillingUpdate,
) -> Res<Client> {
    sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients (
            business_name, contact_email, timezone,
            plan, billing_interval, stripe_customer_id, stripe_subscription_id,
            subscription_status, current_period_end,
            minutes_included, minutes_used, overage_rate, monthly_rate, is_active
        )
        VALUES ('', '', 'UTC', $1, $2, $3, $4, $5, $6, $7, 0, $8, $9, $10)
        ON CONFLICT (stripe_customer_id) DO UPDATE SET
            plan = EXCLUDED.plan,
            billing_interval = EXCLUDED.billing_interval,
            stripe_subscription_id = EXCLUDED.stripe_subscription_id,
            subscription_status = EXCLUDED.subscription_status,
            current_period_end = EXCLUDED.current_period_end,
            minutes_included = EXCLUDED.minutes_included,
            minutes_used = 0,
            overage_rate = EXCLUDED.overage_rate,
            monthly_rate = EXCLUDED.monthly_rate,
            is_active = EXCLUDED.is_active,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(update.plan.as_str())
    .bind(update.billing_interval.as_str())
    .bind(&update.stripe_customer_id)
    .bind(&update.stripe_subscription_id)
    .bind(update.subscription_status.as_str())
    .bind(update.current_period_end)
    .bind(update.minutes_included)
    .bind(update.overage_rate)
    .bind(update.monthly_rate)
    .bind(update.is_active)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Updates the subscription status for the tenant owning the given external
/// customer id. Used by invoice and cancellation events. Returns None when
/// no tenant matches, which callers log rather than treat as an error.
pub async fn set_status_by_customer<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    stripe_customer_id: &str,
    status: SubscriptionStatus,
    is_active: Option<bool>,
    period_end: Option<chrono::NaiveDateTime>,
) -> Res<Option<Client>> {
    sqlx::query_as::<_, Client>(
        r#"
        UPDATE clients SET
            subscription_status = $2,
            is_active = COALESCE($3, is_active),
            current_period_end = COALESCE($4, current_period_end),
            updated_at = now()
        WHERE stripe_customer_id = $1
        RETURNING *
        "#,
    )
    .bind(stripe_customer_id)
    .bind(status.as_str())
    .bind(is_active)
    .bind(period_end)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    client_id: Uuid,
) -> Res<Client> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
        .bind(client_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_by_stripe_customer_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    stripe_customer_id: &str,
) -> Res<Option<Client>> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE stripe_customer_id = $1")
        .bind(stripe_customer_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn list_all<'e, E: Executor<'e, Database = Postgres>>(executor: E) -> Res<Vec<Client>> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY created_at DESC")
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

/// Flips the operational flag. Suspension is a status change, not a
/// deletion: the row and its history stay intact.
pub async fn set_operational<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    client_id: Uuid,
    is_active: bool,
) -> Res<Client> {
    sqlx::query_as::<_, Client>(
        "UPDATE clients SET is_active = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(client_id)
    .bind(is_active)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_profile<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    client_id: Uuid,
    update: &ClientUpdateRequest,
) -> Res<Client> {
    sqlx::query_as::<_, Client>(
        r#"
        UPDATE clients SET
            business_name = COALESCE($2, business_name),
            contact_email = COALESCE($3, contact_email),
            phone = COALESCE($4, phone),
            timezone = COALESCE($5, timezone),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(client_id)
    .bind(&update.business_name)
    .bind(&update.contact_email)
    .bind(&update.phone)
    .bind(&update.timezone)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Hard delete for administrative cleanup. Dependent calls and users are
/// removed by ON DELETE CASCADE.
pub async fn delete_client<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    client_id: Uuid,
) -> Res<u64> {
    sqlx::query("DELETE FROM clients WHERE id = $1")
        .bind(client_id)
        .execute(executor)
        .await
        .map(|result| result.rows_affected())
        .map_err(AppError::from)
}

/// Adds completed-call minutes to the usage counter. The only code path
/// that increments minutes_used; resets happen solely in
/// apply_billing_update.
pub async fn add_minutes_used<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    client_id: Uuid,
    minutes: i32,
) -> Res<()> {
    sqlx::query(
        "UPDATE clients SET minutes_used = minutes_used + $2, updated_at = now() WHERE id = $1",
    )
    .bind(client_id)
    .bind(minutes)
    .execute(executor)
    .await?;
    Ok(())
}
