use chrono::NaiveDateTime;
use common::plans::{BillingInterval, PlanTier};
use serde::Deserialize;

use crate::models::client::SubscriptionStatus;

/// The full billing state derived from one subscription event. Applied as a
/// single upsert keyed by the external customer id, so delivering the same
/// event twice leaves the row unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingUpdate {
    pub stripe_customer_id: String,
    pub stripe_subscription_id: String,
    pub plan: PlanTier,
    pub billing_interval: BillingInterval,
    pub minutes_included: i32,
    pub monthly_rate: f64,
    pub overage_rate: f64,
    pub subscription_status: SubscriptionStatus,
    pub is_active: bool,
    pub current_period_end: NaiveDateTime,
}

/// Named optional fields for administrative tenant edits; merged
/// field-by-field, never as a blind object merge.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientUpdateRequest {
    pub business_name: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub timezone: Option<String>,
}
