use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription lifecycle states driven by payment-provider events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Canceled,
    Suspended,
}

impl SubscriptionStatus {
    pub fn parse(status: &str) -> Option<SubscriptionStatus> {
        match status {
            "active" => Some(SubscriptionStatus::Active),
            "past_due" => Some(SubscriptionStatus::PastDue),
            "canceled" => Some(SubscriptionStatus::Canceled),
            "suspended" => Some(SubscriptionStatus::Suspended),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Suspended => "suspended",
        }
    }
}

/// One row per business customer (tenant).
///
/// Billing columns (plan, allotment, rates) are a local cache of the plan
/// catalog entry resolved from the last subscription webhook, so usage and
/// cost can be reported without calling the payment provider.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Client {
    pub id: Uuid,
    pub business_name: String,
    pub contact_email: String,
    pub phone: Option<String>,
    pub timezone: String,
    pub plan: Option<String>,
    pub billing_interval: Option<String>,
    pub stripe_customer_id: String,
    pub stripe_subscription_id: Option<String>,
    pub subscription_status: String,
    pub current_period_end: Option<NaiveDateTime>,
    pub minutes_included: i32,
    pub minutes_used: i32,
    pub overage_rate: f64,
    pub monthly_rate: f64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
