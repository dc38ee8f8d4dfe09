use chrono::{NaiveDate, NaiveDateTime};
use common::plans::{BillingInterval, PlanTier};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub plan: PlanTier,
    pub interval: BillingInterval,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
}

/// Reporting window. Both bounds optional; the route defaults to the last
/// thirty days.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub calls: i64,
    pub minutes: i64,
}

/// Usage, cost and return-on-investment breakdown for one tenant over a
/// reporting window. Costs come from the cached plan columns and the
/// period usage counter; call analytics come from the call records inside
/// the window.
#[derive(Debug, Serialize)]
pub struct BillingReport {
    pub period_start: NaiveDateTime,
    pub period_end: NaiveDateTime,
    pub plan: Option<String>,
    pub subscription_status: String,

    pub minutes_included: i32,
    pub minutes_used: i32,
    pub overage_minutes: i32,
    pub base_cost: f64,
    pub overage_cost: f64,
    pub total_cost: f64,

    pub total_calls: i64,
    pub total_duration_seconds: i64,
    pub average_duration_seconds: i64,
    pub answered_calls: i64,
    pub booked_appointments: i64,
    pub missed_calls: i64,
    pub voicemail_calls: i64,
    pub conversion_rate: f64,
    pub peak_hour: Option<u32>,
    pub daily: Vec<DailyActivity>,

    pub estimated_revenue: f64,
    pub cost_per_call: f64,
    pub roi_percent: f64,
}
