use chrono::NaiveDateTime;
use serde::Serialize;

/// Platform-wide admin settings. Exactly one row exists, keyed by the fixed
/// identifier 1 and enforced by a CHECK constraint in the schema.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AdminSettings {
    pub id: i16,
    /// Assumed revenue per booked appointment, used for ROI estimates.
    pub default_booking_value: f64,
    /// Days a past_due tenant keeps functioning before suspension.
    pub grace_period_days: i32,
    pub support_email: String,
    pub maintenance_mode: bool,
    pub updated_at: NaiveDateTime,
}
