use serde::Deserialize;

/// Partial settings update with named optional fields. Each present field
/// replaces its column; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub default_booking_value: Option<f64>,
    pub grace_period_days: Option<i32>,
    pub support_email: Option<String>,
    pub maintenance_mode: Option<bool>,
}
