use chrono::NaiveDateTime;
use sqlx::types::JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub email: String,
    pub role: String,
    pub custom_permissions: Option<JsonValue>,
    pub token: String,
    pub expires_at: NaiveDateTime,
    pub invited_by: Uuid,
}
