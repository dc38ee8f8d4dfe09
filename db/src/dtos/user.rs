use sqlx::types::JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewAdminUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub custom_permissions: Option<JsonValue>,
}

#[derive(Debug, Clone)]
pub struct NewPasswordReset {
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: chrono::NaiveDateTime,
}
