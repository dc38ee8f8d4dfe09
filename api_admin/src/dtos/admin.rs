use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::JsonValue;

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub email: String,
    pub role: String,
    pub custom_permissions: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
pub struct AcceptInviteRequest {
    pub token: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// What the invitee sees before accepting. Deliberately excludes the
/// override map and inviter identity.
#[derive(Debug, Serialize)]
pub struct InviteValidationResponse {
    pub email: String,
    pub role: String,
    pub expires_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct PermissionsUpdateRequest {
    pub custom_permissions: JsonValue,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}
