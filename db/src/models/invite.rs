use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::types::JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteStatus {
    Pending,
    Accepted,
    Expired,
    Cancelled,
}

impl InviteStatus {
    pub fn parse(status: &str) -> Option<InviteStatus> {
        match status {
            "pending" => Some(InviteStatus::Pending),
            "accepted" => Some(InviteStatus::Accepted),
            "expired" => Some(InviteStatus::Expired),
            "cancelled" => Some(InviteStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Pending => "pending",
            InviteStatus::Accepted => "accepted",
            InviteStatus::Expired => "expired",
            InviteStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AdminInvitation {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub custom_permissions: Option<JsonValue>,
    #[serde(skip_serializing)]
    pub token: String,
    pub status: String,
    pub expires_at: NaiveDateTime,
    pub invited_by: Uuid,
    pub created_at: NaiveDateTime,
    pub accepted_at: Option<NaiveDateTime>,
}

impl AdminInvitation {
    /// Whether the invitation can still be acted on at the given instant.
    /// A pending invitation past its expiry must be lazily marked expired
    /// by the caller.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now > self.expires_at
    }
}
