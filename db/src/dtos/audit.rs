use chrono::NaiveDateTime;
use serde::Deserialize;
use sqlx::types::{JsonValue, ipnetwork::IpNetwork};
use uuid::Uuid;

use crate::models::audit::AuditAction;

#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub action: AuditAction,
    pub actor_id: Uuid,
    pub target_type: Option<String>,
    pub target_id: Option<String>,
    /// Before/after payload of the mutation.
    pub changes: Option<JsonValue>,
    pub metadata: Option<JsonValue>,
    pub ip_address: Option<IpNetwork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditFilter {
    pub actor_id: Option<Uuid>,
    pub action: Option<String>,
    pub target_type: Option<String>,
    pub target_id: Option<String>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub limit: Option<i64>,
}
