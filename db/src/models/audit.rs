use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::types::{JsonValue, ipnetwork::IpNetwork};
use uuid::Uuid;

/// Actions recorded in the audit trail. Closed set so queries and risk
/// classification stay in step with what the gateway actually writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    TenantUpdated,
    TenantSuspended,
    TenantReactivated,
    TenantDeleted,
    UserDeleted,
    AdminInvited,
    AdminInviteCancelled,
    AdminCreated,
    AdminRemoved,
    AdminPermissionsChanged,
    SettingsUpdated,
    DataExported,
    DataPurged,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::TenantUpdated => "tenant_updated",
            AuditAction::TenantSuspended => "tenant_suspended",
            AuditAction::TenantReactivated => "tenant_reactivated",
            AuditAction::TenantDeleted => "tenant_deleted",
            AuditAction::UserDeleted => "user_deleted",
            AuditAction::AdminInvited => "admin_invited",
            AuditAction::AdminInviteCancelled => "admin_invite_cancelled",
            AuditAction::AdminCreated => "admin_created",
            AuditAction::AdminRemoved => "admin_removed",
            AuditAction::AdminPermissionsChanged => "admin_permissions_changed",
            AuditAction::SettingsUpdated => "settings_updated",
            AuditAction::DataExported => "data_exported",
            AuditAction::DataPurged => "data_purged",
        }
    }
}

/// Actions surfaced in the "recent high-risk" aggregate: destructive or
/// platform-wide operations.
pub const HIGH_RISK_ACTIONS: [AuditAction; 6] = [
    AuditAction::TenantDeleted,
    AuditAction::UserDeleted,
    AuditAction::AdminRemoved,
    AuditAction::SettingsUpdated,
    AuditAction::DataExported,
    AuditAction::DataPurged,
];

/// Append-only record of a privileged action. Written once, never updated
/// or deleted by application logic.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub action: String,
    pub actor_id: Uuid,
    pub target_type: Option<String>,
    pub target_id: Option<String>,
    pub changes: Option<JsonValue>,
    pub metadata: Option<JsonValue>,
    pub ip_address: Option<IpNetwork>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ActionCount {
    pub action: String,
    pub count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ActorActivity {
    pub actor_id: Uuid,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub total_count: i64,
    pub counts_by_action: Vec<ActionCount>,
    pub top_actors: Vec<ActorActivity>,
    pub recent_high_risk: Vec<AuditLogEntry>,
}
