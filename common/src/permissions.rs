use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single named permission an admin action can require.
///
/// The set is closed on purpose: override maps stored as JSON are validated
/// against this enum at the boundary and unknown keys are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    // user management
    ViewUsers,
    EditUsers,
    DeleteUsers,
    ResetUserPasswords,
    // business / tenant management
    ViewTenants,
    EditTenants,
    SuspendTenants,
    DeleteTenants,
    ManageTenantBilling,
    // system configuration
    ViewSettings,
    EditSettings,
    ManageIntegrations,
    // analytics
    ViewAnalytics,
    ViewFinancialReports,
    ExportData,
    // admin management
    ViewAdmins,
    InviteAdmins,
    EditAdminPermissions,
    RemoveAdmins,
    // monitoring
    ViewAuditLog,
    ViewSystemHealth,
    ViewWebhookEvents,
    ViewCallLogs,
    // advanced / dangerous operations
    ImpersonateTenant,
    OverrideBilling,
    PurgeData,
    RunMaintenance,
    ManageApiKeys,
}

pub const ALL_CAPABILITIES: [Capability; 28] = [
    Capability::ViewUsers,
    Capability::EditUsers,
    Capability::DeleteUsers,
    Capability::ResetUserPasswords,
    Capability::ViewTenants,
    Capability::EditTenants,
    Capability::SuspendTenants,
    Capability::DeleteTenants,
    Capability::ManageTenantBilling,
    Capability::ViewSettings,
    Capability::EditSettings,
    Capability::ManageIntegrations,
    Capability::ViewAnalytics,
    Capability::ViewFinancialReports,
    Capability::ExportData,
    Capability::ViewAdmins,
    Capability::InviteAdmins,
    Capability::EditAdminPermissions,
    Capability::RemoveAdmins,
    Capability::ViewAuditLog,
    Capability::ViewSystemHealth,
    Capability::ViewWebhookEvents,
    Capability::ViewCallLogs,
    Capability::ImpersonateTenant,
    Capability::OverrideBilling,
    Capability::PurgeData,
    Capability::RunMaintenance,
    Capability::ManageApiKeys,
];

impl Capability {
    /// Parses a capability key as it appears in stored override maps.
    /// Unknown keys resolve to None and are dropped by the caller.
    pub fn parse(key: &str) -> Option<Capability> {
        serde_json::from_value(serde_json::Value::String(key.to_string())).ok()
    }
}

/// Admin role tiers, ordered by increasing privilege for display purposes
/// only. Each tier carries its own explicit capability list; there is no
/// hierarchical inclusion. BusinessPartner can read financial reports while
/// SupportStaff cannot, and SupportStaff can reset user passwords while
/// BusinessPartner cannot, so the sets are not monotonic across tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SupportStaff,
    BusinessPartner,
    Developer,
    SuperAdmin,
}

const SUPPORT_STAFF_CAPABILITIES: [Capability; 6] = [
    Capability::ViewUsers,
    Capability::ResetUserPasswords,
    Capability::ViewTenants,
    Capability::ViewAnalytics,
    Capability::ViewCallLogs,
    Capability::ViewSystemHealth,
];

const BUSINESS_PARTNER_CAPABILITIES: [Capability; 7] = [
    Capability::ViewUsers,
    Capability::ViewTenants,
    Capability::EditTenants,
    Capability::ViewAnalytics,
    Capability::ViewFinancialReports,
    Capability::ExportData,
    Capability::ViewCallLogs,
];

impl AdminRole {
    pub fn parse(role: &str) -> Option<AdminRole> {
        match role {
            "support_staff" => Some(AdminRole::SupportStaff),
            "business_partner" => Some(AdminRole::BusinessPartner),
            "developer" => Some(AdminRole::Developer),
            "super_admin" => Some(AdminRole::SuperAdmin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::SupportStaff => "support_staff",
            AdminRole::BusinessPartner => "business_partner",
            AdminRole::Developer => "developer",
            AdminRole::SuperAdmin => "super_admin",
        }
    }

    /// The static capability set for this tier.
    /// Developer and SuperAdmin are defined as identical full sets.
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            AdminRole::SupportStaff => &SUPPORT_STAFF_CAPABILITIES,
            AdminRole::BusinessPartner => &BUSINESS_PARTNER_CAPABILITIES,
            AdminRole::Developer => &ALL_CAPABILITIES,
            AdminRole::SuperAdmin => &ALL_CAPABILITIES,
        }
    }
}

/// Per-admin capability overrides. Overrides can only add capabilities on
/// top of the role's static set, never subtract.
pub type PermissionOverrides = HashMap<Capability, bool>;

/// Validates a stored JSON override map against the capability enum.
/// Unknown keys and non-boolean values are discarded.
pub fn parse_overrides(value: &serde_json::Value) -> PermissionOverrides {
    let mut overrides = PermissionOverrides::new();
    if let Some(map) = value.as_object() {
        for (key, val) in map {
            if let (Some(capability), Some(enabled)) = (Capability::parse(key), val.as_bool()) {
                overrides.insert(capability, enabled);
            }
        }
    }
    overrides
}

/// Evaluates whether an actor may perform the requested capability.
///
/// Denies unless the actor carries the admin flag and a known role. Allows
/// when the capability is in the role's static set, otherwise only when the
/// override map explicitly sets it to true. Never errors; missing or
/// malformed data resolves to deny.
pub fn has_permission(
    is_admin: bool,
    role: Option<&str>,
    overrides: Option<&PermissionOverrides>,
    capability: Capability,
) -> bool {
    if !is_admin {
        return false;
    }
    let Some(role) = role.and_then(AdminRole::parse) else {
        return false;
    };
    if role.capabilities().contains(&capability) {
        return true;
    }
    overrides
        .and_then(|map| map.get(&capability))
        .copied()
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_admin_has_no_capabilities() {
        for capability in ALL_CAPABILITIES {
            assert!(!has_permission(
                false,
                Some("super_admin"),
                None,
                capability
            ));
        }
    }

    #[test]
    fn admin_without_role_is_denied() {
        assert!(!has_permission(true, None, None, Capability::ViewUsers));
        assert!(!has_permission(
            true,
            Some("not_a_role"),
            None,
            Capability::ViewUsers
        ));
    }

    #[test]
    fn permission_check_matches_static_table() {
        for role in [
            AdminRole::SupportStaff,
            AdminRole::BusinessPartner,
            AdminRole::Developer,
            AdminRole::SuperAdmin,
        ] {
            for capability in ALL_CAPABILITIES {
                let expected = role.capabilities().contains(&capability);
                assert_eq!(
                    has_permission(true, Some(role.as_str()), None, capability),
                    expected,
                    "role {:?} capability {:?}",
                    role,
                    capability
                );
            }
        }
    }

    #[test]
    fn tiers_are_not_hierarchical() {
        // BusinessPartner sees financial reports, SupportStaff does not.
        assert!(has_permission(
            true,
            Some("business_partner"),
            None,
            Capability::ViewFinancialReports
        ));
        assert!(!has_permission(
            true,
            Some("support_staff"),
            None,
            Capability::ViewFinancialReports
        ));
        // SupportStaff resets passwords, BusinessPartner does not.
        assert!(has_permission(
            true,
            Some("support_staff"),
            None,
            Capability::ResetUserPasswords
        ));
        assert!(!has_permission(
            true,
            Some("business_partner"),
            None,
            Capability::ResetUserPasswords
        ));
    }

    #[test]
    fn developer_and_super_admin_are_identical() {
        assert_eq!(
            AdminRole::Developer.capabilities(),
            AdminRole::SuperAdmin.capabilities()
        );
        assert_eq!(AdminRole::Developer.capabilities().len(), 28);
    }

    #[test]
    fn overrides_can_add_but_false_does_not_subtract() {
        let mut overrides = PermissionOverrides::new();
        overrides.insert(Capability::DeleteTenants, true);
        // SupportStaff gains DeleteTenants through the override.
        assert!(has_permission(
            true,
            Some("support_staff"),
            Some(&overrides),
            Capability::DeleteTenants
        ));

        // A false override cannot remove a role capability.
        overrides.insert(Capability::ViewUsers, false);
        assert!(has_permission(
            true,
            Some("support_staff"),
            Some(&overrides),
            Capability::ViewUsers
        ));
    }

    #[test]
    fn parse_overrides_drops_unknown_keys() {
        let value = json!({
            "delete_tenants": true,
            "launch_missiles": true,
            "view_users": "yes",
        });
        let overrides = parse_overrides(&value);
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get(&Capability::DeleteTenants), Some(&true));
    }
}
