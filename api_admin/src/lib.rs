use actix_web::web;

pub mod gateway;

pub mod routes {
    pub mod admins;
    pub mod audit;
    pub mod invites;
    pub mod settings;
    pub mod tenants;
}

mod services {
    pub(crate) mod invite;
    pub(crate) mod settings;
}

mod dtos {
    pub(crate) mod admin;
}

/// Privileged platform administration. The caller wraps this scope in the
/// auth middleware; each route then checks its own capability through the
/// gateway.
pub fn mount_admin() -> actix_web::Scope {
    web::scope("/admin")
        .service(routes::tenants::get_tenants)
        .service(routes::tenants::get_tenant)
        .service(routes::tenants::patch_tenant)
        .service(routes::tenants::post_suspend_tenant)
        .service(routes::tenants::post_reactivate_tenant)
        .service(routes::tenants::delete_tenant)
        .service(routes::audit::get_audit_log)
        .service(routes::audit::get_audit_summary)
        .service(routes::settings::get_settings)
        .service(routes::settings::put_settings)
        .service(routes::admins::get_admins)
        .service(routes::admins::delete_admin)
        .service(routes::admins::put_admin_permissions)
        .service(routes::invites::post_invitation)
        .service(routes::invites::get_invitations)
        .service(routes::invites::delete_invitation)
}

/// Invitation acceptance flow, reachable without a session: the invitee has
/// no account yet and authenticates with the invitation token alone.
pub fn mount_invite_public() -> actix_web::Scope {
    web::scope("/invitations")
        .service(routes::invites::get_validate_invitation)
        .service(routes::invites::post_accept_invitation)
}
