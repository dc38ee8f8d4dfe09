use actix_web::HttpRequest;
use common::error::{AppError, Res};
use common::jwt;
use common::permissions::{Capability, has_permission, parse_overrides};
use db::dtos::audit::NewAuditEntry;
use db::models::audit::AuditAction;
use db::models::user::User;
use sqlx::PgPool;
use sqlx::types::JsonValue;
use sqlx::types::ipnetwork::IpNetwork;

/// A successfully authorized privileged request: the freshly loaded actor
/// and the request source, carried through to the audit write.
pub struct AdminContext {
    pub actor: User,
    pub source_ip: Option<IpNetwork>,
}

/// Single entry point for every privileged route.
///
/// The actor row is re-read on each request, so removing an admin takes
/// effect immediately instead of at token expiry. A denial has no side
/// effects of any kind.
pub async fn authorize(
    pool: &PgPool,
    req: &HttpRequest,
    capability: Capability,
) -> Res<AdminContext> {
    let claims = jwt::claims_from_request(req)?;
    if !claims.is_admin {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let actor = match db::user::get_user_by_id(pool, claims.user_id).await {
        Ok(user) => user,
        Err(AppError::Database(sqlx::Error::RowNotFound)) => {
            return Err(AppError::Forbidden(
                "Admin access has been revoked".to_string(),
            ));
        }
        Err(e) => return Err(e),
    };

    if !actor.is_admin {
        return Err(AppError::Forbidden(
            "Admin access has been revoked".to_string(),
        ));
    }

    let overrides = actor.custom_permissions.as_ref().map(parse_overrides);
    if !has_permission(
        actor.is_admin,
        actor.admin_role.as_deref(),
        overrides.as_ref(),
        capability,
    ) {
        return Err(AppError::Forbidden(format!(
            "Missing permission: {}",
            capability_key(capability)
        )));
    }

    Ok(AdminContext {
        actor,
        source_ip: req.peer_addr().map(|addr| IpNetwork::from(addr.ip())),
    })
}

fn capability_key(capability: Capability) -> String {
    serde_json::to_value(capability)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{:?}", capability))
}

/// Records a privileged mutation, best-effort, after it succeeded. Audit
/// persistence failures are logged inside `db::audit::record` and never
/// bubble up to the route.
pub async fn record(
    pool: &PgPool,
    ctx: &AdminContext,
    action: AuditAction,
    target_type: &str,
    target_id: String,
    changes: Option<JsonValue>,
    metadata: Option<JsonValue>,
) {
    db::audit::record(
        pool,
        NewAuditEntry {
            action,
            actor_id: ctx.actor.id,
            target_type: Some(target_type.to_string()),
            target_id: Some(target_id),
            changes,
            metadata,
            ip_address: ctx.source_ip,
        },
    )
    .await;
}
