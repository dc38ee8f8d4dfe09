use std::sync::Arc;

use actix_web::{HttpRequest, Responder, delete, get, post, web};
use chrono::Utc;
use common::error::Res;
use common::http::Success;
use common::permissions::Capability;
use db::dtos::audit::NewAuditEntry;
use db::models::audit::AuditAction;
use serde_json::json;
use sqlx::PgPool;
use sqlx::types::ipnetwork::IpNetwork;
use uuid::Uuid;

use crate::dtos::admin::{AcceptInviteRequest, InviteRequest, InviteValidationResponse, ValidateQuery};
use crate::gateway;
use crate::services;

#[post("/invitations")]
async fn post_invitation(
    req: HttpRequest,
    invite: web::Json<InviteRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let ctx = gateway::authorize(&pool, &req, Capability::InviteAdmins).await?;

    let created = services::invite::create_invitation(&pool, ctx.actor.id, &invite).await?;

    gateway::record(
        &pool,
        &ctx,
        AuditAction::AdminInvited,
        "invitation",
        created.id.to_string(),
        None,
        Some(json!({ "email": &created.email, "role": &created.role })),
    )
    .await;

    Success::created(created)
}

#[get("/invitations")]
async fn get_invitations(req: HttpRequest, pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    gateway::authorize(&pool, &req, Capability::ViewAdmins).await?;

    Success::ok(db::invite::list_all(pool.get_ref().as_ref()).await?)
}

#[delete("/invitations/{invitation_id}")]
async fn delete_invitation(
    req: HttpRequest,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let ctx = gateway::authorize(&pool, &req, Capability::InviteAdmins).await?;
    let invitation_id = path.into_inner();

    let cancelled = services::invite::cancel_invitation(&pool, invitation_id).await?;

    gateway::record(
        &pool,
        &ctx,
        AuditAction::AdminInviteCancelled,
        "invitation",
        invitation_id.to_string(),
        None,
        Some(json!({ "email": &cancelled.email })),
    )
    .await;

    Success::ok(cancelled)
}

/// Token check for the acceptance form. Public: the invitee has no account
/// yet. Reveals only what the form needs to render.
#[get("/validate")]
async fn get_validate_invitation(
    query: web::Query<ValidateQuery>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let invitation =
        services::invite::validate_invitation(&pool, &query.token, Utc::now().naive_utc()).await?;

    Success::ok(InviteValidationResponse {
        email: invitation.email,
        role: invitation.role,
        expires_at: invitation.expires_at,
    })
}

/// Consumes the invitation and creates the admin account. The resulting
/// audit entry is attributed to the inviter, since the new account did not
/// exist when the action started.
#[post("/accept")]
async fn post_accept_invitation(
    req: HttpRequest,
    accept: web::Json<AcceptInviteRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let (user, invitation) = services::invite::accept_invitation(&pool, &accept).await?;

    db::audit::record(
        &pool,
        NewAuditEntry {
            action: AuditAction::AdminCreated,
            actor_id: invitation.invited_by,
            target_type: Some("user".to_string()),
            target_id: Some(user.id.to_string()),
            changes: None,
            metadata: Some(json!({ "email": &user.email, "role": &user.admin_role })),
            ip_address: req.peer_addr().map(|addr| IpNetwork::from(addr.ip())),
        },
    )
    .await;

    Success::created(user)
}
