use chrono::{Duration, NaiveDateTime, Utc};
use common::error::{AppError, Res};
use common::password::{hash_password, validate_password_policy};
use common::permissions::{AdminRole, parse_overrides};
use common::token::generate_token;
use db::dtos::invite::NewInvitation;
use db::dtos::user::NewAdminUser;
use db::models::invite::{AdminInvitation, InviteStatus};
use db::models::user::User;
use sqlx::PgPool;
use sqlx::types::JsonValue;
use uuid::Uuid;

use crate::dtos::admin::{AcceptInviteRequest, InviteRequest};

/// Invitations stay acceptable for one week.
const INVITE_TTL_DAYS: i64 = 7;

/// Drops unknown keys and non-boolean values from a requested override map.
/// Nothing valid left means NULL in storage, not an empty object.
pub(crate) fn sanitize_overrides(requested: Option<&JsonValue>) -> Option<JsonValue> {
    let overrides = parse_overrides(requested?);
    if overrides.is_empty() {
        return None;
    }
    serde_json::to_value(overrides).ok()
}

pub async fn create_invitation(
    pool: &PgPool,
    invited_by: Uuid,
    req: &InviteRequest,
) -> Res<AdminInvitation> {
    let role = AdminRole::parse(&req.role)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown admin role: {}", req.role)))?;

    if db::user::exists_user_by_email(pool, &req.email).await? {
        return Err(AppError::Conflict(
            "A user with this email already exists".to_string(),
        ));
    }
    if db::invite::exists_pending_for_email(pool, &req.email).await? {
        return Err(AppError::Conflict(
            "An invitation is already pending for this email".to_string(),
        ));
    }

    let invitation = NewInvitation {
        email: req.email.clone(),
        role: role.as_str().to_string(),
        custom_permissions: sanitize_overrides(req.custom_permissions.as_ref()),
        token: generate_token(),
        expires_at: (Utc::now() + Duration::days(INVITE_TTL_DAYS)).naive_utc(),
        invited_by,
    };

    // The partial unique index on pending emails closes the race the
    // exists-check above leaves open.
    let created = match db::invite::insert(pool, &invitation).await {
        Ok(created) => created,
        Err(AppError::Database(sqlx::Error::Database(e))) if e.is_unique_violation() => {
            return Err(AppError::Conflict(
                "An invitation is already pending for this email".to_string(),
            ));
        }
        Err(e) => return Err(e),
    };

    // Delivery is handled by the notification pipeline; it picks the link
    // up from the log.
    log::info!(
        "Admin invitation issued for {}: /admin/accept-invite?token={}",
        created.email,
        created.token
    );

    Ok(created)
}

/// Looks up an invitation by token and checks it can still be acted on.
/// A pending invitation found past its expiry is lazily marked expired.
pub async fn validate_invitation(
    pool: &PgPool,
    token: &str,
    now: NaiveDateTime,
) -> Res<AdminInvitation> {
    let invitation = db::invite::get_by_token(pool, token)
        .await?
        .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

    match InviteStatus::parse(&invitation.status) {
        Some(InviteStatus::Pending) => {}
        _ => {
            return Err(AppError::Conflict(
                "Invitation is no longer pending".to_string(),
            ));
        }
    }

    if invitation.is_expired(now) {
        db::invite::transition_from_pending(pool, invitation.id, InviteStatus::Expired).await?;
        return Err(AppError::BadRequest("Invitation has expired".to_string()));
    }

    Ok(invitation)
}

/// Consumes an invitation and creates the admin account it describes.
/// The pending-state guard on the transition makes acceptance exactly-once
/// even under concurrent submits.
pub async fn accept_invitation(
    pool: &PgPool,
    req: &AcceptInviteRequest,
) -> Res<(User, AdminInvitation)> {
    let invitation = validate_invitation(pool, &req.token, Utc::now().naive_utc()).await?;

    validate_password_policy(&req.password)?;
    let password_hash = hash_password(&req.password)?;

    let mut tx = pool.begin().await?;

    let claimed =
        db::invite::transition_from_pending(&mut *tx, invitation.id, InviteStatus::Accepted)
            .await?
            .ok_or_else(|| AppError::Conflict("Invitation was already used".to_string()))?;

    let user = db::user::insert_admin_user(
        &mut *tx,
        &NewAdminUser {
            email: claimed.email.clone(),
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            role: claimed.role.clone(),
            custom_permissions: claimed.custom_permissions.clone(),
        },
    )
    .await?;
    db::user::insert_credentials(&mut *tx, user.id, &password_hash).await?;

    tx.commit().await?;

    log::info!("Admin account created for {} via invitation", user.email);

    Ok((user, claimed))
}

pub async fn cancel_invitation(pool: &PgPool, invitation_id: Uuid) -> Res<AdminInvitation> {
    db::invite::get_by_id(pool, invitation_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

    db::invite::transition_from_pending(pool, invitation_id, InviteStatus::Cancelled)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("Only pending invitations can be cancelled".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sanitize_drops_unknown_keys_and_non_booleans() {
        let requested = json!({
            "delete_tenants": true,
            "not_a_capability": true,
            "view_users": "yes",
        });
        let stored = sanitize_overrides(Some(&requested)).expect("one valid key survives");
        assert_eq!(stored, json!({ "delete_tenants": true }));
    }

    #[test]
    fn sanitize_stores_null_when_nothing_valid_remains() {
        assert_eq!(sanitize_overrides(None), None);
        assert_eq!(sanitize_overrides(Some(&json!({}))), None);
        assert_eq!(
            sanitize_overrides(Some(&json!({ "launch_missiles": true }))),
            None
        );
    }

    #[test]
    fn sanitize_keeps_explicit_false_entries() {
        // False adds nothing at evaluation time, but the stored map should
        // reflect what the inviter submitted.
        let stored = sanitize_overrides(Some(&json!({ "purge_data": false })))
            .expect("known key survives");
        assert_eq!(stored, json!({ "purge_data": false }));
    }
}
