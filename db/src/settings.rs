use common::error::{AppError, Res};
use sqlx::PgPool;

use crate::{dtos::settings::SettingsUpdate, models::settings::AdminSettings};

/// Fixed key of the singleton row, matched by a CHECK constraint in the
/// schema so a second row can never exist.
const SETTINGS_ROW_ID: i16 = 1;

/// Returns the settings row, creating it with defaults on first access.
/// The insert races safely: ON CONFLICT DO NOTHING leaves the winner's row
/// in place and the follow-up select reads it.
pub async fn get_or_create(pool: &PgPool) -> Res<AdminSettings> {
    sqlx::query("INSERT INTO admin_settings (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
        .bind(SETTINGS_ROW_ID)
        .execute(pool)
        .await?;

    sqlx::query_as::<_, AdminSettings>("SELECT * FROM admin_settings WHERE id = $1")
        .bind(SETTINGS_ROW_ID)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)
}

/// Create-or-update with named optional fields merged one by one.
pub async fn upsert(pool: &PgPool, update: &SettingsUpdate) -> Res<AdminSettings> {
    // Make sure the singleton exists before merging fields into it.
    get_or_create(pool).await?;

    sqlx::query_as::<_, AdminSettings>(
        r#"
        UPDATE admin_settings SET
            default_booking_value = COALESCE($2, default_booking_value),
            grace_period_days = COALESCE($3, grace_period_days),
            support_email = COALESCE($4, support_email),
            maintenance_mode = COALESCE($5, maintenance_mode),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(SETTINGS_ROW_ID)
    .bind(update.default_booking_value)
    .bind(update.grace_period_days)
    .bind(&update.support_email)
    .bind(update.maintenance_mode)
    .fetch_one(pool)
    .await
    .map_err(AppError::from)
}
