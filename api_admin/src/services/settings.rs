use common::error::{AppError, Res};
use db::dtos::settings::SettingsUpdate;
use db::models::settings::AdminSettings;
use sqlx::PgPool;

/// Field checks for a settings merge. Absent fields are always fine.
pub fn validate_update(update: &SettingsUpdate) -> Res<()> {
    if let Some(value) = update.default_booking_value {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::BadRequest(
                "default_booking_value must be a non-negative amount".to_string(),
            ));
        }
    }
    if let Some(days) = update.grace_period_days {
        if days < 0 {
            return Err(AppError::BadRequest(
                "grace_period_days must not be negative".to_string(),
            ));
        }
    }
    if let Some(email) = &update.support_email {
        if !email.contains('@') {
            return Err(AppError::BadRequest(
                "support_email must be an email address".to_string(),
            ));
        }
    }
    Ok(())
}

pub async fn update_settings(pool: &PgPool, update: &SettingsUpdate) -> Res<AdminSettings> {
    validate_update(update)?;
    db::settings::upsert(pool, update).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_valid() {
        assert!(validate_update(&SettingsUpdate::default()).is_ok());
    }

    #[test]
    fn negative_values_are_rejected() {
        let update = SettingsUpdate {
            default_booking_value: Some(-1.0),
            ..Default::default()
        };
        assert!(validate_update(&update).is_err());

        let update = SettingsUpdate {
            grace_period_days: Some(-7),
            ..Default::default()
        };
        assert!(validate_update(&update).is_err());
    }

    #[test]
    fn support_email_needs_an_at_sign() {
        let update = SettingsUpdate {
            support_email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(validate_update(&update).is_err());

        let update = SettingsUpdate {
            support_email: Some("ops@callpilot.example".to_string()),
            ..Default::default()
        };
        assert!(validate_update(&update).is_ok());
    }

    #[test]
    fn non_finite_booking_value_is_rejected() {
        let update = SettingsUpdate {
            default_booking_value: Some(f64::NAN),
            ..Default::default()
        };
        assert!(validate_update(&update).is_err());
    }
}
