use std::sync::Arc;

use actix_web::{HttpRequest, Responder, post, web};
use common::env_config::Config;
use common::error::{AppError, Res};
use common::http::Success;
use db::dtos::call::NewCall;
use sqlx::PgPool;

/// Upper bound on a single call. Anything past 24 hours is a platform bug,
/// not a call, and must not inflate the usage counter.
const MAX_CALL_DURATION_SECONDS: i32 = 86_400;

/// Whole minutes to bill for a call, rounding partial minutes up.
/// Durations outside 0..=MAX_CALL_DURATION_SECONDS are rejected.
fn billable_minutes(duration_seconds: i32) -> Res<i32> {
    if !(0..=MAX_CALL_DURATION_SECONDS).contains(&duration_seconds) {
        return Err(AppError::BadRequest(format!(
            "duration_seconds must be between 0 and {}",
            MAX_CALL_DURATION_SECONDS
        )));
    }
    Ok((duration_seconds + 59) / 60)
}

/// Receives a finished call from the voice platform. Authenticated by a
/// shared key header rather than a user token.
///
/// The call record and the usage-counter increment commit in one
/// transaction so a crash between them cannot leave usage and history
/// disagreeing.
#[post("/call")]
async fn post_call(
    http_req: HttpRequest,
    call: web::Json<NewCall>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let provided = http_req
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok());
    if provided != Some(config.ingest_api_key.as_str()) {
        return Err(AppError::Unauthorized("Invalid API key".to_string()));
    }

    let minutes = billable_minutes(call.duration_seconds)?;

    let mut tx = pool.begin().await?;
    let record = db::call::insert_call(&mut *tx, &call).await?;

    if minutes > 0 {
        db::client::add_minutes_used(&mut *tx, call.client_id, minutes).await?;
    }
    tx.commit().await?;

    Success::created(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_minutes_round_up() {
        assert_eq!(billable_minutes(0).unwrap(), 0);
        assert_eq!(billable_minutes(1).unwrap(), 1);
        assert_eq!(billable_minutes(60).unwrap(), 1);
        assert_eq!(billable_minutes(61).unwrap(), 2);
        assert_eq!(billable_minutes(MAX_CALL_DURATION_SECONDS).unwrap(), 1440);
    }

    #[test]
    fn out_of_range_durations_are_rejected() {
        for duration in [-1, i32::MIN, MAX_CALL_DURATION_SECONDS + 1, i32::MAX] {
            assert!(matches!(
                billable_minutes(duration),
                Err(AppError::BadRequest(_))
            ));
        }
    }
}
