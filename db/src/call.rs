use chrono::NaiveDateTime;
use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{dtos::call::NewCall, models::call::CallRecord};

pub async fn insert_call<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    call: &NewCall,
) -> Res<CallRecord> {
    sqlx::query_as::<_, CallRecord>(
        r#"
        INSERT INTO calls (client_id, started_at, duration_seconds, outcome, caller_number)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(call.client_id)
    .bind(call.started_at)
    .bind(call.duration_seconds)
    .bind(call.outcome.as_str())
    .bind(&call.caller_number)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn list_in_range<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    client_id: Uuid,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Res<Vec<CallRecord>> {
    sqlx::query_as::<_, CallRecord>(
        r#"
        SELECT * FROM calls
        WHERE client_id = $1 AND started_at >= $2 AND started_at <= $3
        ORDER BY started_at
        "#,
    )
    .bind(client_id)
    .bind(from)
    .bind(to)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}
