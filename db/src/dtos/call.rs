use chrono::NaiveDateTime;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::call::CallOutcome;

#[derive(Debug, Clone, Deserialize)]
pub struct NewCall {
    pub client_id: Uuid,
    pub started_at: NaiveDateTime,
    pub duration_seconds: i32,
    pub outcome: CallOutcome,
    pub caller_number: Option<String>,
}
