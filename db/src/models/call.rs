use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terminal outcome of an answered call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Answered,
    Booked,
    Missed,
    Voicemail,
}

impl CallOutcome {
    pub fn parse(outcome: &str) -> Option<CallOutcome> {
        match outcome {
            "answered" => Some(CallOutcome::Answered),
            "booked" => Some(CallOutcome::Booked),
            "missed" => Some(CallOutcome::Missed),
            "voicemail" => Some(CallOutcome::Voicemail),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Answered => "answered",
            CallOutcome::Booked => "booked",
            CallOutcome::Missed => "missed",
            CallOutcome::Voicemail => "voicemail",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CallRecord {
    pub id: Uuid,
    pub client_id: Uuid,
    pub started_at: NaiveDateTime,
    pub duration_seconds: i32,
    pub outcome: String,
    pub caller_number: Option<String>,
    pub created_at: NaiveDateTime,
}
