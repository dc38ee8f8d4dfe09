use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Timelike};
use common::error::Res;
use common::plans::{overage_charge_for, overage_minutes, round_currency, round_percent};
use db::models::call::{CallOutcome, CallRecord};
use db::models::client::Client;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::billing::{BillingReport, DailyActivity};

pub async fn billing_report(
    pool: &PgPool,
    client_id: Uuid,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Res<BillingReport> {
    let client = db::client::get_by_id(pool, client_id).await?;
    let settings = db::settings::get_or_create(pool).await?;
    let calls = db::call::list_in_range(pool, client_id, from, to).await?;

    Ok(build_report(
        &client,
        settings.default_booking_value,
        &calls,
        from,
        to,
    ))
}

/// Assembles the report from already-loaded rows.
///
/// Costs use the usage counter on the tenant row, which tracks the current
/// billing period; the call list only feeds the analytics side. Revenue is
/// estimated as booked appointments times the configured booking value,
/// and ROI is reported as zero rather than infinite when the tenant has no
/// cost on record.
pub fn build_report(
    client: &Client,
    booking_value: f64,
    calls: &[CallRecord],
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> BillingReport {
    let overage_minutes = overage_minutes(client.minutes_included, client.minutes_used);
    let base_cost = round_currency(client.monthly_rate);
    let overage_cost =
        overage_charge_for(client.minutes_included, client.minutes_used, client.overage_rate);
    let total_cost = round_currency(base_cost + overage_cost);

    let total_calls = calls.len() as i64;
    let total_duration_seconds: i64 = calls.iter().map(|c| i64::from(c.duration_seconds)).sum();
    let average_duration_seconds = if total_calls > 0 {
        total_duration_seconds / total_calls
    } else {
        0
    };
    let mut answered_calls = 0i64;
    let mut booked_appointments = 0i64;
    let mut missed_calls = 0i64;
    let mut voicemail_calls = 0i64;
    for call in calls {
        match CallOutcome::parse(&call.outcome) {
            Some(CallOutcome::Answered) => answered_calls += 1,
            Some(CallOutcome::Booked) => booked_appointments += 1,
            Some(CallOutcome::Missed) => missed_calls += 1,
            Some(CallOutcome::Voicemail) => voicemail_calls += 1,
            None => log::warn!("Call {} has unknown outcome '{}'", call.id, call.outcome),
        }
    }

    let conversion_rate = if total_calls > 0 {
        round_percent(booked_appointments as f64 / total_calls as f64 * 100.0)
    } else {
        0.0
    };

    let estimated_revenue = round_currency(booked_appointments as f64 * booking_value);
    let roi_percent = if total_cost > 0.0 {
        round_percent((estimated_revenue - total_cost) / total_cost * 100.0)
    } else {
        0.0
    };
    let cost_per_call = if total_calls > 0 {
        round_currency(total_cost / total_calls as f64)
    } else {
        0.0
    };

    BillingReport {
        period_start: from,
        period_end: to,
        plan: client.plan.clone(),
        subscription_status: client.subscription_status.clone(),
        minutes_included: client.minutes_included,
        minutes_used: client.minutes_used,
        overage_minutes,
        base_cost,
        overage_cost,
        total_cost,
        total_calls,
        total_duration_seconds,
        average_duration_seconds,
        answered_calls,
        booked_appointments,
        missed_calls,
        voicemail_calls,
        conversion_rate,
        peak_hour: peak_hour(calls),
        daily: daily_activity(calls),
        estimated_revenue,
        cost_per_call,
        roi_percent,
    }
}

/// Hour of day (0-23) with the most calls. Ties go to the earliest hour;
/// None when the window has no calls.
fn peak_hour(calls: &[CallRecord]) -> Option<u32> {
    if calls.is_empty() {
        return None;
    }
    let mut by_hour = [0i64; 24];
    for call in calls {
        by_hour[call.started_at.hour() as usize] += 1;
    }
    let mut best = 0usize;
    for (hour, count) in by_hour.iter().enumerate() {
        if *count > by_hour[best] {
            best = hour;
        }
    }
    Some(best as u32)
}

fn daily_activity(calls: &[CallRecord]) -> Vec<DailyActivity> {
    let mut days: BTreeMap<chrono::NaiveDate, (i64, i64)> = BTreeMap::new();
    for call in calls {
        let entry = days.entry(call.started_at.date()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += i64::from((call.duration_seconds + 59) / 60);
    }
    days.into_iter()
        .map(|(date, (calls, minutes))| DailyActivity {
            date,
            calls,
            minutes,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::plans::MINUTES_UNLIMITED;

    fn test_client(minutes_included: i32, minutes_used: i32) -> Client {
        let now = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Client {
            id: Uuid::new_v4(),
            business_name: "Test Plumbing Co".to_string(),
            contact_email: "owner@testplumbing.example".to_string(),
            phone: None,
            timezone: "UTC".to_string(),
            plan: Some("starter".to_string()),
            billing_interval: Some("month".to_string()),
            stripe_customer_id: "cus_test".to_string(),
            stripe_subscription_id: Some("sub_test".to_string()),
            subscription_status: "active".to_string(),
            current_period_end: None,
            minutes_included,
            minutes_used,
            overage_rate: 0.15,
            monthly_rate: 149.0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn call(day: u32, hour: u32, outcome: CallOutcome, duration_seconds: i32) -> CallRecord {
        let started_at = NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 15, 0)
            .unwrap();
        CallRecord {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            started_at,
            duration_seconds,
            outcome: outcome.as_str().to_string(),
            caller_number: None,
            created_at: started_at,
        }
    }

    fn window() -> (NaiveDateTime, NaiveDateTime) {
        let from = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 3, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        (from, to)
    }

    #[test]
    fn report_totals_cost_with_overage() {
        let client = test_client(500, 620);
        let (from, to) = window();
        let report = build_report(&client, 150.0, &[], from, to);

        assert_eq!(report.overage_minutes, 120);
        assert_eq!(report.base_cost, 149.0);
        assert_eq!(report.overage_cost, 18.0);
        assert_eq!(report.total_cost, 167.0);
    }

    #[test]
    fn unlimited_plan_reports_no_overage() {
        let mut client = test_client(MINUTES_UNLIMITED, 9_000);
        client.overage_rate = 0.0;
        let (from, to) = window();
        let report = build_report(&client, 150.0, &[], from, to);

        assert_eq!(report.overage_minutes, 0);
        assert_eq!(report.overage_cost, 0.0);
    }

    #[test]
    fn outcome_counts_and_conversion() {
        let calls = vec![
            call(3, 9, CallOutcome::Answered, 120),
            call(3, 10, CallOutcome::Booked, 300),
            call(4, 10, CallOutcome::Booked, 240),
            call(4, 11, CallOutcome::Missed, 0),
            call(5, 10, CallOutcome::Voicemail, 30),
            call(5, 14, CallOutcome::Answered, 90),
        ];
        let (from, to) = window();
        let report = build_report(&test_client(500, 100), 150.0, &calls, from, to);

        assert_eq!(report.total_calls, 6);
        assert_eq!(report.total_duration_seconds, 780);
        assert_eq!(report.average_duration_seconds, 130);
        assert_eq!(report.answered_calls, 2);
        assert_eq!(report.booked_appointments, 2);
        assert_eq!(report.missed_calls, 1);
        assert_eq!(report.voicemail_calls, 1);
        // 2 of 6 booked, rounded to one decimal.
        assert_eq!(report.conversion_rate, 33.3);
        // Three calls at 10:00 beat every other hour.
        assert_eq!(report.peak_hour, Some(10));
    }

    #[test]
    fn roi_uses_booking_value_and_total_cost() {
        let calls = vec![
            call(3, 9, CallOutcome::Booked, 300),
            call(4, 9, CallOutcome::Booked, 300),
        ];
        let (from, to) = window();
        let report = build_report(&test_client(500, 100), 200.0, &calls, from, to);

        // 2 bookings * $200 against the $149 base.
        assert_eq!(report.estimated_revenue, 400.0);
        assert_eq!(report.total_cost, 149.0);
        assert_eq!(report.roi_percent, 168.5);
        assert_eq!(report.cost_per_call, 74.5);
    }

    #[test]
    fn roi_is_zero_when_no_cost_on_record() {
        let mut client = test_client(0, 0);
        client.monthly_rate = 0.0;
        client.overage_rate = 0.0;
        let calls = vec![call(3, 9, CallOutcome::Booked, 300)];
        let (from, to) = window();
        let report = build_report(&client, 150.0, &calls, from, to);

        assert_eq!(report.total_cost, 0.0);
        assert_eq!(report.roi_percent, 0.0);
    }

    #[test]
    fn empty_window_has_no_peak_hour_or_per_call_cost() {
        let (from, to) = window();
        let report = build_report(&test_client(500, 100), 150.0, &[], from, to);

        assert_eq!(report.total_calls, 0);
        assert_eq!(report.peak_hour, None);
        assert_eq!(report.conversion_rate, 0.0);
        assert_eq!(report.cost_per_call, 0.0);
        assert!(report.daily.is_empty());
    }

    #[test]
    fn daily_series_rounds_minutes_up_per_call() {
        let calls = vec![
            call(3, 9, CallOutcome::Answered, 61),
            call(3, 10, CallOutcome::Answered, 120),
            call(5, 9, CallOutcome::Answered, 1),
        ];
        let (from, to) = window();
        let report = build_report(&test_client(500, 100), 150.0, &calls, from, to);

        assert_eq!(report.daily.len(), 2);
        assert_eq!(report.daily[0].date, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(report.daily[0].calls, 2);
        // 61s rounds up to 2 minutes, 120s is exactly 2.
        assert_eq!(report.daily[0].minutes, 4);
        assert_eq!(report.daily[1].calls, 1);
        assert_eq!(report.daily[1].minutes, 1);
    }
}
