use serde::{Deserialize, Serialize};

/// Sentinel for plans without a minute allotment.
pub const MINUTES_UNLIMITED: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Starter,
    Complete,
    Unlimited,
}

impl PlanTier {
    pub fn parse(plan: &str) -> Option<PlanTier> {
        match plan {
            "starter" => Some(PlanTier::Starter),
            "complete" => Some(PlanTier::Complete),
            "unlimited" => Some(PlanTier::Unlimited),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Starter => "starter",
            PlanTier::Complete => "complete",
            PlanTier::Unlimited => "unlimited",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingInterval {
    Month,
    Year,
}

impl BillingInterval {
    pub fn parse(interval: &str) -> Option<BillingInterval> {
        match interval {
            "month" => Some(BillingInterval::Month),
            "year" => Some(BillingInterval::Year),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BillingInterval::Month => "month",
            BillingInterval::Year => "year",
        }
    }
}

/// One subscription offering. Prices, minute allotments and overage rates
/// live here and nowhere else; every other module resolves plans through
/// this catalog so pricing cannot drift between code paths.
#[derive(Debug, Clone, Serialize)]
pub struct PlanDef {
    pub tier: PlanTier,
    pub name: &'static str,
    pub monthly_price_id: &'static str,
    pub annual_price_id: &'static str,
    /// Included minutes per billing period, or MINUTES_UNLIMITED.
    pub minutes_included: i32,
    pub monthly_rate: f64,
    pub annual_rate: f64,
    /// Dollars per minute past the allotment.
    pub overage_rate: f64,
    pub features: &'static [&'static str],
}

pub const PLAN_CATALOG: [PlanDef; 3] = [
    PlanDef {
        tier: PlanTier::Starter,
        name: "Starter",
        monthly_price_id: "price_callpilot_starter_monthly",
        annual_price_id: "price_callpilot_starter_annual",
        minutes_included: 500,
        monthly_rate: 149.0,
        annual_rate: 1490.0,
        overage_rate: 0.15,
        features: &[
            "AI call answering",
            "Call analytics dashboard",
            "Appointment booking",
        ],
    },
    PlanDef {
        tier: PlanTier::Complete,
        name: "Complete",
        monthly_price_id: "price_callpilot_complete_monthly",
        annual_price_id: "price_callpilot_complete_annual",
        minutes_included: 1000,
        monthly_rate: 299.0,
        annual_rate: 2990.0,
        overage_rate: 0.12,
        features: &[
            "AI call answering",
            "Call analytics dashboard",
            "Appointment booking",
            "CRM and team scheduling",
            "Priority support",
        ],
    },
    PlanDef {
        tier: PlanTier::Unlimited,
        name: "Unlimited",
        monthly_price_id: "price_callpilot_unlimited_monthly",
        annual_price_id: "price_callpilot_unlimited_annual",
        minutes_included: MINUTES_UNLIMITED,
        monthly_rate: 599.0,
        annual_rate: 5990.0,
        overage_rate: 0.0,
        features: &[
            "AI call answering",
            "Call analytics dashboard",
            "Appointment booking",
            "CRM and team scheduling",
            "Priority support",
            "Unlimited minutes",
            "Dedicated account manager",
        ],
    },
];

pub fn plan(tier: PlanTier) -> &'static PlanDef {
    match tier {
        PlanTier::Starter => &PLAN_CATALOG[0],
        PlanTier::Complete => &PLAN_CATALOG[1],
        PlanTier::Unlimited => &PLAN_CATALOG[2],
    }
}

pub fn price_id_for(tier: PlanTier, interval: BillingInterval) -> &'static str {
    let def = plan(tier);
    match interval {
        BillingInterval::Month => def.monthly_price_id,
        BillingInterval::Year => def.annual_price_id,
    }
}

/// Resolves a Stripe price identifier to a plan. Unknown identifiers return
/// None; callers log and drop the event rather than guessing.
pub fn plan_for_price(price_id: &str) -> Option<&'static PlanDef> {
    PLAN_CATALOG
        .iter()
        .find(|def| def.monthly_price_id == price_id || def.annual_price_id == price_id)
}

pub fn interval_for_price(price_id: &str) -> Option<BillingInterval> {
    PLAN_CATALOG.iter().find_map(|def| {
        if def.monthly_price_id == price_id {
            Some(BillingInterval::Month)
        } else if def.annual_price_id == price_id {
            Some(BillingInterval::Year)
        } else {
            None
        }
    })
}

pub fn rate_for(def: &PlanDef, interval: BillingInterval) -> f64 {
    match interval {
        BillingInterval::Month => def.monthly_rate,
        BillingInterval::Year => def.annual_rate,
    }
}

/// Minutes past the allotment. Zero for unlimited plans and for usage
/// within the allotment. Also serves callers holding the cached plan
/// columns on a tenant row rather than a catalog entry.
pub fn overage_minutes(minutes_included: i32, minutes_used: i32) -> i32 {
    if minutes_included == MINUTES_UNLIMITED {
        return 0;
    }
    (minutes_used - minutes_included).max(0)
}

/// Overage charge in dollars from raw counters and a rate.
pub fn overage_charge_for(minutes_included: i32, minutes_used: i32, overage_rate: f64) -> f64 {
    round_currency(overage_minutes(minutes_included, minutes_used) as f64 * overage_rate)
}

/// Overage charge in dollars for the given usage against a catalog entry.
pub fn overage_charge(def: &PlanDef, minutes_used: i32) -> f64 {
    overage_charge_for(def.minutes_included, minutes_used, def.overage_rate)
}

/// Currency outputs are rounded to two decimals everywhere.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Percentage outputs are rounded to one decimal everywhere.
pub fn round_percent(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overage_charge_above_allotment() {
        let starter = plan(PlanTier::Starter);
        assert_eq!(starter.minutes_included, 500);
        assert_eq!(starter.overage_rate, 0.15);
        assert_eq!(overage_charge(starter, 620), 18.00);
    }

    #[test]
    fn overage_charge_within_allotment_is_zero() {
        let starter = plan(PlanTier::Starter);
        assert_eq!(overage_charge(starter, 300), 0.0);
        assert_eq!(overage_charge(starter, 500), 0.0);
    }

    #[test]
    fn unlimited_plan_never_charges_overage() {
        let unlimited = plan(PlanTier::Unlimited);
        for minutes in [0, 1, 500, 10_000, i32::MAX] {
            assert_eq!(overage_charge(unlimited, minutes), 0.0);
        }
    }

    #[test]
    fn catalog_and_cached_column_paths_agree() {
        // Tenant rows cache the plan columns; both entry points must give
        // the same charge.
        for def in &PLAN_CATALOG {
            for used in [0, 499, 500, 620, 10_000] {
                assert_eq!(
                    overage_charge(def, used),
                    overage_charge_for(def.minutes_included, used, def.overage_rate)
                );
            }
        }
        assert_eq!(overage_minutes(500, 620), 120);
        assert_eq!(overage_minutes(MINUTES_UNLIMITED, 10_000), 0);
    }

    #[test]
    fn price_id_roundtrip() {
        for def in &PLAN_CATALOG {
            for interval in [BillingInterval::Month, BillingInterval::Year] {
                let price_id = price_id_for(def.tier, interval);
                let resolved = plan_for_price(price_id).expect("catalog price resolves");
                assert_eq!(resolved.tier, def.tier);
                assert_eq!(interval_for_price(price_id), Some(interval));
            }
        }
    }

    #[test]
    fn unknown_price_is_not_resolved() {
        assert!(plan_for_price("price_unknown_tier").is_none());
        assert!(interval_for_price("price_unknown_tier").is_none());
    }
}
