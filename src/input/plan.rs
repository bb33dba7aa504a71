//! Plan builder
//!
//! Expands a base first-year payment, an annual indexation rate, and any
//! manual per-year overrides into the dense yearly payment and withdrawal
//! arrays consumed by the engine. Pure and deterministic.

use super::data::PlanOverrides;

/// Explicit yearly plans derived from the caller's input.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentPlan {
    /// Planned gross payment per policy year (index 0 = year 1)
    pub yearly_payments: Vec<f64>,

    /// Planned withdrawal per policy year (index 0 = year 1)
    pub yearly_withdrawals: Vec<f64>,
}

/// Build the yearly plans for a term of `term_years`.
///
/// Each year's payment starts from the prior year's indexed by the base
/// indexation rate; a per-year indexation override replaces the rate for
/// that step, and a per-year payment override replaces the amount outright
/// (later indexation continues from the overridden amount).
pub fn build_plan(
    term_years: u32,
    base_payment: f64,
    indexation: f64,
    overrides: &PlanOverrides,
) -> PaymentPlan {
    let years = term_years as usize;
    let mut payments = Vec::with_capacity(years);
    let mut withdrawals = vec![0.0; years];

    let mut current = base_payment.max(0.0);
    for year in 1..=term_years {
        if year > 1 {
            let rate = override_for(&overrides.indexation, year).unwrap_or(indexation);
            current *= 1.0 + rate.max(-1.0);
        }
        if let Some(amount) = override_for(&overrides.payments, year) {
            current = amount.max(0.0);
        }
        payments.push(current);
    }

    for &(year, amount) in &overrides.withdrawals {
        if year >= 1 && (year as usize) <= years {
            withdrawals[year as usize - 1] = amount.max(0.0);
        }
    }

    PaymentPlan {
        yearly_payments: payments,
        yearly_withdrawals: withdrawals,
    }
}

fn override_for(entries: &[(u32, f64)], year: u32) -> Option<f64> {
    entries.iter().find(|(y, _)| *y == year).map(|(_, v)| *v)
}
