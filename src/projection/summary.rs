//! Period summary and result records emitted by the simulation loop

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregates for one closed policy year.
///
/// Emitted at each year close (or at contract end for a trailing partial
/// year) and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearRecord {
    /// Policy year (1-indexed)
    pub policy_year: u32,

    /// First day of the policy year
    pub year_start: NaiveDate,

    /// Day after the last simulated day of the policy year
    pub year_end: NaiveDate,

    /// Gross payments received during the year
    pub payment: f64,

    /// Interest credited through daily compounding
    pub interest: f64,

    // Cost categories
    pub upfront_cost: f64,
    pub admin_cost: f64,
    pub management_cost: f64,
    pub asset_based_cost: f64,
    pub maintenance_cost: f64,
    pub risk_cost: f64,
    pub plus_cost: f64,
    pub surrender_fee: f64,

    /// Bonuses credited (payment-linked, annual, wealth, fixed)
    pub bonus: f64,

    /// Tax credit posted to the tax-bonus ledger this year
    pub tax_credit: f64,

    /// Withdrawal taken at year close
    pub withdrawal: f64,

    // Closing balances
    pub end_client_value: f64,
    pub end_invested_value: f64,
    pub end_tax_bonus_value: f64,
    pub end_total_value: f64,

    /// Value payable on full surrender at year close
    pub surrender_value: f64,

    /// Redemption haircut implied by the surrender value
    pub surrender_charge: f64,
}

impl YearRecord {
    /// Sum of all cost categories for the year.
    pub fn total_cost(&self) -> f64 {
        self.upfront_cost
            + self.admin_cost
            + self.management_cost
            + self.asset_based_cost
            + self.maintenance_cost
            + self.risk_cost
            + self.plus_cost
            + self.surrender_fee
    }
}

/// Aggregates for one closed policy month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthRecord {
    /// Month since contract start (1-indexed)
    pub month_index: u32,

    /// Policy year the month belongs to (1-indexed)
    pub policy_year: u32,

    /// Day after the last simulated day of the month
    pub month_end: NaiveDate,

    pub payment: f64,
    pub interest: f64,
    pub cost: f64,
    pub bonus: f64,
    pub tax_credit: f64,
    pub withdrawal: f64,
    pub end_total_value: f64,
}

/// Term totals across the whole projection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Gross payments over the term
    pub contributions: f64,

    /// All costs over the term
    pub costs: f64,

    /// All bonuses credited over the term
    pub bonus: f64,

    /// All tax credit posted over the term
    pub tax_credit: f64,

    /// Asset-based cost, also included in `costs`
    pub asset_based_cost: f64,

    /// Risk-insurance cost, also included in `costs`
    pub risk_cost: f64,

    /// Withdrawals paid out over the term
    pub withdrawals: f64,

    /// Net credited interest, defined as the residual that closes the
    /// term identity: end balance = contributions − costs + bonus
    /// + tax credit + interest − withdrawals.
    pub interest_net: f64,

    /// Policy value at term end
    pub end_balance: f64,

    /// Surrender value at term end
    pub surrender_value: f64,
}

/// Complete projection output, owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub totals: Totals,
    pub years: Vec<YearRecord>,
    pub months: Vec<MonthRecord>,
}

impl ProjectionResult {
    pub fn new() -> Self {
        Self {
            totals: Totals::default(),
            years: Vec::new(),
            months: Vec::new(),
        }
    }

    /// Finalize the totals from the emitted records. `interest_net` is
    /// constructed as the residual so the term identity holds exactly.
    pub fn finalize(&mut self) {
        let mut totals = Totals::default();
        for year in &self.years {
            totals.contributions += year.payment;
            totals.costs += year.total_cost();
            totals.bonus += year.bonus;
            totals.tax_credit += year.tax_credit;
            totals.asset_based_cost += year.asset_based_cost;
            totals.risk_cost += year.risk_cost;
            totals.withdrawals += year.withdrawal;
        }
        if let Some(last) = self.years.last() {
            totals.end_balance = last.end_total_value;
            totals.surrender_value = last.surrender_value;
        }
        totals.interest_net = totals.end_balance - totals.contributions + totals.costs
            - totals.bonus
            - totals.tax_credit
            + totals.withdrawals;
        self.totals = totals;
    }
}

impl Default for ProjectionResult {
    fn default() -> Self {
        Self::new()
    }
}
