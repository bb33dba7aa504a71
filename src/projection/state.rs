//! Mutable simulation state threaded through the daily loop
//!
//! All per-period accumulators live in one state value so the loop body
//! never threads loose mutable locals, and period closes reset exactly
//! the accumulators that belong to the closed period.

use super::ledger::Account;

/// Flow accumulators for one open period (year or month).
#[derive(Debug, Clone, Default)]
pub struct PeriodAccum {
    pub payment: f64,
    pub interest: f64,
    pub upfront_cost: f64,
    pub admin_cost: f64,
    pub management_cost: f64,
    pub asset_based_cost: f64,
    pub maintenance_cost: f64,
    pub risk_cost: f64,
    pub plus_cost: f64,
    pub surrender_fee: f64,
    pub bonus: f64,
    pub tax_credit: f64,
    pub withdrawal: f64,
}

impl PeriodAccum {
    /// Sum of every cost category.
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

    pub fn reset(&mut self) {
        *self = PeriodAccum::default();
    }
}

/// State of one policy during projection.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// The three value ledgers
    pub account: Account,

    /// Current policy year (1-indexed)
    pub policy_year: u32,

    /// Open-year accumulators
    pub year: PeriodAccum,

    /// Open-month accumulators
    pub month: PeriodAccum,

    /// Tax credit accrued for calendar-mode posting, not yet landed
    pub pending_tax_credit: f64,

    /// Tax credit granted (posted or accrued) against this year's cap
    pub tax_credit_year_total: f64,

    /// Guards the once-per-year annual bonus trigger
    pub annual_bonus_fired: bool,

    /// Cumulated upfront cost, the base of initial-cost refund bonuses
    pub initial_cost_total: f64,
}

impl SimulationState {
    pub fn new() -> Self {
        Self {
            account: Account::new(),
            policy_year: 1,
            year: PeriodAccum::default(),
            month: PeriodAccum::default(),
            pending_tax_credit: 0.0,
            tax_credit_year_total: 0.0,
            annual_bonus_fired: false,
            initial_cost_total: 0.0,
        }
    }

    /// Roll into the next policy year after a year close.
    pub fn open_year(&mut self, policy_year: u32) {
        self.policy_year = policy_year;
        self.year.reset();
        self.tax_credit_year_total = 0.0;
        self.annual_bonus_fired = false;
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new()
    }
}
