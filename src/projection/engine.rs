//! Core daily simulation loop
//!
//! Advances policy state one simulated day at a time across the whole
//! term. Each day runs, in order: annual bonus trigger, payment event,
//! periodic management-fee sweep, daily compounding, the ongoing fee
//! layer, calendar tax-credit posting, the month-end sweep, and the
//! period close. All event days are precomputed as day offsets from the
//! contract start, so no event can fire twice within its period.

use chrono::NaiveDate;

use crate::calendar::{add_months_clamped, date_at_offset, days_between, days_in_month};
use crate::input::{build_plan, Currency, PaymentFrequency, PaymentPlan, RawInput};
use crate::products::{
    AnnualBonusMode, FeeCadence, ManagementFee, ProductConfig, RedemptionBase, RiskFeeContext,
    RiskFeeMode, TaxCreditPosting, UpfrontBase,
};
use crate::yields::{daily_factor, DailyYield, YieldSource, DAYS_PER_YEAR};

use super::ledger::{clamp_amount, LedgerKind};
use super::state::{PeriodAccum, SimulationState};
use super::summary::{MonthRecord, ProjectionResult, YearRecord};

/// Fully resolved input for one simulation run.
#[derive(Debug, Clone)]
pub struct EngineInput {
    pub currency: Currency,
    pub start_date: NaiveDate,
    pub term_years: u32,
    /// Overrides `term_years`; may end mid-year
    pub end_date: Option<NaiveDate>,
    pub frequency: PaymentFrequency,
    pub yield_source: YieldSource,
    /// Flat annual yield for the tax-bonus ledger, invested yield when unset
    pub tax_bonus_yield: Option<f64>,
    pub tax_credit_enabled: bool,
    pub yearly_payments: Vec<f64>,
    pub yearly_withdrawals: Vec<f64>,
    pub config: ProductConfig,
}

impl EngineInput {
    /// Assemble an engine input from raw caller input and a resolved
    /// product configuration. Dates are parsed with the reference-date
    /// fallback; the payment plan is expanded here.
    pub fn from_raw(raw: &RawInput, config: ProductConfig) -> Self {
        let PaymentPlan { yearly_payments, yearly_withdrawals } = build_plan(
            raw.term_years,
            raw.base_payment,
            raw.indexation,
            &raw.plan_overrides,
        );
        Self {
            currency: raw.currency,
            start_date: crate::calendar::parse_date(&raw.start_date),
            term_years: raw.term_years,
            end_date: raw.end_date.as_deref().map(crate::calendar::parse_date),
            frequency: raw.payment_frequency,
            yield_source: raw.yield_source.clone(),
            tax_bonus_yield: raw.tax_bonus_yield,
            tax_credit_enabled: raw.tax_credit_enabled,
            yearly_payments,
            yearly_withdrawals,
            config,
        }
    }
}

/// Run a projection over the given input.
pub fn simulate(input: EngineInput) -> ProjectionResult {
    Simulation::new(input).run()
}

/// A payment falling due on a precomputed day.
#[derive(Debug, Clone, Copy)]
struct PaymentEvent {
    offset: i64,
    policy_year: u32,
    amount: f64,
}

/// Cost category a deduction is booked under.
#[derive(Debug, Clone, Copy)]
enum CostKind {
    Upfront,
    Admin,
    Management,
    AssetBased,
    Maintenance,
    Risk,
    Plus,
    SurrenderFee,
}

fn book_cost(accum: &mut PeriodAccum, kind: CostKind, amount: f64) {
    match kind {
        CostKind::Upfront => accum.upfront_cost += amount,
        CostKind::Admin => accum.admin_cost += amount,
        CostKind::Management => accum.management_cost += amount,
        CostKind::AssetBased => accum.asset_based_cost += amount,
        CostKind::Maintenance => accum.maintenance_cost += amount,
        CostKind::Risk => accum.risk_cost += amount,
        CostKind::Plus => accum.plus_cost += amount,
        CostKind::SurrenderFee => accum.surrender_fee += amount,
    }
}

fn record_cost(state: &mut SimulationState, kind: CostKind, amount: f64) {
    if amount > 0.0 {
        book_cost(&mut state.year, kind, amount);
        book_cost(&mut state.month, kind, amount);
    }
}

fn record_bonus(state: &mut SimulationState, amount: f64) {
    state.year.bonus += amount;
    state.month.bonus += amount;
}

fn record_tax_credit(state: &mut SimulationState, amount: f64) {
    state.year.tax_credit += amount;
    state.month.tax_credit += amount;
}

/// The daily simulation loop with its precomputed event schedule.
pub struct Simulation {
    input: EngineInput,
    invested_yield: DailyYield,
    tax_bonus_yield: DailyYield,

    /// Days in the term; the loop runs offsets `0..total_days`
    total_days: i64,

    /// Year-close boundaries as day offsets; the last entry is
    /// `total_days` and may close a partial year
    anniversaries: Vec<i64>,

    /// Whether the last entry of `anniversaries` closes a partial year
    final_year_partial: bool,

    /// Month-close boundaries as day offsets
    month_ends: Vec<i64>,

    payments: Vec<PaymentEvent>,

    /// Management-fee sweep days (empty for daily cadence)
    sweep_offsets: Vec<i64>,

    /// Annual bonus trigger days, one per complete policy year
    bonus_triggers: Vec<(i64, u32)>,

    /// Calendar-mode tax posting days
    tax_posting_offsets: Vec<i64>,
}

impl Simulation {
    /// Precompute the event schedule for the input's term.
    pub fn new(input: EngineInput) -> Self {
        let start = input.start_date;
        let end = match input.end_date {
            Some(end) => end,
            None => add_months_clamped(start, input.term_years as i32 * 12),
        };
        let total_days = days_between(start, end).max(0);

        let (anniversaries, final_year_partial) = year_boundaries(start, total_days);
        let month_ends = month_boundaries(start, total_days);
        let payments = payment_events(&input, total_days);
        let sweep_offsets = sweep_days(&input.config, start, total_days);
        let bonus_triggers =
            bonus_trigger_days(&input.config, &anniversaries, final_year_partial);
        let tax_posting_offsets = tax_posting_days(&input, start, end, total_days);

        let invested_yield = DailyYield::resolve(&input.yield_source);
        let tax_bonus_yield = match input.tax_bonus_yield {
            Some(annual) => DailyYield::Constant(daily_factor(annual)),
            None => invested_yield.clone(),
        };

        Self {
            input,
            invested_yield,
            tax_bonus_yield,
            total_days,
            anniversaries,
            final_year_partial,
            month_ends,
            payments,
            sweep_offsets,
            bonus_triggers,
            tax_posting_offsets,
        }
    }

    /// Run the loop to completion and emit the results record.
    pub fn run(&self) -> ProjectionResult {
        let mut result = ProjectionResult::new();
        if self.total_days == 0 {
            result.finalize();
            return result;
        }

        let mut state = SimulationState::new();
        let mut payment_idx = 0usize;
        let mut sweep_idx = 0usize;
        let mut trigger_idx = 0usize;
        let mut posting_idx = 0usize;
        let mut month_idx = 0usize;
        let mut year_idx = 0usize;
        let mut year_start_offset = 0i64;

        for day in 0..self.total_days {
            // Annual bonus trigger
            while trigger_idx < self.bonus_triggers.len()
                && self.bonus_triggers[trigger_idx].0 == day
            {
                let year = self.bonus_triggers[trigger_idx].1;
                self.fire_annual_bonus(&mut state, year);
                trigger_idx += 1;
            }

            // Payment events
            while payment_idx < self.payments.len()
                && self.payments[payment_idx].offset == day
            {
                let event = self.payments[payment_idx];
                self.apply_payment(&mut state, &event, date_at_offset(self.input.start_date, day));
                payment_idx += 1;
            }

            // Periodic management-fee sweep
            let sweep_due = match self.input.config.management_fee_cadence {
                FeeCadence::Daily => true,
                _ => {
                    let due = sweep_idx < self.sweep_offsets.len()
                        && self.sweep_offsets[sweep_idx] == day;
                    if due {
                        sweep_idx += 1;
                    }
                    due
                }
            };
            if sweep_due {
                self.apply_management_sweep(&mut state);
            }

            // Daily compounding
            self.compound_day(&mut state, day as usize);

            // Ongoing fee layer
            self.apply_ongoing_fees(&mut state);

            // Calendar-posted tax credit lands on its fixed annual date
            while posting_idx < self.tax_posting_offsets.len()
                && self.tax_posting_offsets[posting_idx] == day
            {
                self.post_pending_tax_credit(&mut state);
                posting_idx += 1;
            }

            // Month and year closes at tomorrow's boundary. Year-close
            // flows run before the month record is emitted so the
            // boundary month carries them and both records read the same
            // post-close balances.
            let boundary = day + 1;
            let year_close =
                year_idx < self.anniversaries.len() && self.anniversaries[year_idx] == boundary;
            if year_close {
                let is_final = year_idx + 1 == self.anniversaries.len();
                let partial = is_final && self.final_year_partial;
                self.apply_year_close(&mut state, partial);
            }
            if month_idx < self.month_ends.len() && self.month_ends[month_idx] == boundary {
                month_idx += 1;
                self.close_month(&mut state, &mut result, month_idx as u32, boundary);
            }
            if year_close {
                self.emit_year(&mut state, &mut result, year_start_offset, boundary);
                year_start_offset = boundary;
                year_idx += 1;
            }
        }

        result.finalize();
        result
    }

    /// Once-per-year bonus on the configured trigger day.
    fn fire_annual_bonus(&self, state: &mut SimulationState, policy_year: u32) {
        if state.annual_bonus_fired {
            return;
        }
        let amount = match &self.input.config.annual_bonus {
            AnnualBonusMode::None => 0.0,
            AnnualBonusMode::InitialCostRefund(schedule) => {
                clamp_amount(schedule.value_for(policy_year) * state.initial_cost_total)
            }
            AnnualBonusMode::PaymentPercent(schedule) => {
                let planned = self.planned_payment(policy_year);
                clamp_amount(schedule.value_for(policy_year) * planned)
            }
        };
        if amount > 0.0 {
            state.account.deposit(LedgerKind::Invested, amount);
            record_bonus(state, amount);
        }
        state.annual_bonus_fired = true;
    }

    /// Payment waterfall: risk premium, upfront cost, admin fee, payment
    /// bonus, tax credit, then the client/invested split.
    fn apply_payment(&self, state: &mut SimulationState, event: &PaymentEvent, date: NaiveDate) {
        let config = &self.input.config;
        let gross = event.amount;
        if gross <= 0.0 {
            return;
        }
        state.year.payment += gross;
        state.month.payment += gross;

        // Risk premium, capped at the gross payment
        let risk = match &config.risk_fee {
            RiskFeeMode::None => 0.0,
            RiskFeeMode::PaymentPercent(schedule) => {
                schedule.value_for(event.policy_year) * gross
            }
            RiskFeeMode::Fixed(amount) => *amount,
            RiskFeeMode::Custom(resolver) => resolver(&RiskFeeContext {
                policy_year: event.policy_year,
                gross_payment: gross,
                total_value: state.account.total_value(),
                date,
            }),
        };
        let risk = clamp_amount(risk).min(gross);
        record_cost(state, CostKind::Risk, risk);
        let mut remaining = gross - risk;

        // Upfront/acquisition cost
        let upfront_base = match config.upfront_base {
            UpfrontBase::Gross => gross,
            UpfrontBase::RiskAdjusted => remaining,
        };
        let upfront = clamp_amount(config.upfront_cost.value_for(event.policy_year) * upfront_base)
            .min(remaining);
        remaining -= upfront;
        state.initial_cost_total += upfront;
        record_cost(state, CostKind::Upfront, upfront);

        // Administration fee
        let admin = clamp_amount(config.admin_fee_percent * gross).min(remaining);
        remaining -= admin;
        record_cost(state, CostKind::Admin, admin);

        // Contribution-linked bonus
        let bonus = clamp_amount(config.payment_bonus.value_for(event.policy_year) * gross);
        if bonus > 0.0 {
            state.account.deposit(LedgerKind::Invested, bonus);
            record_bonus(state, bonus);
        }

        self.accrue_tax_credit(state, gross, event.policy_year);

        // Net payment split between client and invested ledgers
        let share = config.invested_share.clamp(0.0, 1.0);
        let net = clamp_amount(remaining);
        state.account.deposit(LedgerKind::Invested, net * share);
        state.account.deposit(LedgerKind::Client, net * (1.0 - share));
    }

    /// Rate × payment capped per year, or the manual per-year amount;
    /// posted immediately or accrued for the calendar posting date.
    fn accrue_tax_credit(&self, state: &mut SimulationState, gross: f64, policy_year: u32) {
        if !self.input.tax_credit_enabled {
            return;
        }
        let Some(tax) = &self.input.config.tax_credit else {
            return;
        };

        let credit = match &tax.manual_amounts {
            Some(amounts) => {
                // Manual amounts land once, with the year's first payment
                if state.tax_credit_year_total > 0.0 {
                    0.0
                } else {
                    clamp_amount(
                        amounts
                            .get(policy_year.saturating_sub(1) as usize)
                            .copied()
                            .unwrap_or(0.0),
                    )
                }
            }
            None => {
                let cap = clamp_amount(tax.yearly_cap.value_for(policy_year));
                let headroom = clamp_amount(cap - state.tax_credit_year_total);
                clamp_amount(tax.rate * gross).min(headroom)
            }
        };
        if credit <= 0.0 {
            return;
        }
        state.tax_credit_year_total += credit;

        match tax.posting {
            TaxCreditPosting::Immediate => {
                state.account.deposit(LedgerKind::TaxBonus, credit);
                record_tax_credit(state, credit);
            }
            TaxCreditPosting::Calendar { .. } => {
                state.pending_tax_credit += credit;
            }
        }
    }

    /// Deposit accrued calendar-mode credit on its posting date.
    fn post_pending_tax_credit(&self, state: &mut SimulationState) {
        let pending = state.pending_tax_credit;
        if pending > 0.0 {
            state.account.deposit(LedgerKind::TaxBonus, pending);
            record_tax_credit(state, pending);
            state.pending_tax_credit = 0.0;
        }
    }

    /// Periodic management fee, percent of value or fixed per sweep.
    fn apply_management_sweep(&self, state: &mut SimulationState) {
        let config = &self.input.config;
        let amount = match &config.management_fee {
            ManagementFee::None => 0.0,
            ManagementFee::AnnualPercent(percent) => {
                state.account.total_value() * percent
                    / config.management_fee_cadence.periods_per_year()
            }
            ManagementFee::FixedPerSweep(amount) => *amount,
        };
        let taken = state.account.deduct_proportional(amount);
        record_cost(state, CostKind::Management, taken);
    }

    /// Compound invested and tax-bonus prices by the day's yield factor.
    fn compound_day(&self, state: &mut SimulationState, day: usize) {
        let invested_before = state.account.invested.value();
        let tax_before = state.account.tax_bonus.value();
        state.account.compound(
            self.invested_yield.factor_for_day(day),
            self.tax_bonus_yield.factor_for_day(day),
        );
        let interest = state.account.invested.value() - invested_before
            + state.account.tax_bonus.value()
            - tax_before;
        state.year.interest += interest;
        state.month.interest += interest;
    }

    /// Second management fee, asset-based fee, and fixed management fee,
    /// each daily pro rata while the ongoing layer is active.
    fn apply_ongoing_fees(&self, state: &mut SimulationState) {
        let config = &self.input.config;
        if !config.ongoing_active(state.policy_year) {
            return;
        }
        if config.ongoing_management_percent > 0.0 {
            let amount =
                state.account.total_value() * config.ongoing_management_percent / DAYS_PER_YEAR;
            let taken = state.account.deduct_proportional(amount);
            record_cost(state, CostKind::Management, taken);
        }
        if config.asset_based_percent > 0.0 {
            let amount = state.account.total_value() * config.asset_based_percent / DAYS_PER_YEAR;
            let taken = state.account.deduct_proportional(amount);
            record_cost(state, CostKind::AssetBased, taken);
        }
        if config.ongoing_fixed_fee > 0.0 {
            let taken = state
                .account
                .deduct_proportional(config.ongoing_fixed_fee / DAYS_PER_YEAR);
            record_cost(state, CostKind::Management, taken);
        }
    }

    /// Month-end sweep plus the month record.
    fn close_month(
        &self,
        state: &mut SimulationState,
        result: &mut ProjectionResult,
        month_index: u32,
        boundary: i64,
    ) {
        let config = &self.input.config;

        // Account-maintenance fee, per ledger, each with its own start month
        if config.maintenance_fee_percent > 0.0 {
            let percent = config.maintenance_fee_percent;
            let targets = [
                (LedgerKind::Client, config.maintenance_start.client),
                (LedgerKind::Invested, config.maintenance_start.invested),
                (LedgerKind::TaxBonus, config.maintenance_start.tax_bonus),
            ];
            for (kind, start_month) in targets {
                if month_index >= start_month {
                    let value = match kind {
                        LedgerKind::Client => state.account.client.value(),
                        LedgerKind::Invested => state.account.invested.value(),
                        LedgerKind::TaxBonus => state.account.tax_bonus.value(),
                    };
                    let taken = state.account.deduct_from(kind, value * percent);
                    record_cost(state, CostKind::Maintenance, taken);
                }
            }
        }

        // Flat admin fee, inactive in year 1
        if config.monthly_admin_fee > 0.0 && state.policy_year >= 2 {
            let taken = state.account.deduct_proportional(config.monthly_admin_fee);
            record_cost(state, CostKind::Maintenance, taken);
        }

        // Paid-up maintenance fee
        if config.paid_up_fee > 0.0 && self.planned_payment(state.policy_year) == 0.0 {
            let floor_met = config
                .paid_up_value_floor
                .map(|floor| state.account.total_value() >= floor)
                .unwrap_or(true);
            if floor_met {
                let taken = state.account.deduct_proportional(config.paid_up_fee);
                record_cost(state, CostKind::Maintenance, taken);
            }
        }

        result.months.push(MonthRecord {
            month_index,
            policy_year: state.policy_year,
            month_end: date_at_offset(self.input.start_date, boundary),
            payment: state.month.payment,
            interest: state.month.interest,
            cost: state.month.total_cost(),
            bonus: state.month.bonus,
            tax_credit: state.month.tax_credit,
            withdrawal: state.month.withdrawal,
            end_total_value: state.account.total_value(),
        });
        state.month.reset();
    }

    /// Year-close flows: planned withdrawal, plus cost, and the wealth
    /// and fixed bonuses. Bonuses are suppressed for a trailing partial
    /// year. Runs before the boundary month record is emitted.
    fn apply_year_close(&self, state: &mut SimulationState, partial: bool) {
        let config = &self.input.config;
        let policy_year = state.policy_year;

        // Planned withdrawal, bounded by the post-withdrawal floor
        let planned = self
            .input
            .yearly_withdrawals
            .get(policy_year as usize - 1)
            .copied()
            .unwrap_or(0.0);
        if planned > 0.0 {
            let available = clamp_amount(state.account.total_value() - config.withdrawal_floor);
            let taken = state.account.deduct_proportional(planned.min(available));
            if taken > 0.0 {
                state.year.withdrawal += taken;
                state.month.withdrawal += taken;
                let fee = state.account.deduct_proportional(config.partial_surrender_fee);
                record_cost(state, CostKind::SurrenderFee, fee);
            }
        }

        // Fixed extra cost for the year
        let plus = state
            .account
            .deduct_proportional(config.plus_cost.value_for(policy_year));
        record_cost(state, CostKind::Plus, plus);

        // Wealth and fixed bonuses only close out complete policy years
        if !partial {
            let wealth = clamp_amount(
                config.wealth_bonus.value_for(policy_year) * state.account.total_value(),
            );
            if wealth > 0.0 {
                state.account.deposit(LedgerKind::Invested, wealth);
                record_bonus(state, wealth);
            }
            let fixed = clamp_amount(config.fixed_bonus.value_for(policy_year));
            if fixed > 0.0 {
                state.account.deposit(LedgerKind::Invested, fixed);
                record_bonus(state, fixed);
            }
        }
    }

    /// Emit the year record from post-close state and roll the year.
    fn emit_year(
        &self,
        state: &mut SimulationState,
        result: &mut ProjectionResult,
        year_start_offset: i64,
        boundary: i64,
    ) {
        let policy_year = state.policy_year;
        let end_total = state.account.total_value();
        let surrender_value = self.surrender_value(state, policy_year);

        result.years.push(YearRecord {
            policy_year,
            year_start: date_at_offset(self.input.start_date, year_start_offset),
            year_end: date_at_offset(self.input.start_date, boundary),
            payment: state.year.payment,
            interest: state.year.interest,
            upfront_cost: state.year.upfront_cost,
            admin_cost: state.year.admin_cost,
            management_cost: state.year.management_cost,
            asset_based_cost: state.year.asset_based_cost,
            maintenance_cost: state.year.maintenance_cost,
            risk_cost: state.year.risk_cost,
            plus_cost: state.year.plus_cost,
            surrender_fee: state.year.surrender_fee,
            bonus: state.year.bonus,
            tax_credit: state.year.tax_credit,
            withdrawal: state.year.withdrawal,
            end_client_value: state.account.client.value(),
            end_invested_value: state.account.invested.value(),
            end_tax_bonus_value: state.account.tax_bonus.value(),
            end_total_value: end_total,
            surrender_value,
            surrender_charge: clamp_amount(end_total - surrender_value),
        });

        state.open_year(policy_year + 1);
    }

    /// Value payable on full surrender at the given policy year's close.
    fn surrender_value(&self, state: &SimulationState, policy_year: u32) -> f64 {
        let config = &self.input.config;
        let fee = config.redemption_fee.value_for(policy_year).clamp(0.0, 1.0);
        match config.redemption_base {
            RedemptionBase::TotalBalance => state.account.total_value() * (1.0 - fee),
            RedemptionBase::InvestedOnly => {
                state.account.client.value()
                    + (state.account.invested.value() + state.account.tax_bonus.value())
                        * (1.0 - fee)
            }
        }
    }

    /// The year's planned gross payment, zero beyond the plan.
    fn planned_payment(&self, policy_year: u32) -> f64 {
        self.input
            .yearly_payments
            .get(policy_year as usize - 1)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Year-close day offsets; the final boundary is `total_days` and may
/// close a partial year when the term does not end on an anniversary.
fn year_boundaries(start: NaiveDate, total_days: i64) -> (Vec<i64>, bool) {
    let mut boundaries = Vec::new();
    if total_days == 0 {
        return (boundaries, false);
    }
    let mut k = 1;
    loop {
        let offset = days_between(start, add_months_clamped(start, 12 * k));
        if offset < total_days {
            boundaries.push(offset);
            k += 1;
        } else {
            let partial = offset != total_days;
            boundaries.push(total_days);
            return (boundaries, partial);
        }
    }
}

/// Month-close day offsets; the final boundary is `total_days`.
fn month_boundaries(start: NaiveDate, total_days: i64) -> Vec<i64> {
    let mut boundaries = Vec::new();
    if total_days == 0 {
        return boundaries;
    }
    let mut m = 1;
    loop {
        let offset = days_between(start, add_months_clamped(start, m));
        if offset < total_days {
            boundaries.push(offset);
            m += 1;
        } else {
            boundaries.push(total_days);
            return boundaries;
        }
    }
}

/// Due-day offsets for every planned payment, rounded per currency.
fn payment_events(input: &EngineInput, total_days: i64) -> Vec<PaymentEvent> {
    let periods = input.frequency.periods_per_year();
    let step = input.frequency.months_step();
    let mut events = Vec::new();
    for (idx, &yearly) in input.yearly_payments.iter().enumerate() {
        if yearly <= 0.0 {
            continue;
        }
        let amount = input.currency.round_amount(yearly / periods as f64);
        if amount <= 0.0 {
            continue;
        }
        for p in 0..periods {
            let months = idx as i32 * 12 + (p * step) as i32;
            let offset =
                days_between(input.start_date, add_months_clamped(input.start_date, months));
            if offset < total_days {
                events.push(PaymentEvent {
                    offset,
                    policy_year: idx as u32 + 1,
                    amount,
                });
            }
        }
    }
    events
}

/// Sweep days for a monthly-or-coarser management-fee cadence.
fn sweep_days(config: &ProductConfig, start: NaiveDate, total_days: i64) -> Vec<i64> {
    let Some(step) = config.management_fee_cadence.months_step() else {
        return Vec::new();
    };
    if matches!(config.management_fee, ManagementFee::None) {
        return Vec::new();
    }
    let mut offsets = Vec::new();
    let mut k = 1;
    loop {
        let offset = days_between(start, add_months_clamped(start, (k * step) as i32));
        if offset >= total_days {
            return offsets;
        }
        offsets.push(offset);
        k += 1;
    }
}

/// Annual bonus trigger days, skipped for a trailing partial year.
fn bonus_trigger_days(
    config: &ProductConfig,
    anniversaries: &[i64],
    final_year_partial: bool,
) -> Vec<(i64, u32)> {
    if matches!(config.annual_bonus, AnnualBonusMode::None) {
        return Vec::new();
    }
    let mut triggers = Vec::new();
    let mut year_start = 0i64;
    for (idx, &boundary) in anniversaries.iter().enumerate() {
        let is_final = idx + 1 == anniversaries.len();
        if !(is_final && final_year_partial) {
            let offset = year_start + config.annual_bonus_trigger_day as i64;
            if offset < boundary {
                triggers.push((offset, idx as u32 + 1));
            }
        }
        year_start = boundary;
    }
    triggers
}

/// Calendar-mode tax posting days inside the term.
fn tax_posting_days(
    input: &EngineInput,
    start: NaiveDate,
    end: NaiveDate,
    total_days: i64,
) -> Vec<i64> {
    use chrono::Datelike;
    let Some(tax) = &input.config.tax_credit else {
        return Vec::new();
    };
    let TaxCreditPosting::Calendar { month, day } = tax.posting else {
        return Vec::new();
    };
    let month = month.clamp(1, 12);
    let mut offsets = Vec::new();
    for year in start.year()..=end.year() {
        let day = day.clamp(1, days_in_month(year, month));
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            let offset = days_between(start, date);
            if offset >= 0 && offset < total_days {
                offsets.push(offset);
            }
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::{MaintenanceStart, TaxCreditConfig, YearSchedule};
    use approx::assert_relative_eq;

    fn base_input(term_years: u32) -> EngineInput {
        EngineInput {
            currency: Currency::Huf,
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            term_years,
            end_date: None,
            frequency: PaymentFrequency::Monthly,
            yield_source: YieldSource::FlatRate(0.0),
            tax_bonus_yield: None,
            tax_credit_enabled: false,
            yearly_payments: vec![120_000.0; term_years as usize],
            yearly_withdrawals: vec![0.0; term_years as usize],
            config: ProductConfig::default(),
        }
    }

    #[test]
    fn test_flat_yield_matches_annuity_future_value() {
        // 5%/year, 10-year term, fixed monthly payment, no fees: the end
        // balance tracks the closed-form future value of a monthly
        // annuity-due within 0.5%.
        let mut input = base_input(10);
        input.yield_source = YieldSource::FlatRate(0.05);
        let result = simulate(input);

        let monthly = 10_000.0;
        let j = 1.05_f64.powf(1.0 / 12.0) - 1.0;
        let expected = monthly * ((1.0 + j).powi(120) - 1.0) / j * (1.0 + j);

        assert_relative_eq!(result.totals.end_balance, expected, max_relative = 0.005);
        assert_eq!(result.years.len(), 10);
        assert_eq!(result.months.len(), 120);
    }

    #[test]
    fn test_upfront_cost_halves_single_payment() {
        // Single first-year payment of 1,000,000 with a 50% upfront cost
        // and 0% yield leaves exactly 500,000 on the invested ledger.
        let mut input = base_input(3);
        input.frequency = PaymentFrequency::Yearly;
        input.yearly_payments = vec![1_000_000.0, 0.0, 0.0];
        input.config.upfront_cost = YearSchedule::from_years(vec![0.5], 0.0);
        let result = simulate(input);

        assert_relative_eq!(result.years[0].upfront_cost, 500_000.0);
        assert_relative_eq!(result.years[0].end_invested_value, 500_000.0);
        assert_relative_eq!(result.totals.end_balance, 500_000.0);
    }

    #[test]
    fn test_invested_only_redemption_haircut() {
        // 100% redemption fee in years 1-9, 0% from year 10, invested-only
        // base: the year-1 surrender value is the client ledger alone.
        let mut input = base_input(10);
        input.config.redemption_fee = YearSchedule::from_steps(&[(1, 1.0), (10, 0.0)], 0.0);
        input.config.redemption_base = RedemptionBase::InvestedOnly;
        input.config.invested_share = 0.6;
        let result = simulate(input);

        let year1 = &result.years[0];
        assert!(year1.end_invested_value > 0.0);
        assert_relative_eq!(year1.surrender_value, year1.end_client_value, epsilon = 1e-9);

        // From year 10 the haircut is gone
        let year10 = &result.years[9];
        assert_relative_eq!(year10.surrender_value, year10.end_total_value, epsilon = 1e-9);
    }

    #[test]
    fn test_oversized_withdrawal_is_clamped() {
        let mut input = base_input(3);
        input.yearly_withdrawals = vec![0.0, 5_000_000.0, 0.0];
        let result = simulate(input);

        let year2 = &result.years[1];
        assert!(year2.withdrawal < 5_000_000.0);
        assert!(year2.withdrawal > 0.0);
        assert!(year2.end_total_value >= -1e-9);
        assert!(result.totals.end_balance >= -1e-9);
        assert_relative_eq!(result.totals.withdrawals, year2.withdrawal);
    }

    #[test]
    fn test_withdrawal_respects_floor() {
        let mut input = base_input(2);
        input.config.withdrawal_floor = 100_000.0;
        input.yearly_withdrawals = vec![10_000_000.0, 0.0];
        let result = simulate(input);

        assert_relative_eq!(result.years[0].end_total_value, 100_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ledger_ratios_survive_fee_sweeps() {
        let mut input = base_input(5);
        input.config.invested_share = 0.5;
        input.config.management_fee = ManagementFee::AnnualPercent(0.02);
        input.config.management_fee_cadence = FeeCadence::Quarterly;
        input.config.ongoing_management_percent = 0.01;
        let result = simulate(input);

        // With zero yield both ledgers hold price 1; proportional sweeps
        // keep the 50/50 split intact through the whole term.
        for year in &result.years {
            assert_relative_eq!(
                year.end_client_value,
                year.end_invested_value,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_no_ledger_goes_negative_under_heavy_fees() {
        let mut input = base_input(20);
        input.yearly_payments = vec![12_000.0; 20];
        input.config.management_fee = ManagementFee::FixedPerSweep(5_000.0);
        input.config.management_fee_cadence = FeeCadence::Monthly;
        input.config.monthly_admin_fee = 1_000.0;
        let result = simulate(input);

        for month in &result.months {
            assert!(month.end_total_value >= -1e-9);
        }
        for year in &result.years {
            assert!(year.end_client_value >= -1e-9);
            assert!(year.end_invested_value >= -1e-9);
            assert!(year.end_tax_bonus_value >= -1e-9);
        }
    }

    #[test]
    fn test_cumulative_cost_is_monotonic() {
        let mut input = base_input(10);
        input.yield_source = YieldSource::FlatRate(0.04);
        input.config.upfront_cost = YearSchedule::from_years(vec![0.6, 0.3, 0.1], 0.0);
        input.config.admin_fee_percent = 0.02;
        input.config.ongoing_management_percent = 0.015;
        input.config.asset_based_percent = 0.005;
        let result = simulate(input);

        let mut cumulative = 0.0;
        for year in &result.years {
            assert!(year.total_cost() >= 0.0);
            cumulative += year.total_cost();
        }
        assert_relative_eq!(cumulative, result.totals.costs, epsilon = 1e-9);
        assert!(result.totals.asset_based_cost > 0.0);
    }

    #[test]
    fn test_term_identity_holds_exactly() {
        let mut input = base_input(10);
        input.yield_source = YieldSource::FlatRate(0.06);
        input.tax_credit_enabled = true;
        input.config.upfront_cost = YearSchedule::from_years(vec![0.4, 0.2], 0.0);
        input.config.admin_fee_percent = 0.01;
        input.config.wealth_bonus = YearSchedule::from_steps(&[(5, 0.005)], 0.0);
        input.config.tax_credit = Some(TaxCreditConfig {
            rate: 0.2,
            yearly_cap: YearSchedule::flat(130_000.0),
            posting: TaxCreditPosting::Immediate,
            manual_amounts: None,
        });
        input.yearly_withdrawals[7] = 50_000.0;
        let result = simulate(input);

        let t = &result.totals;
        let identity =
            t.contributions - t.costs + t.bonus + t.tax_credit + t.interest_net - t.withdrawals;
        assert_relative_eq!(identity, t.end_balance, epsilon = 1e-9);
        assert!(t.tax_credit > 0.0);
    }

    #[test]
    fn test_surrender_value_never_exceeds_balance() {
        let mut input = base_input(12);
        input.yield_source = YieldSource::FlatRate(0.05);
        input.config.redemption_fee =
            YearSchedule::from_years(vec![0.8, 0.6, 0.4, 0.2, 0.1], 0.0);
        let result = simulate(input);

        for year in &result.years {
            if year.policy_year <= 5 {
                assert!(year.surrender_value < year.end_total_value);
            } else {
                assert_relative_eq!(year.surrender_value, year.end_total_value, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_zero_length_term() {
        let input = base_input(0);
        let result = simulate(input);
        assert!(result.years.is_empty());
        assert!(result.months.is_empty());
        assert_eq!(result.totals.end_balance, 0.0);
        assert_eq!(result.totals.contributions, 0.0);
    }

    #[test]
    fn test_tax_credit_cap_and_calendar_posting() {
        let mut input = base_input(3);
        input.tax_credit_enabled = true;
        input.yearly_payments = vec![1_000_000.0; 3];
        input.config.tax_credit = Some(TaxCreditConfig {
            rate: 0.2,
            yearly_cap: YearSchedule::flat(130_000.0),
            posting: TaxCreditPosting::Calendar { month: 3, day: 15 },
            manual_amounts: None,
        });
        let result = simulate(input);

        // 20% of 1,000,000 would be 200,000; the cap holds each policy
        // year's accrual at 130,000, and credit only lands on the March
        // posting dates that fall inside the term.
        let total_tax: f64 = result.years.iter().map(|y| y.tax_credit).sum();
        assert!(total_tax > 0.0);
        for year in &result.years {
            assert!(year.tax_credit <= 130_000.0 + 1e-9);
        }
        assert_relative_eq!(result.totals.tax_credit, total_tax, epsilon = 1e-9);
    }

    #[test]
    fn test_partial_final_year_suppresses_close_bonuses() {
        let mut input = base_input(2);
        input.end_date = Some(NaiveDate::from_ymd_opt(2023, 7, 1).unwrap());
        input.config.wealth_bonus = YearSchedule::flat(0.10);
        let result = simulate(input);

        assert_eq!(result.years.len(), 2);
        assert!(result.years[0].bonus > 0.0);
        // The trailing half year closes without the wealth bonus
        assert_eq!(result.years[1].bonus, 0.0);
    }

    #[test]
    fn test_monthly_payments_fire_once_per_period() {
        let input = base_input(1);
        let result = simulate(input);
        assert_relative_eq!(result.totals.contributions, 120_000.0);
        for month in &result.months {
            assert_relative_eq!(month.payment, 10_000.0);
        }
    }

    #[test]
    fn test_maintenance_start_months_delay_per_ledger() {
        let mut input = base_input(1);
        input.config.invested_share = 0.5;
        input.config.maintenance_fee_percent = 0.01;
        input.config.maintenance_start = MaintenanceStart {
            client: 1,
            invested: 7,
            tax_bonus: 1,
        };
        let result = simulate(input);

        // The client ledger pays maintenance from month 1, the invested
        // ledger only from month 7, so the client side ends lower.
        let year = &result.years[0];
        assert!(year.end_client_value < year.end_invested_value);
        assert!(year.maintenance_cost > 0.0);
    }

    #[test]
    fn test_initial_cost_refund_bonus() {
        let mut input = base_input(3);
        input.config.upfront_cost = YearSchedule::from_years(vec![0.5], 0.0);
        // Year 3 refunds 20% of the cumulated initial cost on day 30
        input.config.annual_bonus =
            AnnualBonusMode::InitialCostRefund(YearSchedule::from_years(vec![0.0, 0.0, 0.2], 0.0));
        input.config.annual_bonus_trigger_day = 30;
        let result = simulate(input);

        // Upfront cost in year 1 is 50% of 120,000
        assert_relative_eq!(result.years[0].upfront_cost, 60_000.0);
        assert_eq!(result.years[1].bonus, 0.0);
        assert_relative_eq!(result.years[2].bonus, 12_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_paid_up_fee_applies_only_without_planned_payment() {
        let mut input = base_input(4);
        input.yearly_payments = vec![120_000.0, 120_000.0, 0.0, 0.0];
        input.config.paid_up_fee = 500.0;
        let result = simulate(input);

        assert_eq!(result.years[0].maintenance_cost, 0.0);
        assert_eq!(result.years[1].maintenance_cost, 0.0);
        assert_relative_eq!(result.years[2].maintenance_cost, 6_000.0, epsilon = 1e-9);
        assert_relative_eq!(result.years[3].maintenance_cost, 6_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_partial_surrender_fee_charged_after_withdrawal() {
        let mut input = base_input(3);
        input.yearly_withdrawals = vec![0.0, 20_000.0, 0.0];
        input.config.partial_surrender_fee = 3_000.0;
        let result = simulate(input);

        assert_relative_eq!(result.years[1].withdrawal, 20_000.0, epsilon = 1e-9);
        assert_relative_eq!(result.years[1].surrender_fee, 3_000.0, epsilon = 1e-9);
        assert_eq!(result.years[0].surrender_fee, 0.0);
    }

    #[test]
    fn test_year_close_flows_land_in_boundary_month() {
        // A withdrawal at the close of the final year must show up in the
        // last month's record, not vanish past the monthly breakdown.
        let mut input = base_input(2);
        input.yearly_withdrawals = vec![0.0, 50_000.0];
        let result = simulate(input);

        let monthly_sum: f64 = result.months.iter().map(|m| m.withdrawal).sum();
        assert_relative_eq!(monthly_sum, 50_000.0, epsilon = 1e-9);
        assert_relative_eq!(result.months[23].withdrawal, 50_000.0, epsilon = 1e-9);
        assert_relative_eq!(result.totals.withdrawals, 50_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_boundary_month_balance_matches_year_record() {
        // The month closing on an anniversary reads the same post-close
        // balance as the year record for that anniversary.
        let mut input = base_input(2);
        input.yearly_withdrawals = vec![50_000.0, 0.0];
        let result = simulate(input);

        assert_relative_eq!(
            result.months[11].end_total_value,
            result.years[0].end_total_value,
            epsilon = 1e-9
        );
        assert_relative_eq!(result.months[11].withdrawal, 50_000.0, epsilon = 1e-9);
        assert_relative_eq!(result.years[0].end_total_value, 70_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_manual_tax_credit_amounts_land_once_per_year() {
        let mut input = base_input(3);
        input.tax_credit_enabled = true;
        input.config.tax_credit = Some(TaxCreditConfig {
            rate: 0.2,
            yearly_cap: YearSchedule::flat(130_000.0),
            posting: TaxCreditPosting::Immediate,
            manual_amounts: Some(vec![10_000.0, 0.0, 25_000.0]),
        });
        let result = simulate(input);

        // Manual amounts replace rate × payment and land with the year's
        // first payment only, despite twelve payment events per year.
        assert_relative_eq!(result.years[0].tax_credit, 10_000.0, epsilon = 1e-9);
        assert_eq!(result.years[1].tax_credit, 0.0);
        assert_relative_eq!(result.years[2].tax_credit, 25_000.0, epsilon = 1e-9);
        assert_relative_eq!(result.totals.tax_credit, 35_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_risk_premium_capped_at_gross_payment() {
        // A fixed risk premium above the monthly payment consumes the
        // whole payment and no more; nothing is left to invest.
        let mut input = base_input(2);
        input.config.risk_fee = RiskFeeMode::Fixed(50_000.0);
        let result = simulate(input);

        for year in &result.years {
            assert_relative_eq!(year.risk_cost, year.payment, epsilon = 1e-9);
        }
        assert_relative_eq!(result.totals.risk_cost, 240_000.0, epsilon = 1e-9);
        assert_relative_eq!(result.totals.end_balance, 0.0, epsilon = 1e-9);
    }
}
