//! Engine-facing product configuration
//!
//! One [`ProductConfig`] value carries every fee, bonus, tax-credit, and
//! redemption rule the daily loop reads. Product modules produce it from
//! their default tables; callers may supply their own when opting out of
//! product defaults. All percentages are fractions (0.05 = 5%).

use super::schedule::{RiskFeeMode, YearSchedule};

/// Base amount an upfront cost percentage applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpfrontBase {
    /// Percent of the gross payment
    Gross,
    /// Percent of the payment net of the risk premium
    RiskAdjusted,
}

/// Whether the redemption percentage haircuts the invested side only or
/// the whole balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionBase {
    /// Client ledger returned in full; invested and tax-bonus haircut
    InvestedOnly,
    /// Haircut on the total policy value
    TotalBalance,
}

/// Cadence of the periodic management-fee sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeCadence {
    Daily,
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl FeeCadence {
    /// Calendar months between sweeps; `None` means every day.
    pub fn months_step(&self) -> Option<u32> {
        match self {
            FeeCadence::Daily => None,
            FeeCadence::Monthly => Some(1),
            FeeCadence::Quarterly => Some(3),
            FeeCadence::HalfYearly => Some(6),
            FeeCadence::Yearly => Some(12),
        }
    }

    /// Sweeps per policy year, used to split annual amounts.
    pub fn periods_per_year(&self) -> f64 {
        match self {
            FeeCadence::Daily => 365.0,
            FeeCadence::Monthly => 12.0,
            FeeCadence::Quarterly => 4.0,
            FeeCadence::HalfYearly => 2.0,
            FeeCadence::Yearly => 1.0,
        }
    }
}

/// Periodic management-fee amount per sweep.
#[derive(Debug, Clone)]
pub enum ManagementFee {
    /// No sweep
    None,
    /// Annual percent of total value, split across sweeps
    AnnualPercent(f64),
    /// Fixed amount per sweep
    FixedPerSweep(f64),
}

/// Annual bonus fired at most once per policy year on the trigger day.
#[derive(Debug, Clone)]
pub enum AnnualBonusMode {
    None,
    /// Refund of accumulated upfront (initial) cost, percent scheduled by
    /// policy year
    InitialCostRefund(YearSchedule),
    /// Percent of the year's planned payment, scheduled by policy year
    PaymentPercent(YearSchedule),
}

/// When the yearly tax credit lands on the tax-bonus ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxCreditPosting {
    /// Credited at each payment event
    Immediate,
    /// Accrued over the payment year, posted on a fixed calendar date
    Calendar { month: u32, day: u32 },
}

/// Tax-credit rules for eligible contracts.
#[derive(Debug, Clone)]
pub struct TaxCreditConfig {
    /// Credit rate on each payment
    pub rate: f64,

    /// Yearly cap on the credited amount
    pub yearly_cap: YearSchedule,

    pub posting: TaxCreditPosting,

    /// Manually specified credit per policy year; overrides rate × payment
    /// when present (index 0 = year 1)
    pub manual_amounts: Option<Vec<f64>>,
}

/// Delayed start of the account-maintenance fee, per ledger, in months
/// since contract start (1-indexed month; fee active from that month on).
#[derive(Debug, Clone, Copy, Default)]
pub struct MaintenanceStart {
    pub client: u32,
    pub invested: u32,
    pub tax_bonus: u32,
}

/// Complete parameter set the daily loop runs on.
#[derive(Debug, Clone)]
pub struct ProductConfig {
    // Payment-time deductions
    /// Upfront/acquisition cost percent by policy year
    pub upfront_cost: YearSchedule,
    pub upfront_base: UpfrontBase,
    /// Administration fee percent of each payment
    pub admin_fee_percent: f64,
    /// Share of the net payment bought into the invested ledger; the rest
    /// goes to the client ledger
    pub invested_share: f64,

    // Bonuses
    /// Bonus percent of each payment, credited as invested units
    pub payment_bonus: YearSchedule,
    pub annual_bonus: AnnualBonusMode,
    /// Day within the policy year the annual bonus fires on
    pub annual_bonus_trigger_day: u32,
    /// Percent of total balance credited at year close
    pub wealth_bonus: YearSchedule,
    /// Fixed amount credited at year close
    pub fixed_bonus: YearSchedule,

    // Periodic management-fee sweep
    pub management_fee: ManagementFee,
    pub management_fee_cadence: FeeCadence,

    // Ongoing daily fee layer, active between the bounds (inclusive)
    pub ongoing_start_year: u32,
    pub ongoing_stop_year: u32,
    /// Second management fee, annual percent of value
    pub ongoing_management_percent: f64,
    /// Asset-based fee, annual percent of value (tracked separately)
    pub asset_based_percent: f64,
    /// Fixed management fee, annual amount spread daily
    pub ongoing_fixed_fee: f64,

    // Month-end sweep
    /// Account-maintenance fee, monthly percent of each ledger's value
    pub maintenance_fee_percent: f64,
    pub maintenance_start: MaintenanceStart,
    /// Flat monthly admin fee, inactive in year 1
    pub monthly_admin_fee: f64,
    /// Monthly fee while the policy is paid up (year's planned payment is
    /// zero)
    pub paid_up_fee: f64,
    /// The paid-up fee only applies once total value reaches this floor
    pub paid_up_value_floor: Option<f64>,

    // Tax credit
    pub tax_credit: Option<TaxCreditConfig>,

    // Redemption
    pub redemption_fee: YearSchedule,
    pub redemption_base: RedemptionBase,

    // Withdrawals
    /// Post-withdrawal total value may not fall below this floor
    pub withdrawal_floor: f64,
    /// Fixed fee charged against the remaining balance after a partial
    /// withdrawal
    pub partial_surrender_fee: f64,

    /// Fixed extra cost per policy year, charged at year close
    pub plus_cost: YearSchedule,

    // Risk insurance
    pub risk_fee: RiskFeeMode,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            upfront_cost: YearSchedule::default(),
            upfront_base: UpfrontBase::Gross,
            admin_fee_percent: 0.0,
            invested_share: 1.0,
            payment_bonus: YearSchedule::default(),
            annual_bonus: AnnualBonusMode::None,
            annual_bonus_trigger_day: 0,
            wealth_bonus: YearSchedule::default(),
            fixed_bonus: YearSchedule::default(),
            management_fee: ManagementFee::None,
            management_fee_cadence: FeeCadence::Monthly,
            ongoing_start_year: 1,
            ongoing_stop_year: u32::MAX,
            ongoing_management_percent: 0.0,
            asset_based_percent: 0.0,
            ongoing_fixed_fee: 0.0,
            maintenance_fee_percent: 0.0,
            maintenance_start: MaintenanceStart::default(),
            monthly_admin_fee: 0.0,
            paid_up_fee: 0.0,
            paid_up_value_floor: None,
            tax_credit: None,
            redemption_fee: YearSchedule::default(),
            redemption_base: RedemptionBase::TotalBalance,
            withdrawal_floor: 0.0,
            partial_surrender_fee: 0.0,
            plus_cost: YearSchedule::default(),
            risk_fee: RiskFeeMode::None,
        }
    }
}

impl ProductConfig {
    /// True when the ongoing daily fee layer applies in the given year.
    pub fn ongoing_active(&self, policy_year: u32) -> bool {
        policy_year >= self.ongoing_start_year && policy_year <= self.ongoing_stop_year
    }
}
