//! Allianz Életprogram
//!
//! Heavily front-loaded acquisition cost that the product pays back:
//! from year 6 an annual bonus refunds a growing share of the
//! accumulated initial cost, fired on the 30th day of each policy year.

use crate::input::{Currency, RawInput};

use super::config::{
    AnnualBonusMode, ProductConfig, RedemptionBase, TaxCreditConfig, TaxCreditPosting, UpfrontBase,
};
use super::schedule::{RiskFeeMode, YearSchedule};

pub fn configure(input: &RawInput) -> ProductConfig {
    let tax_credit = input.tax_credit_enabled.then(|| TaxCreditConfig {
        rate: 0.20,
        yearly_cap: YearSchedule::flat(130_000.0),
        posting: TaxCreditPosting::Calendar { month: 4, day: 10 },
        manual_amounts: None,
    });

    ProductConfig {
        upfront_cost: YearSchedule::from_years(vec![0.75, 0.45, 0.20], 0.0),
        upfront_base: UpfrontBase::Gross,
        admin_fee_percent: 0.03,
        annual_bonus: AnnualBonusMode::InitialCostRefund(YearSchedule::from_steps(
            &[(6, 0.10), (10, 0.15), (15, 0.20)],
            0.0,
        )),
        annual_bonus_trigger_day: 30,
        ongoing_management_percent: 0.017,
        asset_based_percent: 0.0019,
        maintenance_fee_percent: 0.0013,
        tax_credit,
        redemption_fee: YearSchedule::from_years(
            vec![0.07, 0.06, 0.05, 0.05, 0.04, 0.04, 0.03, 0.02, 0.02, 0.01],
            0.0,
        ),
        redemption_base: RedemptionBase::TotalBalance,
        withdrawal_floor: match input.currency {
            Currency::Huf => 120_000.0,
            Currency::Eur | Currency::Usd => 350.0,
        },
        risk_fee: RiskFeeMode::Fixed(match input.currency {
            Currency::Huf => 300.0,
            Currency::Eur | Currency::Usd => 1.0,
        }),
        ..Default::default()
    }
}
