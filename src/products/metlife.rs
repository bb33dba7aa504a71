//! MetLife Nivó
//!
//! The only configured product with a meaningful risk component: the
//! premium is resolved per payment through the custom risk-fee hook, and
//! the acquisition cost applies to the payment net of that premium.

use crate::input::{Currency, RawInput};

use super::config::{
    FeeCadence, ManagementFee, ProductConfig, RedemptionBase, TaxCreditConfig, TaxCreditPosting,
    UpfrontBase,
};
use super::schedule::{RiskFeeContext, RiskFeeMode, YearSchedule};

/// Risk premium per payment. The insurer's age-banded premium table is
/// not modeled; a flat 2 per mille of the gross payment stands in.
fn risk_premium(ctx: &RiskFeeContext) -> f64 {
    ctx.gross_payment * 0.002
}

pub fn configure(input: &RawInput) -> ProductConfig {
    let tax_credit = input.tax_credit_enabled.then(|| TaxCreditConfig {
        rate: 0.20,
        yearly_cap: YearSchedule::flat(130_000.0),
        posting: TaxCreditPosting::Calendar { month: 5, day: 5 },
        manual_amounts: None,
    });

    ProductConfig {
        upfront_cost: YearSchedule::from_years(vec![0.55, 0.30, 0.10], 0.0),
        upfront_base: UpfrontBase::RiskAdjusted,
        admin_fee_percent: 0.04,
        payment_bonus: YearSchedule::from_steps(&[(6, 0.01)], 0.0),
        management_fee: ManagementFee::FixedPerSweep(match input.currency {
            Currency::Huf => 500.0,
            Currency::Eur | Currency::Usd => 1.6,
        }),
        management_fee_cadence: FeeCadence::Monthly,
        ongoing_management_percent: 0.015,
        tax_credit,
        redemption_fee: YearSchedule::from_years(
            vec![0.06, 0.05, 0.05, 0.04, 0.04, 0.03, 0.03, 0.02, 0.01, 0.01],
            0.0,
        ),
        redemption_base: RedemptionBase::TotalBalance,
        withdrawal_floor: match input.currency {
            Currency::Huf => 100_000.0,
            Currency::Eur | Currency::Usd => 300.0,
        },
        risk_fee: RiskFeeMode::Custom(risk_premium),
        ..Default::default()
    }
}
