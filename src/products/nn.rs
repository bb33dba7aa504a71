//! NN Motiva
//!
//! Moderate acquisition cost, a payment-percent loyalty bonus from year
//! 11, and a pension variant carrying the 20% tax credit, accrued over
//! each payment year and posted on a fixed calendar date. The pension
//! variant is selected by the tax-credit eligibility flag or by naming
//! it in the variant string.
//!
//! The insurer charges a percentage on partial surrenders with a
//! currency minimum; here a fixed fee at the minimum stands in.

use crate::input::{Currency, RawInput};

use super::config::{
    FeeCadence, ManagementFee, ProductConfig, RedemptionBase, TaxCreditConfig, TaxCreditPosting,
    UpfrontBase,
};
use super::schedule::YearSchedule;

pub fn configure(input: &RawInput) -> ProductConfig {
    let variant = input.variant.to_lowercase();
    let pension =
        input.tax_credit_enabled || variant.contains("pension") || variant.contains("nyugdij");

    let tax_credit = pension.then(|| TaxCreditConfig {
        rate: 0.20,
        yearly_cap: YearSchedule::flat(130_000.0),
        posting: TaxCreditPosting::Calendar { month: 2, day: 15 },
        manual_amounts: None,
    });

    let partial_surrender_fee = match input.currency {
        Currency::Huf => 3_500.0,
        Currency::Eur | Currency::Usd => 10.0,
    };

    ProductConfig {
        upfront_cost: YearSchedule::from_years(vec![0.30, 0.15], 0.0),
        upfront_base: UpfrontBase::Gross,
        admin_fee_percent: 0.04,
        payment_bonus: YearSchedule::from_steps(&[(11, 0.01), (16, 0.02)], 0.0),
        management_fee: ManagementFee::AnnualPercent(0.0145),
        management_fee_cadence: FeeCadence::Monthly,
        monthly_admin_fee: match input.currency {
            Currency::Huf => 450.0,
            Currency::Eur | Currency::Usd => 1.5,
        },
        tax_credit,
        redemption_fee: YearSchedule::from_years(
            vec![0.05, 0.05, 0.04, 0.04, 0.03, 0.03, 0.02, 0.02, 0.01, 0.01],
            0.0,
        ),
        redemption_base: RedemptionBase::TotalBalance,
        withdrawal_floor: match input.currency {
            Currency::Huf => 150_000.0,
            Currency::Eur | Currency::Usd => 400.0,
        },
        partial_surrender_fee,
        ..Default::default()
    }
}
