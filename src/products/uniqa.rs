//! Uniqa Jövőkulcs
//!
//! Maintenance fee with per-ledger start months (invested units from the
//! third year, tax-bonus units from the second), an immediate-posting
//! tax credit, a yearly contract fee, and a paid-up fee that only
//! applies once the balance clears a value floor.

use crate::input::{Currency, RawInput};

use super::config::{
    MaintenanceStart, ProductConfig, RedemptionBase, TaxCreditConfig, TaxCreditPosting,
    UpfrontBase,
};
use super::schedule::YearSchedule;

pub fn configure(input: &RawInput) -> ProductConfig {
    let tax_credit = input.tax_credit_enabled.then(|| TaxCreditConfig {
        rate: 0.20,
        yearly_cap: YearSchedule::flat(130_000.0),
        posting: TaxCreditPosting::Immediate,
        manual_amounts: None,
    });

    let (paid_up_fee, paid_up_value_floor, plus_cost, monthly_admin_fee) = match input.currency {
        Currency::Huf => (700.0, 100_000.0, 1_500.0, 400.0),
        Currency::Eur | Currency::Usd => (2.0, 300.0, 5.0, 1.2),
    };

    ProductConfig {
        upfront_cost: YearSchedule::from_years(vec![0.45, 0.25], 0.0),
        upfront_base: UpfrontBase::Gross,
        admin_fee_percent: 0.03,
        ongoing_management_percent: 0.0168,
        maintenance_fee_percent: 0.00165,
        maintenance_start: MaintenanceStart { client: 1, invested: 25, tax_bonus: 13 },
        monthly_admin_fee,
        paid_up_fee,
        paid_up_value_floor: Some(paid_up_value_floor),
        tax_credit,
        redemption_fee: YearSchedule::from_years(
            vec![0.08, 0.07, 0.06, 0.05, 0.04, 0.03, 0.03, 0.02, 0.02, 0.01],
            0.0,
        ),
        redemption_base: RedemptionBase::TotalBalance,
        withdrawal_floor: match input.currency {
            Currency::Huf => 100_000.0,
            Currency::Eur | Currency::Usd => 300.0,
        },
        plus_cost: YearSchedule::flat(plus_cost),
        ..Default::default()
    }
}
