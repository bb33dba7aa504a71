//! Generali MyLife
//!
//! Front-loaded acquisition cost over the first three years, loyalty
//! wealth bonus from year 10, and an invested-only redemption base: the
//! client ledger is always paid out in full, the haircut applies to the
//! invested and tax-bonus ledgers. The `extra` variant (sold in EUR)
//! carries a reduced acquisition schedule.

use crate::input::{Currency, RawInput};

use super::config::{
    ProductConfig, RedemptionBase, TaxCreditConfig, TaxCreditPosting, UpfrontBase,
};
use super::schedule::{RiskFeeMode, YearSchedule};

pub fn configure(input: &RawInput) -> ProductConfig {
    let extra = input.variant.to_lowercase().contains("extra");

    let upfront_cost = if extra {
        YearSchedule::from_years(vec![0.40, 0.20, 0.10], 0.0)
    } else {
        YearSchedule::from_years(vec![0.60, 0.35, 0.15], 0.0)
    };

    let monthly_admin_fee = match input.currency {
        Currency::Huf => 600.0,
        Currency::Eur | Currency::Usd => 2.0,
    };

    let tax_credit = input.tax_credit_enabled.then(|| TaxCreditConfig {
        rate: 0.20,
        yearly_cap: YearSchedule::flat(130_000.0),
        posting: TaxCreditPosting::Calendar { month: 3, day: 20 },
        manual_amounts: None,
    });

    ProductConfig {
        upfront_cost,
        upfront_base: UpfrontBase::Gross,
        admin_fee_percent: 0.035,
        wealth_bonus: YearSchedule::from_steps(&[(10, 0.005)], 0.0),
        ongoing_management_percent: 0.016,
        asset_based_percent: 0.00175,
        monthly_admin_fee,
        tax_credit,
        redemption_fee: YearSchedule::from_years(
            vec![0.98, 0.95, 0.90, 0.80, 0.70, 0.55, 0.40, 0.25, 0.10, 0.05],
            0.0,
        ),
        redemption_base: RedemptionBase::InvestedOnly,
        withdrawal_floor: match input.currency {
            Currency::Huf => 100_000.0,
            Currency::Eur | Currency::Usd => 300.0,
        },
        risk_fee: RiskFeeMode::PaymentPercent(YearSchedule::flat(0.002)),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_variant_reduces_upfront() {
        let base = configure(&RawInput::new("2022-01-01", 15, 240_000.0));
        let mut raw = RawInput::new("2022-01-01", 15, 240_000.0);
        raw.variant = "mylife_extra".to_string();
        let extra = configure(&raw);
        assert!(extra.upfront_cost.value_for(1) < base.upfront_cost.value_for(1));
    }

    #[test]
    fn test_tax_credit_follows_eligibility_flag() {
        let mut raw = RawInput::new("2022-01-01", 15, 240_000.0);
        assert!(configure(&raw).tax_credit.is_none());
        raw.tax_credit_enabled = true;
        let config = configure(&raw);
        assert_eq!(config.tax_credit.unwrap().rate, 0.20);
    }

    #[test]
    fn test_redemption_is_invested_only() {
        let config = configure(&RawInput::new("2022-01-01", 15, 240_000.0));
        assert_eq!(config.redemption_base, RedemptionBase::InvestedOnly);
        assert_eq!(config.redemption_fee.value_for(11), 0.0);
    }
}
