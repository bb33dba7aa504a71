//! Caller-facing input records for a projection run

use serde::{Deserialize, Serialize};

use crate::products::ProductConfig;
use crate::yields::YieldSource;

/// Contract currency. Determines payment rounding: whole units for HUF,
/// two decimals otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    Huf,
    Eur,
    Usd,
}

impl Currency {
    /// Round a periodic payment amount to the currency's granularity.
    pub fn round_amount(&self, amount: f64) -> f64 {
        match self {
            Currency::Huf => amount.round(),
            Currency::Eur | Currency::Usd => (amount * 100.0).round() / 100.0,
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Huf
    }
}

/// How often payments fall due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFrequency {
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl PaymentFrequency {
    /// Due periods per policy year.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::HalfYearly => 2,
            PaymentFrequency::Yearly => 1,
        }
    }

    /// Calendar months between consecutive due days.
    pub fn months_step(&self) -> u32 {
        12 / self.periods_per_year()
    }
}

impl Default for PaymentFrequency {
    fn default() -> Self {
        PaymentFrequency::Monthly
    }
}

/// Manual per-year adjustments applied by the plan builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanOverrides {
    /// Indexation percent override by policy year (1-indexed year, fraction)
    #[serde(default)]
    pub indexation: Vec<(u32, f64)>,

    /// Full payment override by policy year (1-indexed year, yearly amount)
    #[serde(default)]
    pub payments: Vec<(u32, f64)>,

    /// Planned withdrawal by policy year (1-indexed year, amount)
    #[serde(default)]
    pub withdrawals: Vec<(u32, f64)>,
}

/// Raw input assembled by the caller for one projection.
///
/// The product configuration layer merges product defaults into this
/// record; `use_product_defaults = false` keeps `config_override` (or the
/// stock defaults) untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInput {
    /// Product-variant string declared by the caller (currency- or
    /// tax-variant selection happens inside the product module)
    #[serde(default)]
    pub variant: String,

    pub currency: Currency,

    /// Contract start date, `YYYY-MM-DD`; unparseable input falls back to
    /// the reference date
    pub start_date: String,

    /// Term length in whole policy years
    pub term_years: u32,

    /// Explicit end date overriding `term_years` (may produce a trailing
    /// partial policy year)
    #[serde(default)]
    pub end_date: Option<String>,

    pub payment_frequency: PaymentFrequency,

    /// First-year yearly payment before indexation
    pub base_payment: f64,

    /// Annual indexation of the yearly payment (fraction, e.g. 0.03)
    #[serde(default)]
    pub indexation: f64,

    #[serde(default)]
    pub plan_overrides: PlanOverrides,

    #[serde(default)]
    pub yield_source: YieldSource,

    /// Flat annual yield for the tax-bonus ledger; invested yield applies
    /// when unset
    #[serde(default)]
    pub tax_bonus_yield: Option<f64>,

    /// Whether the contract is eligible for the tax credit
    #[serde(default)]
    pub tax_credit_enabled: bool,

    /// When false, product defaults are not applied and the caller's
    /// configuration is used as-is
    #[serde(default = "default_true")]
    pub use_product_defaults: bool,

    /// Caller-supplied configuration honored when product defaults are
    /// disabled
    #[serde(skip)]
    pub config_override: Option<ProductConfig>,
}

fn default_true() -> bool {
    true
}

impl RawInput {
    /// A minimal input for the given term and payment, defaults elsewhere.
    pub fn new(start_date: &str, term_years: u32, base_payment: f64) -> Self {
        Self {
            variant: String::new(),
            currency: Currency::default(),
            start_date: start_date.to_string(),
            term_years,
            end_date: None,
            payment_frequency: PaymentFrequency::default(),
            base_payment,
            indexation: 0.0,
            plan_overrides: PlanOverrides::default(),
            yield_source: YieldSource::default(),
            tax_bonus_yield: None,
            tax_credit_enabled: false,
            use_product_defaults: true,
            config_override: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_rounding() {
        assert_eq!(Currency::Huf.round_amount(1234.56), 1235.0);
        assert_eq!(Currency::Eur.round_amount(1234.567), 1234.57);
        assert_eq!(Currency::Usd.round_amount(10.004), 10.0);
    }

    #[test]
    fn test_frequency_periods() {
        assert_eq!(PaymentFrequency::Monthly.periods_per_year(), 12);
        assert_eq!(PaymentFrequency::Quarterly.months_step(), 3);
        assert_eq!(PaymentFrequency::Yearly.months_step(), 12);
    }

    #[test]
    fn test_raw_input_deserializes_with_defaults() {
        let json = r#"{
            "currency": "Huf",
            "start_date": "2022-01-01",
            "term_years": 10,
            "payment_frequency": "Monthly",
            "base_payment": 240000.0
        }"#;
        let input: RawInput = serde_json::from_str(json).unwrap();
        assert!(input.use_product_defaults);
        assert!(input.config_override.is_none());
        assert_eq!(input.indexation, 0.0);
    }
}
