//! Product configuration layer and registry
//!
//! Each configured product is a module producing the complete
//! [`ProductConfig`] the engine runs on. The registry is a closed
//! [`ProductId`] enumeration resolved once from the caller's identifier
//! string; an unknown identifier is a typed, recoverable error.

mod allianz;
mod config;
mod generali;
mod metlife;
mod nn;
mod schedule;
mod uniqa;

pub use config::{
    AnnualBonusMode, FeeCadence, MaintenanceStart, ManagementFee, ProductConfig, RedemptionBase,
    TaxCreditConfig, TaxCreditPosting, UpfrontBase,
};
pub use schedule::{RiskFeeContext, RiskFeeFn, RiskFeeMode, YearSchedule};

use thiserror::Error;

use crate::input::RawInput;
use crate::projection::{simulate, EngineInput, ProjectionResult};

/// Dispatch failure in the product registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// The identifier does not name a configured product.
    #[error("unknown product identifier: {0}")]
    UnknownProduct(String),
}

/// Closed enumeration of the configured products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductId {
    GeneraliMylife,
    NnMotiva,
    AllianzEletprogram,
    MetlifeNivo,
    UniqaJovokulcs,
}

impl ProductId {
    /// Every configured product, in registry order.
    pub const ALL: [ProductId; 5] = [
        ProductId::GeneraliMylife,
        ProductId::NnMotiva,
        ProductId::AllianzEletprogram,
        ProductId::MetlifeNivo,
        ProductId::UniqaJovokulcs,
    ];

    /// Canonical identifier string.
    pub fn key(&self) -> &'static str {
        match self {
            ProductId::GeneraliMylife => "generali_mylife",
            ProductId::NnMotiva => "nn_motiva",
            ProductId::AllianzEletprogram => "allianz_eletprogram",
            ProductId::MetlifeNivo => "metlife_nivo",
            ProductId::UniqaJovokulcs => "uniqa_jovokulcs",
        }
    }

    /// Display name for tables and logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProductId::GeneraliMylife => "Generali MyLife",
            ProductId::NnMotiva => "NN Motiva",
            ProductId::AllianzEletprogram => "Allianz Életprogram",
            ProductId::MetlifeNivo => "MetLife Nivó",
            ProductId::UniqaJovokulcs => "Uniqa Jövőkulcs",
        }
    }

    /// Resolve an identifier string to a product.
    ///
    /// Matching is case-insensitive and ignores separators, so
    /// `"Generali MyLife"` and `"generali-mylife"` both resolve.
    pub fn resolve(identifier: &str) -> Result<Self, ProductError> {
        let normalized: String = identifier
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        for id in Self::ALL {
            let key: String = id.key().chars().filter(|c| c.is_alphanumeric()).collect();
            if normalized == key {
                return Ok(id);
            }
        }
        Err(ProductError::UnknownProduct(identifier.to_string()))
    }
}

/// Produce the engine configuration for a resolved product.
///
/// Pure dispatch: each product module derives its defaults from the raw
/// input's variant string, currency, and tax-credit flag only. The
/// caller's configuration is returned untouched when product defaults
/// are disabled.
pub fn configure(id: ProductId, input: &RawInput) -> ProductConfig {
    if !input.use_product_defaults {
        return input.config_override.clone().unwrap_or_default();
    }
    match id {
        ProductId::GeneraliMylife => generali::configure(input),
        ProductId::NnMotiva => nn::configure(input),
        ProductId::AllianzEletprogram => allianz::configure(input),
        ProductId::MetlifeNivo => metlife::configure(input),
        ProductId::UniqaJovokulcs => uniqa::configure(input),
    }
}

/// Single public entry point: resolve the product, merge its defaults,
/// and run the daily simulation loop.
pub fn calculate(product: &str, input: &RawInput) -> Result<ProjectionResult, ProductError> {
    let id = ProductId::resolve(product)?;
    let config = configure(id, input);
    Ok(simulate(EngineInput::from_raw(input, config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Currency;

    #[test]
    fn test_resolve_accepts_spelling_variants() {
        assert_eq!(ProductId::resolve("generali_mylife").unwrap(), ProductId::GeneraliMylife);
        assert_eq!(ProductId::resolve("Generali MyLife").unwrap(), ProductId::GeneraliMylife);
        assert_eq!(ProductId::resolve("NN-MOTIVA").unwrap(), ProductId::NnMotiva);
    }

    #[test]
    fn test_unknown_product_is_typed_error() {
        let err = ProductId::resolve("no_such_product").unwrap_err();
        assert_eq!(err, ProductError::UnknownProduct("no_such_product".to_string()));
        assert!(err.to_string().contains("no_such_product"));
    }

    #[test]
    fn test_opt_out_keeps_caller_config() {
        let mut input = RawInput::new("2022-01-01", 10, 120_000.0);
        input.use_product_defaults = false;
        let mut custom = ProductConfig::default();
        custom.admin_fee_percent = 0.042;
        input.config_override = Some(custom);

        let config = configure(ProductId::GeneraliMylife, &input);
        assert_eq!(config.admin_fee_percent, 0.042);
        assert!(config.upfront_cost.is_zero());
    }

    #[test]
    fn test_calculate_runs_every_registered_product() {
        let mut input = RawInput::new("2022-01-01", 10, 240_000.0);
        input.currency = Currency::Huf;
        for id in ProductId::ALL {
            let result = calculate(id.key(), &input).unwrap();
            assert_eq!(result.years.len(), 10);
            assert!(result.totals.contributions > 0.0);
        }
    }

    #[test]
    fn test_calculate_unknown_product() {
        let input = RawInput::new("2022-01-01", 10, 240_000.0);
        assert!(matches!(
            calculate("mystery", &input),
            Err(ProductError::UnknownProduct(_))
        ));
    }
}
