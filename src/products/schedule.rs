//! Per-year schedule tables and the risk-fee extension point

use chrono::NaiveDate;

/// A value looked up by policy year with graceful fallback.
///
/// Years past the table fall back to the schedule default; year 0 reads
/// the first entry.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSchedule {
    values: Vec<f64>,
    default: f64,
}

impl YearSchedule {
    /// The same value for every policy year.
    pub fn flat(value: f64) -> Self {
        Self { values: Vec::new(), default: value }
    }

    /// Explicit per-year values (index 0 = year 1), `default` beyond.
    pub fn from_years(values: Vec<f64>, default: f64) -> Self {
        Self { values, default }
    }

    /// Step table: `(from_year, value)` pairs in ascending year order.
    /// The value of the last step at or before the requested year applies;
    /// `default` applies before the first step.
    pub fn from_steps(steps: &[(u32, f64)], default: f64) -> Self {
        let last_year = steps.last().map(|(y, _)| *y).unwrap_or(0);
        let mut values = vec![default; last_year as usize];
        for &(from_year, value) in steps {
            if from_year == 0 {
                continue;
            }
            for slot in values.iter_mut().skip(from_year as usize - 1) {
                *slot = value;
            }
        }
        let default = steps.last().map(|(_, v)| *v).unwrap_or(default);
        Self { values, default }
    }

    /// Value applicable in the given policy year (1-indexed).
    pub fn value_for(&self, policy_year: u32) -> f64 {
        let idx = (policy_year.max(1) as usize) - 1;
        self.values.get(idx).copied().unwrap_or(self.default)
    }

    /// True when every year resolves to zero.
    pub fn is_zero(&self) -> bool {
        self.default == 0.0 && self.values.iter().all(|v| *v == 0.0)
    }
}

impl Default for YearSchedule {
    fn default() -> Self {
        Self::flat(0.0)
    }
}

/// Inputs available to a product's risk-fee resolver at a payment event.
#[derive(Debug, Clone, Copy)]
pub struct RiskFeeContext {
    /// Policy year of the payment (1-indexed)
    pub policy_year: u32,

    /// Gross payment the premium is deducted from
    pub gross_payment: f64,

    /// Total policy value before the payment
    pub total_value: f64,

    /// Calendar date of the payment
    pub date: NaiveDate,
}

/// Product-specific risk-premium resolver, injected by a product module.
/// The engine caps the resolved premium at the gross payment.
pub type RiskFeeFn = fn(&RiskFeeContext) -> f64;

/// How the risk-insurance premium is determined.
#[derive(Debug, Clone)]
pub enum RiskFeeMode {
    /// No risk component
    None,
    /// Percent of the gross payment, scheduled by policy year
    PaymentPercent(YearSchedule),
    /// Fixed amount per payment
    Fixed(f64),
    /// Product-supplied resolver (age/term-banded tables)
    Custom(RiskFeeFn),
}

impl Default for RiskFeeMode {
    fn default() -> Self {
        RiskFeeMode::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_schedule() {
        let schedule = YearSchedule::flat(0.02);
        assert_eq!(schedule.value_for(1), 0.02);
        assert_eq!(schedule.value_for(40), 0.02);
    }

    #[test]
    fn test_from_years_fallback() {
        let schedule = YearSchedule::from_years(vec![0.60, 0.30, 0.10], 0.0);
        assert_eq!(schedule.value_for(1), 0.60);
        assert_eq!(schedule.value_for(3), 0.10);
        assert_eq!(schedule.value_for(4), 0.0);
        // Year 0 reads the first entry
        assert_eq!(schedule.value_for(0), 0.60);
    }

    #[test]
    fn test_from_steps() {
        let schedule = YearSchedule::from_steps(&[(1, 1.0), (10, 0.0)], 0.0);
        assert_eq!(schedule.value_for(1), 1.0);
        assert_eq!(schedule.value_for(9), 1.0);
        assert_eq!(schedule.value_for(10), 0.0);
        assert_eq!(schedule.value_for(35), 0.0);
    }

    #[test]
    fn test_from_steps_with_leading_default() {
        let schedule = YearSchedule::from_steps(&[(5, 0.005)], 0.0);
        assert_eq!(schedule.value_for(1), 0.0);
        assert_eq!(schedule.value_for(4), 0.0);
        assert_eq!(schedule.value_for(5), 0.005);
        assert_eq!(schedule.value_for(30), 0.005);
    }

    #[test]
    fn test_is_zero() {
        assert!(YearSchedule::default().is_zero());
        assert!(!YearSchedule::flat(0.01).is_zero());
        assert!(!YearSchedule::from_years(vec![0.0, 0.1], 0.0).is_zero());
    }
}
