//! Yield resolution for the daily loop
//!
//! The engine compounds ledger prices once per simulated day. A yield
//! source is resolved up front into a [`DailyYield`] the loop queries by
//! day index, so the loop body never branches on the source kind.

use serde::{Deserialize, Serialize};

/// Days used to spread an annual rate over daily compounding steps.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Where the daily growth factor comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum YieldSource {
    /// Flat annual rate, compounded daily.
    FlatRate(f64),
    /// Historical fund price series replayed day by day.
    FundReplay(Vec<f64>),
    /// Historical fund price series reduced to one averaged daily factor.
    FundAveraged(Vec<f64>),
}

impl Default for YieldSource {
    fn default() -> Self {
        YieldSource::FlatRate(0.0)
    }
}

/// Per-day growth multipliers resolved from a [`YieldSource`].
#[derive(Debug, Clone)]
pub enum DailyYield {
    /// The same factor every day.
    Constant(f64),
    /// One factor per day; 1.0 once the series is exhausted.
    Series(Vec<f64>),
}

impl DailyYield {
    /// Resolve a yield source into per-day factors.
    pub fn resolve(source: &YieldSource) -> Self {
        match source {
            YieldSource::FlatRate(annual) => DailyYield::Constant(daily_factor(*annual)),
            YieldSource::FundReplay(prices) => {
                let factors = prices
                    .windows(2)
                    .map(|w| {
                        if w[0] > 0.0 && w[1] > 0.0 {
                            w[1] / w[0]
                        } else {
                            1.0
                        }
                    })
                    .collect();
                DailyYield::Series(factors)
            }
            YieldSource::FundAveraged(prices) => {
                DailyYield::Constant(averaged_daily_factor(prices))
            }
        }
    }

    /// Growth factor for the given day index (0-based).
    pub fn factor_for_day(&self, day: usize) -> f64 {
        match self {
            DailyYield::Constant(f) => *f,
            DailyYield::Series(factors) => factors.get(day).copied().unwrap_or(1.0),
        }
    }
}

/// Daily compounding factor equivalent to an annual rate.
pub fn daily_factor(annual_rate: f64) -> f64 {
    let base = 1.0 + annual_rate;
    if base <= 0.0 || !base.is_finite() {
        return 1.0;
    }
    base.powf(1.0 / DAYS_PER_YEAR)
}

/// Single daily factor that reproduces a price series' total growth.
fn averaged_daily_factor(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 1.0;
    }
    let first = prices[0];
    let last = prices[prices.len() - 1];
    if first <= 0.0 || last <= 0.0 {
        return 1.0;
    }
    let ratio = last / first;
    if !ratio.is_finite() {
        return 1.0;
    }
    ratio.powf(1.0 / (prices.len() - 1) as f64)
}
