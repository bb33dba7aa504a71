//! CSV loader for historical fund price series
//!
//! Expects a two-column file `date,price`; only the price column feeds the
//! yield resolver, which consumes the series wholesale.

use std::error::Error;
use std::fs::File;
use std::path::Path;

/// Load a daily fund price series from a CSV file.
///
/// Non-positive prices are kept as-is; the yield resolver guards them when
/// deriving daily factors.
pub fn load_price_series(path: &Path) -> Result<Vec<f64>, Box<dyn Error>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut prices = Vec::new();
    for result in reader.records() {
        let record = result?;
        let field = record.get(1).ok_or("missing price column")?;
        let price: f64 = field.parse()?;
        prices.push(price);
    }

    Ok(prices)
}
