//! Run the same contract through every configured product and compare
//! term totals side by side
//!
//! Usage: cargo run --bin compare_products -- --term-years 20 --base-payment 360000

use std::fs::File;
use std::io::Write;

use anyhow::Context;
use clap::Parser;
use rayon::prelude::*;

use unitlinked_system::input::loader::load_price_series;
use unitlinked_system::input::RawInput;
use unitlinked_system::products::{calculate, ProductId};
use unitlinked_system::projection::ProjectionResult;
use unitlinked_system::yields::YieldSource;

#[derive(Parser, Debug)]
#[command(about = "Compare configured products on one contract")]
struct Args {
    /// Contract start date, YYYY-MM-DD
    #[arg(long, default_value = "2024-01-01")]
    start_date: String,

    /// Term length in whole policy years
    #[arg(long, default_value_t = 20)]
    term_years: u32,

    /// First-year yearly payment
    #[arg(long, default_value_t = 360_000.0)]
    base_payment: f64,

    /// Annual indexation of the yearly payment (fraction)
    #[arg(long, default_value_t = 0.0)]
    indexation: f64,

    /// Flat annual yield assumption (fraction)
    #[arg(long, default_value_t = 0.06)]
    annual_yield: f64,

    /// CSV with a historical fund price series; replayed day by day
    /// instead of the flat yield when given
    #[arg(long)]
    fund_prices: Option<std::path::PathBuf>,

    /// Project the contract as tax-credit eligible
    #[arg(long)]
    tax_credit: bool,

    /// Output CSV path
    #[arg(long, default_value = "product_comparison.csv")]
    output: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut input = RawInput::new(&args.start_date, args.term_years, args.base_payment);
    input.indexation = args.indexation;
    input.yield_source = match &args.fund_prices {
        Some(path) => {
            let prices = load_price_series(path)
                .map_err(|e| anyhow::anyhow!("failed to load {}: {}", path.display(), e))?;
            YieldSource::FundReplay(prices)
        }
        None => YieldSource::FlatRate(args.annual_yield),
    };
    input.tax_credit_enabled = args.tax_credit;

    println!("Comparing {} products over {} years...", ProductId::ALL.len(), args.term_years);

    // Registry dispatch cannot fail for registered ids, so the error arm
    // only guards against a registry/module mismatch.
    let results: Vec<(ProductId, ProjectionResult)> = ProductId::ALL
        .par_iter()
        .map(|&id| {
            let result = calculate(id.key(), &input)
                .with_context(|| format!("projection failed for {}", id.key()))?;
            Ok((id, result))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    println!("\n{:<22} {:>14} {:>12} {:>10} {:>10} {:>14} {:>14}",
        "Product", "Contributions", "Costs", "Bonus", "TaxCredit", "EndBalance", "Surrender");
    println!("{}", "-".repeat(102));

    for (id, result) in &results {
        let t = &result.totals;
        println!("{:<22} {:>14.0} {:>12.0} {:>10.0} {:>10.0} {:>14.0} {:>14.0}",
            id.display_name(),
            t.contributions,
            t.costs,
            t.bonus,
            t.tax_credit,
            t.end_balance,
            t.surrender_value,
        );
    }

    let mut file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output))?;
    writeln!(file, "Product,Contributions,Costs,Bonus,TaxCredit,RiskCost,AssetBasedCost,Withdrawals,NetInterest,EndBalance,SurrenderValue")?;
    for (id, result) in &results {
        let t = &result.totals;
        writeln!(file, "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            id.key(),
            t.contributions,
            t.costs,
            t.bonus,
            t.tax_credit,
            t.risk_cost,
            t.asset_based_cost,
            t.withdrawals,
            t.interest_net,
            t.end_balance,
            t.surrender_value,
        )?;
    }

    println!("\nComparison written to: {}", args.output);
    Ok(())
}
