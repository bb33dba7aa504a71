//! Unit-Linked System CLI
//!
//! Command-line interface for running a single-policy projection

use std::fs::File;
use std::io::Write;

use unitlinked_system::calendar::format_date;
use unitlinked_system::input::{PaymentFrequency, RawInput};
use unitlinked_system::products::calculate;
use unitlinked_system::yields::YieldSource;

fn main() {
    env_logger::init();

    println!("Unit-Linked System v0.1.0");
    println!("=========================\n");

    // Demo contract: 20-year HUF pension policy, 30,000/month, 3% indexation
    let mut input = RawInput::new("2024-01-01", 20, 360_000.0);
    input.payment_frequency = PaymentFrequency::Monthly;
    input.indexation = 0.03;
    input.yield_source = YieldSource::FlatRate(0.06);
    input.tax_credit_enabled = true;

    let product = "nn_motiva";
    println!("Product: {}", product);
    println!("  Start date: {}", input.start_date);
    println!("  Term: {} years", input.term_years);
    println!("  Yearly payment: {:.0} HUF, indexed at {:.1}%", input.base_payment, input.indexation * 100.0);
    println!("  Tax credit: {}", if input.tax_credit_enabled { "eligible" } else { "not eligible" });
    println!();

    let result = match calculate(product, &input) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Projection failed: {}", err);
            std::process::exit(1);
        }
    };

    // Print yearly table
    println!("Projection Results ({} policy years):", result.years.len());
    println!("{:>4} {:>12} {:>12} {:>12} {:>10} {:>10} {:>14} {:>14}",
        "Year", "Payment", "Interest", "Cost", "Bonus", "TaxCredit", "EndBalance", "Surrender");
    println!("{}", "-".repeat(96));

    for year in &result.years {
        println!("{:>4} {:>12.0} {:>12.0} {:>12.0} {:>10.0} {:>10.0} {:>14.0} {:>14.0}",
            year.policy_year,
            year.payment,
            year.interest,
            year.total_cost(),
            year.bonus,
            year.tax_credit,
            year.end_total_value,
            year.surrender_value,
        );
    }

    // Write monthly rows to CSV
    let csv_path = "projection_output.csv";
    let mut file = File::create(csv_path).expect("Unable to create CSV file");

    writeln!(file, "Month,PolicyYear,MonthEnd,Payment,Interest,Cost,Bonus,TaxCredit,Withdrawal,EndTotal").unwrap();
    for month in &result.months {
        writeln!(file, "{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            month.month_index,
            month.policy_year,
            format_date(month.month_end),
            month.payment,
            month.interest,
            month.cost,
            month.bonus,
            month.tax_credit,
            month.withdrawal,
            month.end_total_value,
        ).unwrap();
    }

    println!("\nMonthly rows written to: {}", csv_path);

    // Full result record as JSON
    let json_path = "projection_output.json";
    let json_file = File::create(json_path).expect("Unable to create JSON file");
    serde_json::to_writer_pretty(json_file, &result).expect("Unable to serialize result");
    println!("Result record written to: {}", json_path);

    // Print summary
    let totals = &result.totals;
    println!("\nSummary:");
    println!("  Total contributions: {:.0}", totals.contributions);
    println!("  Total costs:         {:.0}", totals.costs);
    println!("  Total bonus:         {:.0}", totals.bonus);
    println!("  Total tax credit:    {:.0}", totals.tax_credit);
    println!("  Net interest:        {:.0}", totals.interest_net);
    println!("  End balance:         {:.0}", totals.end_balance);
    println!("  Surrender value:     {:.0}", totals.surrender_value);
}
