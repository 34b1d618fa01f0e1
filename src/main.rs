//! CLI entry point: runs the Load → Aggregate → Render pipeline once,
//! narrating progress and printing a condensed summary to the console.
use anyhow::Result;
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use superstore_report::report::ReportFormat;
use superstore_report::types::{DiscountStats, Findings};
use superstore_report::{analysis, loader, output, report, util};

#[derive(Parser)]
#[command(name = "superstore_report")]
#[command(
    about = "Regional profitability and discount-impact reporting for Superstore transaction exports",
    long_about = None
)]
struct Cli {
    /// Transaction CSV to analyze
    #[arg(value_name = "INPUT", default_value = "SampleSuperstore.csv")]
    input: PathBuf,

    /// File the report is written to (overwritten if present)
    #[arg(short, long, default_value = "analysis_results.csv")]
    output: PathBuf,

    /// Report surface: sectioned delimited table or narrative text
    #[arg(long, value_enum, default_value = "csv")]
    format: ReportFormat,

    /// Also write the findings as pretty-printed JSON
    #[arg(long, value_name = "PATH")]
    summary_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("Loading data from {}...", cli.input.display());
    let data = loader::load_records(&cli.input)?;
    println!(
        "Successfully loaded {} records\n",
        util::format_int(data.len() as i64)
    );

    println!("Calculating regional profit margins...");
    let regional = analysis::profit_margin_by_region(&data);
    println!("Analyzing discount impact on profitability...\n");
    let impact = analysis::discount_impact_by_category(&data);
    let findings = analysis::derive_findings(&regional, &impact);

    println!("Writing results to {}...", cli.output.display());
    let rendered = report::render(cli.format, &regional, &impact, &findings)?;
    output::write_report(&cli.output, &rendered)?;
    println!("Results successfully written to {}\n", cli.output.display());

    if let Some(path) = &cli.summary_json {
        output::write_json(path, &findings)?;
        println!("Findings summary written to {}\n", path.display());
    }

    print_summary(&regional, &impact, &findings);
    Ok(())
}

fn print_summary(
    regional: &HashMap<String, f64>,
    impact: &HashMap<String, DiscountStats>,
    findings: &Findings,
) {
    let banner = "=".repeat(60);
    println!("{}", banner);
    println!("ANALYSIS SUMMARY");
    println!("{}\n", banner);

    println!("Regional Profit Margins:");
    output::preview_table_rows(&report::regional_rows(regional), usize::MAX);

    println!("Discount Impact by Category:");
    output::preview_table_rows(&report::discount_rows(impact), usize::MAX);

    match (&findings.best_region, &findings.worst_region) {
        (Some(best), Some(worst)) => {
            println!(
                "Best region: {} ({:.2}%); worst region: {} ({:.2}%); gap {:.2} pts",
                best.region,
                best.margin_pct,
                worst.region,
                worst.margin_pct,
                findings.margin_gap_pct
            );
        }
        _ => println!("No regions found in input."),
    }
    println!(
        "{:.2}% of {} orders carried a discount",
        findings.discounted_order_pct,
        util::format_int(findings.total_orders as i64)
    );
    println!("\n{}", banner);
    println!("Analysis complete!");
    println!("{}", banner);
}
