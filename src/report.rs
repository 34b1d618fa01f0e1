// Report rendering.
//
// The renderer consumes the two aggregate mappings (plus the findings rollup
// derived from them) and produces the full report as a string. It sorts and
// formats; it never mutates its inputs or recomputes aggregates. The file is
// only written after rendering succeeds, so a failed run leaves any previous
// report untouched.
use crate::analysis::ranked_regions;
use crate::error::{ReportError, ReportResult};
use crate::types::{DiscountImpactRow, DiscountStats, Findings, RegionMarginRow};
use crate::util::format_number;
use clap::ValueEnum;
use std::collections::HashMap;

/// The two report surfaces the original tool shipped as separate scripts:
/// a sectioned delimited table and a narrative text rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Csv,
    Text,
}

const REPORT_TITLE: &str = "Analysis Results for Sample Superstore Dataset";
const DISCOUNT_LOSS_FLAG: &str = "Discounted loss";

fn assess_margin(margin_pct: f64) -> &'static str {
    if margin_pct > 15.0 {
        "Strong"
    } else if margin_pct > 0.0 {
        "Moderate"
    } else {
        "Loss"
    }
}

fn money(amount: f64) -> String {
    format!("${}", format_number(amount, 2))
}

/// Regional section rows, ranked descending by margin.
pub fn regional_rows(regional: &HashMap<String, f64>) -> Vec<RegionMarginRow> {
    ranked_regions(regional)
        .into_iter()
        .map(|r| RegionMarginRow {
            region: r.region,
            avg_margin: format!("{:.2}", r.margin_pct),
            assessment: assess_margin(r.margin_pct).to_string(),
        })
        .collect()
}

/// Discount section rows, one per category in alphabetical order. Partition
/// shares are derived from the stored counts.
pub fn discount_rows(impact: &HashMap<String, DiscountStats>) -> Vec<DiscountImpactRow> {
    let mut categories: Vec<&String> = impact.keys().collect();
    categories.sort();
    categories
        .into_iter()
        .map(|category| {
            let stats = &impact[category];
            let total = stats.count_with_discount + stats.count_without_discount;
            let share = |count: usize| {
                if total == 0 {
                    "0.0%".to_string()
                } else {
                    format!("{:.1}%", count as f64 / total as f64 * 100.0)
                }
            };
            let difference = stats.without_discount_avg - stats.with_discount_avg;
            DiscountImpactRow {
                category: category.clone(),
                with_discount_avg: money(stats.with_discount_avg),
                count_with_discount: stats.count_with_discount,
                share_with_discount: share(stats.count_with_discount),
                without_discount_avg: money(stats.without_discount_avg),
                count_without_discount: stats.count_without_discount,
                share_without_discount: share(stats.count_without_discount),
                difference: money(difference),
                flag: if stats.count_with_discount > 0 && stats.with_discount_avg < 0.0 {
                    DISCOUNT_LOSS_FLAG.to_string()
                } else {
                    String::new()
                },
            }
        })
        .collect()
}

/// Render the full report in the requested format.
pub fn render(
    format: ReportFormat,
    regional: &HashMap<String, f64>,
    impact: &HashMap<String, DiscountStats>,
    findings: &Findings,
) -> ReportResult<String> {
    match format {
        ReportFormat::Csv => render_csv(regional, impact, findings),
        ReportFormat::Text => Ok(render_text(regional, impact, findings)),
    }
}

/// Run `build` against a fresh flexible CSV writer and return the section as
/// a string. Sections have different widths, hence the per-section writer.
fn section_to_string<F>(build: F) -> ReportResult<String>
where
    F: FnOnce(&mut csv::Writer<&mut Vec<u8>>) -> csv::Result<()>,
{
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(&mut buf);
        build(&mut wtr).map_err(ReportError::Render)?;
        wtr.flush()
            .map_err(|e| ReportError::Render(csv::Error::from(e)))?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn render_csv(
    regional: &HashMap<String, f64>,
    impact: &HashMap<String, DiscountStats>,
    findings: &Findings,
) -> ReportResult<String> {
    let regional_section = section_to_string(|wtr| {
        wtr.write_record(["Regional Profitability Analysis"])?;
        wtr.write_record(["Region", "Average Profit Margin (%)", "Assessment"])?;
        for row in regional_rows(regional) {
            wtr.write_record([
                row.region.as_str(),
                row.avg_margin.as_str(),
                row.assessment.as_str(),
            ])?;
        }
        Ok(())
    })?;

    let discount_section = section_to_string(|wtr| {
        wtr.write_record(["Discount Impact Analysis by Category"])?;
        wtr.write_record([
            "Category",
            "Avg Profit (With Discount)",
            "Count (With Discount)",
            "Share (With Discount)",
            "Avg Profit (Without Discount)",
            "Count (Without Discount)",
            "Share (Without Discount)",
            "Difference",
            "Flag",
        ])?;
        for row in discount_rows(impact) {
            wtr.write_record([
                row.category.as_str(),
                row.with_discount_avg.as_str(),
                row.count_with_discount.to_string().as_str(),
                row.share_with_discount.as_str(),
                row.without_discount_avg.as_str(),
                row.count_without_discount.to_string().as_str(),
                row.share_without_discount.as_str(),
                row.difference.as_str(),
                row.flag.as_str(),
            ])?;
        }
        Ok(())
    })?;

    let findings_section = section_to_string(|wtr| {
        wtr.write_record(["Key Findings"])?;
        match &findings.best_region {
            Some(best) => wtr.write_record([
                "Best Region",
                best.region.as_str(),
                format!("{:.2}", best.margin_pct).as_str(),
            ])?,
            None => wtr.write_record(["Best Region", "n/a"])?,
        }
        match &findings.worst_region {
            Some(worst) => wtr.write_record([
                "Worst Region",
                worst.region.as_str(),
                format!("{:.2}", worst.margin_pct).as_str(),
            ])?,
            None => wtr.write_record(["Worst Region", "n/a"])?,
        }
        wtr.write_record([
            "Margin Gap (pts)",
            format!("{:.2}", findings.margin_gap_pct).as_str(),
        ])?;
        wtr.write_record([
            "Regions Operating at a Loss",
            join_or_none(findings.loss_regions.iter().map(|r| r.region.as_str())).as_str(),
        ])?;
        match &findings.largest_discount_impact {
            Some(gap) => wtr.write_record([
                "Largest Discount Impact",
                gap.category.as_str(),
                money(gap.profit_difference).as_str(),
            ])?,
            None => wtr.write_record(["Largest Discount Impact", "n/a"])?,
        }
        wtr.write_record([
            "Unprofitable When Discounted",
            join_or_none(
                findings
                    .unprofitable_discount_categories
                    .iter()
                    .map(String::as_str),
            )
            .as_str(),
        ])?;
        wtr.write_record([
            "Orders With Any Discount (%)",
            format!("{:.2}", findings.discounted_order_pct).as_str(),
        ])?;
        Ok(())
    })?;

    let mut out = String::new();
    out.push_str(REPORT_TITLE);
    out.push_str("\n\n");
    out.push_str(&regional_section);
    out.push_str("\n\n");
    out.push_str(&discount_section);
    out.push_str("\n\n");
    out.push_str(&findings_section);
    Ok(out)
}

fn render_text(
    regional: &HashMap<String, f64>,
    impact: &HashMap<String, DiscountStats>,
    findings: &Findings,
) -> String {
    let banner = "=".repeat(60);
    let mut out = String::new();
    out.push_str(&banner);
    out.push('\n');
    out.push_str(REPORT_TITLE);
    out.push('\n');
    out.push_str(&banner);
    out.push_str("\n\n");

    out.push_str("Regional Profitability (ranked by average margin)\n\n");
    for row in regional_rows(regional) {
        out.push_str(&format!(
            "  {:<16} {:>8}%  [{}]\n",
            row.region, row.avg_margin, row.assessment
        ));
    }
    out.push('\n');

    out.push_str("Discount Impact by Category\n\n");
    for row in discount_rows(impact) {
        out.push_str(&format!("  {}:\n", row.category));
        out.push_str(&format!(
            "    With Discount:    {:>12} (n={}, {} of orders)\n",
            row.with_discount_avg, row.count_with_discount, row.share_with_discount
        ));
        out.push_str(&format!(
            "    Without Discount: {:>12} (n={}, {} of orders)\n",
            row.without_discount_avg, row.count_without_discount, row.share_without_discount
        ));
        out.push_str(&format!("    Difference:       {:>12}\n", row.difference));
        if !row.flag.is_empty() {
            out.push_str("    Warning: discounted orders average a loss\n");
        }
        out.push('\n');
    }

    out.push_str("Key Findings\n\n");
    match &findings.best_region {
        Some(best) => out.push_str(&format!(
            "  Best region:  {} ({:.2}%)\n",
            best.region, best.margin_pct
        )),
        None => out.push_str("  Best region:  n/a\n"),
    }
    match &findings.worst_region {
        Some(worst) => out.push_str(&format!(
            "  Worst region: {} ({:.2}%)\n",
            worst.region, worst.margin_pct
        )),
        None => out.push_str("  Worst region: n/a\n"),
    }
    out.push_str(&format!(
        "  Margin gap:   {:.2} points\n",
        findings.margin_gap_pct
    ));
    out.push_str(&format!(
        "  Regions operating at a loss: {}\n",
        join_or_none(findings.loss_regions.iter().map(|r| r.region.as_str()))
    ));
    match &findings.largest_discount_impact {
        Some(gap) => out.push_str(&format!(
            "  Largest discount impact: {} ({} lower with discount)\n",
            gap.category,
            money(gap.profit_difference)
        )),
        None => out.push_str("  Largest discount impact: n/a\n"),
    }
    out.push_str(&format!(
        "  Unprofitable when discounted: {}\n",
        join_or_none(
            findings
                .unprofitable_discount_categories
                .iter()
                .map(String::as_str)
        )
    ));
    out.push_str(&format!(
        "  Orders with any discount: {:.2}% of {}\n",
        findings.discounted_order_pct,
        crate::util::format_int(findings.total_orders as i64)
    ));
    out.push_str(&banner);
    out.push('\n');
    out
}

fn join_or_none<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let joined: Vec<&str> = items.collect();
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined.join("; ")
    }
}
