use crate::types::{CategoryGap, DiscountStats, Findings, Record, RegionMargin};
use crate::util::average;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Average profit margin (`profit / sales * 100`) per region.
///
/// Records with zero sales contribute no margin but still register their
/// region, so a region whose every order had zero sales is reported with an
/// average of 0 rather than dropped from the mapping.
pub fn profit_margin_by_region(data: &[Record]) -> HashMap<String, f64> {
    let mut margins: HashMap<String, Vec<f64>> = HashMap::new();
    for r in data {
        let entry = margins.entry(r.region.clone()).or_default();
        if r.sales != 0.0 {
            entry.push(r.profit / r.sales * 100.0);
        }
    }
    margins
        .into_iter()
        .map(|(region, values)| {
            let avg = average(&values);
            (region, avg)
        })
        .collect()
}

/// Per-category comparison of average profit for discounted vs undiscounted
/// orders. The partition test is strictly `discount > 0`, so a zero (or
/// negative) discount counts as undiscounted. Every record participates.
pub fn discount_impact_by_category(data: &[Record]) -> HashMap<String, DiscountStats> {
    #[derive(Default)]
    struct Acc {
        with_discount: Vec<f64>,
        without_discount: Vec<f64>,
    }

    let mut map: HashMap<String, Acc> = HashMap::new();
    for r in data {
        let e = map.entry(r.category.clone()).or_default();
        if r.discount > 0.0 {
            e.with_discount.push(r.profit);
        } else {
            e.without_discount.push(r.profit);
        }
    }

    map.into_iter()
        .map(|(category, acc)| {
            let stats = DiscountStats {
                with_discount_avg: average(&acc.with_discount),
                count_with_discount: acc.with_discount.len(),
                without_discount_avg: average(&acc.without_discount),
                count_without_discount: acc.without_discount.len(),
            };
            (category, stats)
        })
        .collect()
}

/// Regions ranked for the report: descending by margin, ties broken
/// alphabetically so repeated runs produce identical output.
pub fn ranked_regions(regional: &HashMap<String, f64>) -> Vec<RegionMargin> {
    let mut regions: Vec<RegionMargin> = regional
        .iter()
        .map(|(region, margin)| RegionMargin {
            region: region.clone(),
            margin_pct: *margin,
        })
        .collect();
    regions.sort_by(|a, b| {
        b.margin_pct
            .partial_cmp(&a.margin_pct)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.region.cmp(&b.region))
    });
    regions
}

/// Roll the two aggregate mappings up into the condensed conclusions used by
/// the findings block, the console summary, and the optional JSON output.
pub fn derive_findings(
    regional: &HashMap<String, f64>,
    impact: &HashMap<String, DiscountStats>,
) -> Findings {
    let ranked = ranked_regions(regional);
    let best_region = ranked.first().cloned();
    let worst_region = ranked.last().cloned();
    let margin_gap_pct = match (&best_region, &worst_region) {
        (Some(best), Some(worst)) => best.margin_pct - worst.margin_pct,
        _ => 0.0,
    };

    let mut loss_regions: Vec<RegionMargin> = ranked
        .iter()
        .filter(|r| r.margin_pct <= 0.0)
        .cloned()
        .collect();
    loss_regions.sort_by(|a, b| {
        a.margin_pct
            .partial_cmp(&b.margin_pct)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.region.cmp(&b.region))
    });

    let mut gaps: Vec<CategoryGap> = impact
        .iter()
        .map(|(category, stats)| CategoryGap {
            category: category.clone(),
            profit_difference: stats.without_discount_avg - stats.with_discount_avg,
        })
        .collect();
    gaps.sort_by(|a, b| {
        b.profit_difference
            .partial_cmp(&a.profit_difference)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    let largest_discount_impact = gaps.first().cloned();

    let mut unprofitable_discount_categories: Vec<String> = impact
        .iter()
        .filter(|(_, stats)| stats.count_with_discount > 0 && stats.with_discount_avg < 0.0)
        .map(|(category, _)| category.clone())
        .collect();
    unprofitable_discount_categories.sort();

    let discounted: usize = impact.values().map(|s| s.count_with_discount).sum();
    let total_orders: usize = impact
        .values()
        .map(|s| s.count_with_discount + s.count_without_discount)
        .sum();
    let discounted_order_pct = if total_orders == 0 {
        0.0
    } else {
        discounted as f64 / total_orders as f64 * 100.0
    };

    Findings {
        total_orders,
        best_region,
        worst_region,
        margin_gap_pct,
        loss_regions,
        largest_discount_impact,
        unprofitable_discount_categories,
        discounted_order_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(region: &str, category: &str, sales: f64, discount: f64, profit: f64) -> Record {
        Record {
            region: region.to_string(),
            category: category.to_string(),
            sales,
            quantity: 1,
            discount,
            profit,
        }
    }

    #[test]
    fn margins_average_per_region() {
        let data = vec![
            record("West", "Furniture", 100.0, 0.0, 10.0),
            record("West", "Furniture", 200.0, 0.0, 20.0),
            record("East", "Furniture", 100.0, 0.0, 5.0),
        ];
        let result = profit_margin_by_region(&data);
        assert_eq!(result.len(), 2);
        assert!((result["West"] - 10.0).abs() < 0.01);
        assert!((result["East"] - 5.0).abs() < 0.01);
    }

    #[test]
    fn zero_sales_records_are_excluded_from_the_average() {
        let data = vec![
            record("North", "Furniture", 0.0, 0.0, 10.0),
            record("North", "Furniture", 100.0, 0.0, 10.0),
        ];
        let result = profit_margin_by_region(&data);
        assert!((result["North"] - 10.0).abs() < 0.01);
    }

    #[test]
    fn region_with_only_zero_sales_is_reported_at_zero() {
        let data = vec![
            record("North", "Furniture", 0.0, 0.0, 10.0),
            record("West", "Furniture", 100.0, 0.0, 10.0),
        ];
        let result = profit_margin_by_region(&data);
        assert_eq!(result.len(), 2);
        assert_eq!(result["North"], 0.0);
    }

    #[test]
    fn negative_profit_yields_negative_margin() {
        let data = vec![record("South", "Furniture", 100.0, 0.0, -20.0)];
        let result = profit_margin_by_region(&data);
        assert!((result["South"] + 20.0).abs() < 0.01);
    }

    #[test]
    fn discount_partitions_are_exclusive_and_exhaustive() {
        let data = vec![
            record("West", "Furniture", 100.0, 0.0, 100.0),
            record("West", "Furniture", 100.0, 0.2, 50.0),
            record("East", "Technology", 100.0, 0.0, 200.0),
        ];
        let result = discount_impact_by_category(&data);
        let furniture = &result["Furniture"];
        assert_eq!(furniture.without_discount_avg, 100.0);
        assert_eq!(furniture.with_discount_avg, 50.0);
        assert_eq!(
            furniture.count_with_discount + furniture.count_without_discount,
            2
        );
        let technology = &result["Technology"];
        assert_eq!(technology.count_with_discount, 0);
        assert_eq!(technology.count_without_discount, 1);
    }

    #[test]
    fn category_with_only_discounted_orders_reports_zero_for_the_other_side() {
        let data = vec![
            record("West", "Office Supplies", 100.0, 0.1, 10.0),
            record("West", "Office Supplies", 100.0, 0.2, 20.0),
        ];
        let result = discount_impact_by_category(&data);
        let office = &result["Office Supplies"];
        assert_eq!(office.count_without_discount, 0);
        assert_eq!(office.without_discount_avg, 0.0);
        assert!((office.with_discount_avg - 15.0).abs() < 0.01);
    }

    #[test]
    fn negative_discount_counts_as_undiscounted() {
        let data = vec![record("West", "Furniture", 100.0, -0.1, 10.0)];
        let result = discount_impact_by_category(&data);
        let furniture = &result["Furniture"];
        assert_eq!(furniture.count_with_discount, 0);
        assert_eq!(furniture.count_without_discount, 1);
    }

    #[test]
    fn negative_profits_propagate_into_partition_averages() {
        let data = vec![
            record("West", "Supplies", 100.0, 0.5, -100.0),
            record("West", "Supplies", 100.0, 0.0, 50.0),
        ];
        let result = discount_impact_by_category(&data);
        let supplies = &result["Supplies"];
        assert_eq!(supplies.with_discount_avg, -100.0);
        assert_eq!(supplies.without_discount_avg, 50.0);
    }

    #[test]
    fn ranked_regions_sort_descending_with_alphabetical_ties() {
        let mut regional = HashMap::new();
        regional.insert("West".to_string(), 10.0);
        regional.insert("North".to_string(), 10.0);
        regional.insert("South".to_string(), -20.0);
        let ranked = ranked_regions(&regional);
        let names: Vec<&str> = ranked.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(names, vec!["North", "West", "South"]);
    }

    #[test]
    fn findings_cover_ranking_losses_and_discount_share() {
        let data = vec![
            record("West", "Furniture", 100.0, 0.0, 10.0),
            record("East", "Furniture", 100.0, 0.2, -5.0),
            record("South", "Technology", 100.0, 0.0, -20.0),
        ];
        let regional = profit_margin_by_region(&data);
        let impact = discount_impact_by_category(&data);
        let findings = derive_findings(&regional, &impact);

        assert_eq!(findings.total_orders, 3);
        assert_eq!(findings.best_region.as_ref().unwrap().region, "West");
        assert_eq!(findings.worst_region.as_ref().unwrap().region, "South");
        assert!((findings.margin_gap_pct - 30.0).abs() < 0.01);
        let losses: Vec<&str> = findings
            .loss_regions
            .iter()
            .map(|r| r.region.as_str())
            .collect();
        assert_eq!(losses, vec!["South", "East"]);
        // Furniture: without avg 10, with avg -5 => difference 15.
        let gap = findings.largest_discount_impact.as_ref().unwrap();
        assert_eq!(gap.category, "Furniture");
        assert!((gap.profit_difference - 15.0).abs() < 0.01);
        assert_eq!(findings.unprofitable_discount_categories, vec!["Furniture"]);
        assert!((findings.discounted_order_pct - 33.33).abs() < 0.01);
    }

    #[test]
    fn findings_on_empty_input_are_inert() {
        let findings = derive_findings(&HashMap::new(), &HashMap::new());
        assert_eq!(findings.total_orders, 0);
        assert!(findings.best_region.is_none());
        assert!(findings.worst_region.is_none());
        assert_eq!(findings.margin_gap_pct, 0.0);
        assert_eq!(findings.discounted_order_pct, 0.0);
    }
}
