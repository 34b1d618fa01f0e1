use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One row of the input CSV, before numeric coercion. Column names follow the
/// Sample Superstore convention and are case-sensitive; any extra columns in
/// the file are ignored.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Sales")]
    pub sales: Option<String>,
    #[serde(rename = "Quantity")]
    pub quantity: Option<String>,
    #[serde(rename = "Discount")]
    pub discount: Option<String>,
    #[serde(rename = "Profit")]
    pub profit: Option<String>,
}

/// One transaction, fully typed. Immutable once loaded; the aggregation
/// passes only ever borrow these.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub region: String,
    pub category: String,
    pub sales: f64,
    pub quantity: i64,
    pub discount: f64,
    pub profit: f64,
}

/// Per-category discount comparison: average profit and order count for the
/// discounted and undiscounted partitions. An empty partition reports an
/// average of 0, not NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiscountStats {
    pub with_discount_avg: f64,
    pub count_with_discount: usize,
    pub without_discount_avg: f64,
    pub count_without_discount: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RegionMarginRow {
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "AvgProfitMarginPct")]
    #[tabled(rename = "Avg Profit Margin (%)")]
    pub avg_margin: String,
    #[serde(rename = "Assessment")]
    #[tabled(rename = "Assessment")]
    pub assessment: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DiscountImpactRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "AvgProfitWithDiscount")]
    #[tabled(rename = "Avg Profit (With Discount)")]
    pub with_discount_avg: String,
    #[serde(rename = "CountWithDiscount")]
    #[tabled(rename = "Count (With)")]
    pub count_with_discount: usize,
    #[serde(rename = "ShareWithDiscountPct")]
    #[tabled(rename = "Share (With)")]
    pub share_with_discount: String,
    #[serde(rename = "AvgProfitWithoutDiscount")]
    #[tabled(rename = "Avg Profit (Without Discount)")]
    pub without_discount_avg: String,
    #[serde(rename = "CountWithoutDiscount")]
    #[tabled(rename = "Count (Without)")]
    pub count_without_discount: usize,
    #[serde(rename = "ShareWithoutDiscountPct")]
    #[tabled(rename = "Share (Without)")]
    pub share_without_discount: String,
    #[serde(rename = "Difference")]
    #[tabled(rename = "Difference")]
    pub difference: String,
    #[serde(rename = "Flag")]
    #[tabled(rename = "Flag")]
    pub flag: String,
}

/// A region paired with its average margin, used in the findings rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMargin {
    pub region: String,
    pub margin_pct: f64,
}

/// A category paired with its `without − with` average-profit difference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGap {
    pub category: String,
    pub profit_difference: f64,
}

/// Condensed conclusions derived from the two aggregate mappings. Serialized
/// as the optional JSON summary and rendered as the report's findings block.
#[derive(Debug, Clone, Serialize)]
pub struct Findings {
    pub total_orders: usize,
    pub best_region: Option<RegionMargin>,
    pub worst_region: Option<RegionMargin>,
    pub margin_gap_pct: f64,
    /// Regions with a non-positive average margin, worst first.
    pub loss_regions: Vec<RegionMargin>,
    pub largest_discount_impact: Option<CategoryGap>,
    /// Categories whose discounted orders average a loss, alphabetical.
    pub unprofitable_discount_categories: Vec<String>,
    /// Share of all orders that carried any discount, in percent.
    pub discounted_order_pct: f64,
}
