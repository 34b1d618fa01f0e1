use crate::error::{ReportError, ReportResult};
use crate::types::{RawRow, Record};
use crate::util::{parse_f64_safe, parse_i64_safe};
use csv::ReaderBuilder;
use std::path::Path;

/// Columns that must be present in the header, matched case-sensitively.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Region",
    "Category",
    "Sales",
    "Quantity",
    "Discount",
    "Profit",
];

/// Read the transaction CSV at `path` into typed records, preserving input
/// order.
///
/// The header is validated up front: a missing required column aborts before
/// any row is parsed. Numeric coercion is strict; the first unparseable
/// `Sales`/`Quantity`/`Discount`/`Profit` value aborts the run with the
/// 1-based data row number and the offending value. Columns beyond the
/// required six are ignored.
pub fn load_records(path: &Path) -> ReportResult<Vec<Record>> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| ReportError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

    let headers = rdr
        .headers()
        .map_err(|e| ReportError::Read {
            path: path.to_path_buf(),
            source: e,
        })?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ReportError::MissingColumn {
                column,
                path: path.to_path_buf(),
            });
        }
    }

    let parse_error = |row: usize, column: &'static str, value: &Option<String>| {
        ReportError::Parse {
            path: path.to_path_buf(),
            row,
            column,
            value: value.clone().unwrap_or_default(),
        }
    };

    let mut records = Vec::new();
    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        let row_no = idx + 1;
        let row = result.map_err(|e| ReportError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let sales = parse_f64_safe(row.sales.as_deref())
            .ok_or_else(|| parse_error(row_no, "Sales", &row.sales))?;
        let quantity = parse_i64_safe(row.quantity.as_deref())
            .ok_or_else(|| parse_error(row_no, "Quantity", &row.quantity))?;
        let discount = parse_f64_safe(row.discount.as_deref())
            .ok_or_else(|| parse_error(row_no, "Discount", &row.discount))?;
        let profit = parse_f64_safe(row.profit.as_deref())
            .ok_or_else(|| parse_error(row_no, "Profit", &row.profit))?;

        records.push(Record {
            region: row.region.unwrap_or_default(),
            category: row.category.unwrap_or_default(),
            sales,
            quantity,
            discount,
            profit,
        });
    }

    Ok(records)
}
