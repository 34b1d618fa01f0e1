use crate::error::{ReportError, ReportResult};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// Write the fully rendered report, overwriting any existing file. Callers
/// render first and write second, so a failed run never clobbers a previous
/// report.
pub fn write_report(path: &Path, contents: &str) -> ReportResult<()> {
    fs::write(path, contents).map_err(|e| ReportError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> ReportResult<()> {
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s).map_err(|e| ReportError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_report_overwrites_existing_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("report.csv");
        write_report(&path, "first\n").expect("first write");
        write_report(&path, "second\n").expect("second write");
        let contents = fs::read_to_string(&path).expect("read back");
        assert_eq!(contents, "second\n");
    }

    #[test]
    fn write_report_to_unwritable_path_is_a_write_error() {
        let err = write_report(Path::new("no-such-dir/report.csv"), "x").unwrap_err();
        assert!(matches!(err, ReportError::Write { .. }));
    }
}
