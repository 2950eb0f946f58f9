use std::path::Path;

use tracing::debug;

use crate::{
    errors::LedgerError,
    ledger::{format_amount, parse_amount},
    utils::persistence::{read_lines, write_lines},
};

use super::aggregation::AggregateReport;

pub const TOTALS_HEADER: &str = "Category,Date,Amount";
pub const GRAND_TOTAL_LABEL: &str = "Grand Total";

/// Overwrites `path` with one `category,date,amount` row per pair and a trailing grand total row.
pub fn persist(report: &AggregateReport, path: &Path) -> Result<(), LedgerError> {
    let mut lines = vec![TOTALS_HEADER.to_string()];
    lines.extend(
        report
            .pairs()
            .map(|(category, date, amount)| format!("{category},{date},{}", format_amount(amount))),
    );
    lines.push(format!(
        "{GRAND_TOTAL_LABEL},,{}",
        format_amount(report.grand_total)
    ));
    write_lines(path, &lines)
}

/// Reads a totals file back.
///
/// Rows with exactly three fields and a numeric amount are kept (a repeated pair
/// replaces the earlier value). Only rows with a non-empty date count toward the
/// grand total, which keeps the trailing grand-total row from being counted twice.
pub fn reload(path: &Path) -> Result<AggregateReport, LedgerError> {
    let mut report = AggregateReport::default();
    for (idx, line) in read_lines(path)?.iter().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        let [category, date, amount] = fields.as_slice() else {
            debug!(line = idx + 1, "skipping totals row with wrong field count");
            continue;
        };
        let amount = match parse_amount(amount) {
            Ok(amount) => amount,
            Err(err) => {
                debug!(line = idx + 1, error = %err, "skipping totals row");
                continue;
            }
        };
        report
            .totals
            .entry(category.to_string())
            .or_default()
            .insert(date.to_string(), amount);
        if !date.is_empty() {
            report.grand_total += amount;
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{ExpenseRecord, Ledger};
    use crate::report::compute_report;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn sample_report() -> AggregateReport {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let ledger = Ledger::from_records([
            ExpenseRecord::new("a", jan, "Food", 10.0).unwrap(),
            ExpenseRecord::new("b", feb, "Food", 2.5).unwrap(),
            ExpenseRecord::new("c", jan, "Travel", 4.0).unwrap(),
        ]);
        compute_report(&ledger).totals
    }

    #[test]
    fn persist_writes_header_pairs_and_grand_total() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("totals.txt");
        persist(&sample_report(), &path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Category,Date,Amount\n\
             Food,2024-01-01,10.0\n\
             Food,2024-02-01,2.5\n\
             Travel,2024-01-01,4.0\n\
             Grand Total,,16.5\n"
        );
    }

    #[test]
    fn reload_recomputes_grand_total_without_double_counting() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("totals.txt");
        persist(&sample_report(), &path).unwrap();

        let loaded = reload(&path).unwrap();
        assert_eq!(loaded.grand_total, 16.5);
        assert_eq!(loaded.amount_for("Food", "2024-02-01"), Some(2.5));
        // The grand total row itself is kept under an empty date.
        assert_eq!(loaded.amount_for(GRAND_TOTAL_LABEL, ""), Some(16.5));
    }

    #[test]
    fn reload_skips_rows_that_do_not_fit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("totals.txt");
        fs::write(
            &path,
            "Category,Date,Amount\nFood,2024-01-01\nFood,2024-01-01,abc\nFood,2024-01-01,3,4\nFood,2024-01-02,7\n",
        )
        .unwrap();
        let loaded = reload(&path).unwrap();
        assert_eq!(loaded.grand_total, 7.0);
        assert_eq!(loaded.pairs().count(), 1);
    }

    #[test]
    fn reload_accepts_padded_grand_total_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("totals.txt");
        fs::write(&path, "Food,2024-01-01,3.0\nGrand Total,, 3.0").unwrap();
        let loaded = reload(&path).unwrap();
        assert_eq!(loaded.grand_total, 3.0);
        assert_eq!(loaded.amount_for(GRAND_TOTAL_LABEL, ""), Some(3.0));
    }

    #[test]
    fn reload_of_missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            reload(&dir.path().join("absent.txt")),
            Err(LedgerError::Io(_))
        ));
    }
}
