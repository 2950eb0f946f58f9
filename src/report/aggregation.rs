use std::collections::BTreeMap;

use crate::ledger::{ExpenseRecord, Ledger};

/// One displayed ledger row together with the cumulative total up to and including it.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningLine {
    pub description: String,
    pub category: String,
    pub date: String,
    pub amount: f64,
    pub running_total: f64,
}

/// Category -> date -> summed amount, plus the grand total.
///
/// Always rebuilt from a ledger snapshot or a totals file, never patched in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateReport {
    pub totals: BTreeMap<String, BTreeMap<String, f64>>,
    pub grand_total: f64,
}

impl AggregateReport {
    pub fn amount_for(&self, category: &str, date: &str) -> Option<f64> {
        self.totals.get(category)?.get(date).copied()
    }

    /// Iterates `(category, date, amount)` in category then date order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.totals.iter().flat_map(|(category, dates)| {
            dates
                .iter()
                .map(move |(date, amount)| (category.as_str(), date.as_str(), *amount))
        })
    }

    pub fn sum_of_pairs(&self) -> f64 {
        self.pairs().map(|(_, _, amount)| amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    fn accumulate(&mut self, record: &ExpenseRecord) {
        *self
            .totals
            .entry(record.category().to_string())
            .or_default()
            .entry(record.date_text())
            .or_insert(0.0) += record.amount();
        self.grand_total += record.amount();
    }
}

/// Per-record running totals and the aggregate derived from one ledger snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerReport {
    pub lines: Vec<RunningLine>,
    pub totals: AggregateReport,
}

/// Walks the ledger in its current order. Reordering the ledger changes every running total.
pub fn compute_report(ledger: &Ledger) -> LedgerReport {
    let mut report = LedgerReport::default();
    for record in ledger.records() {
        report.totals.accumulate(record);
        report.lines.push(RunningLine {
            description: record.description().to_string(),
            category: record.category().to_string(),
            date: record.date_text(),
            amount: record.amount(),
            running_total: report.totals.grand_total,
        });
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(description: &str, category: &str, day: u32, amount: f64) -> ExpenseRecord {
        ExpenseRecord::new(
            description,
            NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            category,
            amount,
        )
        .unwrap()
    }

    #[test]
    fn running_total_tracks_prefix_sums() {
        let ledger = Ledger::from_records([
            record("a", "Food", 1, 10.0),
            record("b", "Travel", 1, 5.5),
            record("c", "Food", 2, 2.25),
        ]);
        let report = compute_report(&ledger);
        let running: Vec<f64> = report.lines.iter().map(|l| l.running_total).collect();
        assert_eq!(running, vec![10.0, 15.5, 17.75]);
        assert_eq!(report.totals.grand_total, 17.75);
    }

    #[test]
    fn running_total_depends_on_order() {
        let mut ledger =
            Ledger::from_records([record("a", "Food", 1, 10.0), record("b", "Food", 1, 1.0)]);
        ledger.sort_by_amount();
        let report = compute_report(&ledger);
        assert_eq!(report.lines[0].running_total, 1.0);
        assert_eq!(report.lines[1].running_total, 11.0);
    }

    #[test]
    fn totals_group_by_category_then_date() {
        let ledger = Ledger::from_records([
            record("a", "Food", 1, 10.0),
            record("b", "Food", 1, 4.0),
            record("c", "food", 1, 1.0),
            record("d", "Food", 3, 2.0),
        ]);
        let totals = compute_report(&ledger).totals;
        assert_eq!(totals.amount_for("Food", "2024-02-01"), Some(14.0));
        assert_eq!(totals.amount_for("Food", "2024-02-03"), Some(2.0));
        assert_eq!(totals.amount_for("food", "2024-02-01"), Some(1.0));
        assert_eq!(totals.sum_of_pairs(), totals.grand_total);
    }

    #[test]
    fn empty_ledger_has_zero_totals() {
        let report = compute_report(&Ledger::new());
        assert!(report.lines.is_empty());
        assert!(report.totals.is_empty());
        assert_eq!(report.totals.grand_total, 0.0);
    }
}
