use std::fmt::Write;

use crate::ledger::format_amount;

use super::aggregation::{AggregateReport, LedgerReport};

const TOTALS_HEADING: &str = "Total Amount for Each Category and Date";

/// Renders the running-total table, the category/date totals, and the grand total.
///
/// Per-record amounts are printed unrounded; aggregate amounts use two decimals.
pub fn render(report: &LedgerReport) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        "Description",
        "Category",
        "Date",
        "Amount",
        "Running Total",
    );
    for line in &report.lines {
        push_row(
            &mut out,
            &line.description,
            &line.category,
            &line.date,
            &format!("RS {}", format_amount(line.amount)),
            &format!("RS {}", format_amount(line.running_total)),
        );
    }

    let _ = write!(out, "\n{TOTALS_HEADING}:\n");
    push_totals(&mut out, &report.totals);
    let _ = write!(out, "\nGrand Total: RS {:.2}\n", report.totals.grand_total);
    out
}

/// Renders totals that were read back from a totals file.
pub fn render_loaded(report: &AggregateReport) -> String {
    let mut out = String::new();
    let _ = write!(out, "\n{TOTALS_HEADING} (Loaded from File):\n");
    push_totals(&mut out, report);
    let _ = write!(out, "\nLoaded Grand Total: RS {:.2}\n", report.grand_total);
    out
}

fn push_row(
    out: &mut String,
    description: &str,
    category: &str,
    date: &str,
    amount: &str,
    running: &str,
) {
    let _ = writeln!(
        out,
        "{:<20} {:<15} {:<15} {:<15} {:<10}",
        description, category, date, amount, running
    );
}

fn push_totals(out: &mut String, report: &AggregateReport) {
    for (category, dates) in &report.totals {
        let _ = writeln!(out, "{:<15}", category);
        for (date, amount) in dates {
            let _ = writeln!(out, "  {:<15}: RS {:.2}", date, amount);
        }
    }
}
