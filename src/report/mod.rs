//! Running totals, category/date aggregation, rendering, and the totals file.

pub mod aggregation;
pub mod render;
pub mod totals;

pub use aggregation::{compute_report, AggregateReport, LedgerReport, RunningLine};
pub use render::{render, render_loaded};
pub use totals::{persist, reload, GRAND_TOTAL_LABEL, TOTALS_HEADER};
