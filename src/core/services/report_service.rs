use std::path::Path;

use tracing::warn;

use crate::ledger::Ledger;
use crate::report::{compute_report, persist, reload, render, render_loaded};

pub struct ReportService;

impl ReportService {
    /// Rebuilds the report from scratch, writes the totals file, and returns the rendered text.
    ///
    /// A failed totals write is logged and otherwise ignored.
    pub fn refresh(ledger: &Ledger, totals_path: &Path) -> String {
        let report = compute_report(ledger);
        if let Err(err) = persist(&report.totals, totals_path) {
            warn!(path = %totals_path.display(), error = %err, "unable to persist totals");
        }
        render(&report)
    }

    /// Renders whatever the totals file currently holds, or `None` when it cannot be read.
    pub fn loaded(totals_path: &Path) -> Option<String> {
        match reload(totals_path) {
            Ok(report) => Some(render_loaded(&report)),
            Err(err) => {
                warn!(path = %totals_path.display(), error = %err, "unable to reload totals");
                None
            }
        }
    }
}
