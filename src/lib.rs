#![doc(test(attr(deny(warnings))))]

//! Expense Ledger records dated, categorised expenses per user in flat files and
//! derives running totals, per-category/per-date sums, and a grand total.

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod report;
pub mod utils;

pub use crate::core::{ExpenseTracker, Session};
pub use errors::LedgerError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Expense Ledger tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
