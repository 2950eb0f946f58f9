//! Expense records, the per-user ledger, and the expense-file codec.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod record;

pub use ledger::{Ledger, LedgerEntry, SortKey};
pub use record::{format_amount, parse_amount, parse_date, ExpenseRecord, DATE_FORMAT};
