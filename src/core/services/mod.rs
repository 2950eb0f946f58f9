pub mod expense_service;
pub mod report_service;

pub use expense_service::{DeleteOutcome, ExpenseService};
pub use report_service::ReportService;

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, LedgerError>;
