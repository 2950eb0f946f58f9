//! Business logic helpers for ledger mutations driven by user input.

use uuid::Uuid;

use crate::ledger::{ExpenseRecord, Ledger, SortKey};

use super::ServiceResult;

/// How a delete request was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    ById(ExpenseRecord),
    ByDescription(ExpenseRecord),
    NotFound,
}

impl DeleteOutcome {
    pub fn removed(&self) -> Option<&ExpenseRecord> {
        match self {
            DeleteOutcome::ById(record) | DeleteOutcome::ByDescription(record) => Some(record),
            DeleteOutcome::NotFound => None,
        }
    }
}

pub struct ExpenseService;

impl ExpenseService {
    /// Validates the raw fields, appends the record, and returns its identifier.
    pub fn add(
        ledger: &mut Ledger,
        description: &str,
        date: &str,
        category: &str,
        amount: &str,
    ) -> ServiceResult<Uuid> {
        let record = ExpenseRecord::parse(description, date, category, amount)?;
        Ok(ledger.add(record))
    }

    /// Removes one record, addressed by id when `selection` names one, otherwise by the
    /// first description that prefixes the selection text.
    pub fn delete(ledger: &mut Ledger, selection: &str) -> DeleteOutcome {
        if let Some(id) = ledger.resolve_id(selection) {
            if let Some(record) = ledger.remove_by_id(id) {
                return DeleteOutcome::ById(record);
            }
        }
        match ledger.remove_matching(selection) {
            Some(record) => DeleteOutcome::ByDescription(record),
            None => DeleteOutcome::NotFound,
        }
    }

    pub fn sort(ledger: &mut Ledger, key: SortKey) {
        ledger.sort(key);
    }

    pub fn filter(ledger: &mut Ledger, category: &str) {
        ledger.filter_by_category(category);
    }
}
