use std::path::{Path, PathBuf};

use crate::ledger::Ledger;

/// An authenticated user's working state: the in-memory ledger and where it lives on disk.
#[derive(Debug, Clone)]
pub struct Session {
    username: String,
    expense_path: PathBuf,
    pub(crate) ledger: Ledger,
    pub(crate) view: String,
}

impl Session {
    pub(crate) fn new(username: impl Into<String>, expense_path: PathBuf, ledger: Ledger) -> Self {
        Self {
            username: username.into(),
            expense_path,
            ledger,
            view: String::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn expense_path(&self) -> &Path {
        &self.expense_path
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The report text produced by the most recent recompute.
    pub fn view(&self) -> &str {
        &self.view
    }
}
