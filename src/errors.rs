use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),
    #[error("Username `{0}` already exists. Please choose a different username.")]
    DuplicateUser(String),
    #[error("Invalid date or amount format: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl LedgerError {
    /// True for errors that describe bad user input rather than an environment failure.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            LedgerError::Validation(_) | LedgerError::DuplicateUser(_) | LedgerError::Parse(_)
        )
    }
}
