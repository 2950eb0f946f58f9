use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    errors::LedgerError,
    utils::persistence::{append_line, read_lines_if_present, read_lines_or_empty},
};

/// Plaintext `username,password` store shared by every user.
///
/// Every call re-reads the file; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff a stored `username,password` row matches both fields exactly.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        for (idx, line) in read_lines_or_empty(&self.path).iter().enumerate() {
            match line.split(',').collect::<Vec<_>>().as_slice() {
                [user, pass] => {
                    if *user == username && *pass == password {
                        return true;
                    }
                }
                _ => debug!(line = idx + 1, "skipping malformed credential row"),
            }
        }
        false
    }

    /// True iff any stored row carries `username` in its first field.
    pub fn exists(&self, username: &str) -> bool {
        has_user(&read_lines_or_empty(&self.path), username)
    }

    pub fn register(&self, username: &str, password: &str) -> Result<(), LedgerError> {
        if username.is_empty() || password.is_empty() {
            return Err(LedgerError::Validation(
                "Please enter both username and password for registration".into(),
            ));
        }
        validate_field("username", username)?;
        validate_field("password", password)?;
        if username.contains(['/', '\\']) || username == "." || username == ".." {
            return Err(LedgerError::Validation(
                "username must not contain path separators".into(),
            ));
        }
        // An unreadable store must not be mistaken for an empty one.
        if has_user(&read_lines_if_present(&self.path)?, username) {
            return Err(LedgerError::DuplicateUser(username.to_string()));
        }
        append_line(&self.path, &format!("{username},{password}"))?;
        info!(username, "registered new user");
        Ok(())
    }
}

fn has_user(lines: &[String], username: &str) -> bool {
    lines.iter().any(|line| line.split(',').next() == Some(username))
}

fn validate_field(name: &str, value: &str) -> Result<(), LedgerError> {
    if value.contains([',', '\n', '\r']) {
        return Err(LedgerError::Validation(format!(
            "{name} must not contain commas or line breaks"
        )));
    }
    Ok(())
}
