use std::path::PathBuf;

use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::CredentialStore;
use crate::config::{Config, ConfigManager, StoragePaths};
use crate::core::services::{DeleteOutcome, ExpenseService, ReportService, ServiceResult};
use crate::core::session::Session;
use crate::errors::LedgerError;
use crate::ledger::{Ledger, SortKey};

/// Facade the presentation layer talks to: credentials, ledger persistence, and reporting.
///
/// Every mutation is followed by a full recompute that rewrites the totals file.
/// `add_expense` and `delete_expense` also rewrite the user's expense file.
pub struct ExpenseTracker {
    paths: StoragePaths,
    credentials: CredentialStore,
}

impl ExpenseTracker {
    pub fn new(config: &Config, root: impl Into<PathBuf>) -> Self {
        let paths = config.paths(root);
        let credentials = CredentialStore::new(paths.credentials.clone());
        Self { paths, credentials }
    }

    /// Builds a tracker rooted at the manager's data directory using its stored config.
    pub fn from_config_manager(manager: &ConfigManager) -> Result<Self, LedgerError> {
        let config = manager.load()?;
        Ok(Self::new(&config, manager.base_dir()))
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.credentials.authenticate(username, password)
    }

    pub fn user_exists(&self, username: &str) -> bool {
        self.credentials.exists(username)
    }

    pub fn register(&self, username: &str, password: &str) -> ServiceResult<()> {
        self.credentials.register(username, password)
    }

    /// Authenticates and, on success, opens a session with the user's ledger loaded.
    pub fn login(&self, username: &str, password: &str) -> Option<Session> {
        if !self.authenticate(username, password) {
            info!(username, "login rejected");
            return None;
        }
        let mut session = self.load_ledger(username);
        self.refresh(&mut session);
        Some(session)
    }

    /// Opens a session for `username`, loading whatever parses from the expense file.
    pub fn load_ledger(&self, username: &str) -> Session {
        let path = self.paths.expenses_for(username);
        let ledger = Ledger::load(&path);
        info!(username, records = ledger.len(), "ledger loaded");
        Session::new(username, path, ledger)
    }

    /// Re-reads the expense file, discarding unsaved in-memory changes such as a filter.
    pub fn reload_ledger(&self, session: &mut Session) {
        session.ledger = Ledger::load(session.expense_path());
        self.refresh(session);
    }

    pub fn add_expense(
        &self,
        session: &mut Session,
        description: &str,
        date: &str,
        category: &str,
        amount: &str,
    ) -> ServiceResult<Uuid> {
        let id = ExpenseService::add(&mut session.ledger, description, date, category, amount)?;
        self.refresh(session);
        self.save_ledger(session);
        Ok(id)
    }

    /// Returns `true` when a record was removed.
    pub fn delete_expense(&self, session: &mut Session, selection: &str) -> bool {
        let outcome = ExpenseService::delete(&mut session.ledger, selection);
        if outcome == DeleteOutcome::NotFound {
            return false;
        }
        self.refresh(session);
        self.save_ledger(session);
        true
    }

    pub fn sort_ledger(&self, session: &mut Session, key: SortKey) {
        ExpenseService::sort(&mut session.ledger, key);
        self.refresh(session);
    }

    pub fn filter_ledger(&self, session: &mut Session, category: &str) {
        ExpenseService::filter(&mut session.ledger, category);
        self.refresh(session);
    }

    /// Recomputes the report for the session's ledger and rewrites the totals file.
    pub fn render_report(&self, session: &mut Session) -> String {
        self.refresh(session);
        session.view.clone()
    }

    /// Renders the totals file as it currently exists on disk.
    pub fn loaded_totals(&self) -> Option<String> {
        ReportService::loaded(&self.paths.totals)
    }

    fn refresh(&self, session: &mut Session) {
        session.view = ReportService::refresh(&session.ledger, &self.paths.totals);
    }

    fn save_ledger(&self, session: &Session) {
        if let Err(err) = session.ledger.save(session.expense_path()) {
            warn!(
                username = session.username(),
                error = %err,
                "unable to save expenses"
            );
        }
    }
}
