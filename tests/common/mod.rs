#![allow(dead_code)]

use expense_ledger::{config::Config, ExpenseTracker};
use tempfile::TempDir;

/// Creates a tracker backed by a fresh data directory. Keep the guard alive for the test.
pub fn setup_test_env() -> (TempDir, ExpenseTracker) {
    let temp = TempDir::new().expect("create temp dir");
    let tracker = ExpenseTracker::new(&Config::default(), temp.path());
    (temp, tracker)
}

/// Registers `username` and returns a logged-in session.
pub fn logged_in(tracker: &ExpenseTracker, username: &str) -> expense_ledger::Session {
    tracker.register(username, "pw").expect("register user");
    tracker.login(username, "pw").expect("login after register")
}
