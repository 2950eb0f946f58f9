use assert_fs::prelude::*;
use expense_ledger::{auth::CredentialStore, LedgerError};
use predicates::str::contains;

#[test]
fn duplicate_registration_is_rejected_without_appending() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("credentials.txt");
    file.write_str("alice,secret\n").unwrap();

    let store = CredentialStore::new(file.path());
    let err = store.register("alice", "other").unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateUser(ref name) if name == "alice"));

    file.assert("alice,secret\n");
}

#[test]
fn registration_appends_one_row() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("credentials.txt");
    file.write_str("alice,secret\n").unwrap();

    let store = CredentialStore::new(file.path());
    store.register("bob", "hunter2").unwrap();

    file.assert("alice,secret\nbob,hunter2\n");
    assert!(store.authenticate("bob", "hunter2"));
    assert!(store.authenticate("alice", "secret"));
}

#[test]
fn first_registration_creates_the_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("credentials.txt");
    file.assert(predicates::path::missing());

    CredentialStore::new(file.path()).register("zoe", "pw").unwrap();
    file.assert(contains("zoe,pw"));
}

#[test]
fn exists_matches_usernames_exactly() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("credentials.txt");
    file.write_str("alice,secret\nlegacy\n").unwrap();

    let store = CredentialStore::new(file.path());
    assert!(store.exists("alice"));
    assert!(!store.exists("Alice"));
    assert!(!store.exists("ali"));
    // A row without a password still reserves the name.
    assert!(store.exists("legacy"));
    assert!(!store.authenticate("legacy", ""));
}

#[test]
fn passwords_compare_exactly() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("credentials.txt");
    file.write_str("alice,secret\n").unwrap();

    let store = CredentialStore::new(file.path());
    assert!(!store.authenticate("alice", "secret "));
    assert!(!store.authenticate("alice", ""));
    assert!(!store.authenticate("", "secret"));
}

#[test]
fn undecodable_row_does_not_hide_existing_users() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("credentials.txt");
    file.write_binary(b"alice,secret\nb\xffob,pw\n").unwrap();

    let store = CredentialStore::new(file.path());
    assert!(store.exists("alice"));
    assert!(store.authenticate("alice", "secret"));
    assert!(matches!(
        store.register("alice", "other"),
        Err(LedgerError::DuplicateUser(_))
    ));
    assert_eq!(
        std::fs::read(file.path()).unwrap(),
        b"alice,secret\nb\xffob,pw\n"
    );
}
