use std::{cmp::Ordering, fmt, path::Path, str::FromStr};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    errors::LedgerError,
    utils::persistence::{read_lines, read_lines_or_empty, write_lines},
};

use super::record::ExpenseRecord;

/// Minimum number of hex digits accepted when a record is addressed by a shortened id.
const SHORT_ID_LEN: usize = 8;

/// A record plus the identifier assigned to it when it entered the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub record: ExpenseRecord,
}

impl LedgerEntry {
    fn new(record: ExpenseRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
        }
    }

    pub fn short_id(&self) -> String {
        let mut short = self.id.simple().to_string();
        short.truncate(SHORT_ID_LEN);
        short
    }
}

/// Keys the ledger can be reordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Amount,
    Category,
}

impl SortKey {
    fn compare(self, a: &ExpenseRecord, b: &ExpenseRecord) -> Ordering {
        match self {
            SortKey::Date => a.date().cmp(&b.date()),
            SortKey::Amount => a.amount().total_cmp(&b.amount()),
            SortKey::Category => a.category().cmp(b.category()),
        }
    }
}

impl FromStr for SortKey {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            "category" => Ok(SortKey::Category),
            other => Err(LedgerError::Validation(format!(
                "unknown sort key `{other}` (use date, amount, or category)"
            ))),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Date => "date",
            SortKey::Amount => "amount",
            SortKey::Category => "category",
        };
        f.write_str(name)
    }
}

/// Ordered expense records belonging to one user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = ExpenseRecord>) -> Self {
        Self {
            entries: records.into_iter().map(LedgerEntry::new).collect(),
        }
    }

    /// Loads an expense file, skipping rows that fail to parse.
    ///
    /// An unreadable or missing file yields an empty ledger.
    pub fn load(path: &Path) -> Self {
        Self::from_lines(read_lines_or_empty(path), path)
    }

    /// Like [`Ledger::load`] but surfaces I/O failures. Malformed rows are still skipped.
    pub fn read(path: &Path) -> Result<Self, LedgerError> {
        Ok(Self::from_lines(read_lines(path)?, path))
    }

    fn from_lines(lines: Vec<String>, path: &Path) -> Self {
        let mut ledger = Self::new();
        for (idx, line) in lines.iter().enumerate() {
            match ExpenseRecord::from_line(line) {
                Ok(record) => {
                    ledger.add(record);
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        line = idx + 1,
                        error = %err,
                        "skipping unparsable expense row"
                    );
                }
            }
        }
        debug!(path = %path.display(), records = ledger.len(), "ledger loaded");
        ledger
    }

    /// Overwrites `path` with the records in their current order.
    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        let lines: Vec<String> = self.records().map(ExpenseRecord::to_line).collect();
        write_lines(path, &lines)
    }

    pub fn add(&mut self, record: ExpenseRecord) -> Uuid {
        let entry = LedgerEntry::new(record);
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// Removes the first record whose description starts the trimmed selection text.
    pub fn remove_matching(&mut self, selection: &str) -> Option<ExpenseRecord> {
        let selection = selection.trim();
        let position = self
            .entries
            .iter()
            .position(|entry| selection.starts_with(entry.record.description()))?;
        Some(self.entries.remove(position).record)
    }

    pub fn remove_by_id(&mut self, id: Uuid) -> Option<ExpenseRecord> {
        let position = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(position).record)
    }

    /// Resolves a full id or an unambiguous short id prefix to an entry id.
    pub fn resolve_id(&self, text: &str) -> Option<Uuid> {
        let text = text.trim();
        if let Ok(id) = Uuid::parse_str(text) {
            return self.entries.iter().any(|e| e.id == id).then_some(id);
        }
        if text.len() < SHORT_ID_LEN || !text.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let needle = text.to_ascii_lowercase();
        let mut matches = self
            .entries
            .iter()
            .filter(|entry| entry.id.simple().to_string().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Some(entry.id),
            _ => None,
        }
    }

    /// Stable ascending reorder; equal keys keep their relative order.
    pub fn sort(&mut self, key: SortKey) {
        self.entries.sort_by(|a, b| key.compare(&a.record, &b.record));
    }

    pub fn sort_by_date(&mut self) {
        self.sort(SortKey::Date);
    }

    pub fn sort_by_amount(&mut self) {
        self.sort(SortKey::Amount);
    }

    pub fn sort_by_category(&mut self) {
        self.sort(SortKey::Category);
    }

    /// Keeps only records whose category equals `name`, ignoring case.
    ///
    /// Destructive: dropped records are gone from memory until the ledger is reloaded.
    pub fn filter_by_category(&mut self, name: &str) {
        let wanted = name.to_lowercase();
        self.entries.retain(|entry| entry.record.category().to_lowercase() == wanted);
    }

    pub fn records(&self) -> impl Iterator<Item = &ExpenseRecord> {
        self.entries.iter().map(|entry| &entry.record)
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
