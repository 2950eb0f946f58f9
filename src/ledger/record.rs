use std::fmt;

use chrono::NaiveDate;

use crate::errors::LedgerError;

/// Date layout used in every persisted file and in user input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const FIELD_SEPARATOR: char = ',';

/// One dated, categorised expense. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    description: String,
    date: NaiveDate,
    category: String,
    amount: f64,
}

impl ExpenseRecord {
    pub fn new(
        description: impl Into<String>,
        date: NaiveDate,
        category: impl Into<String>,
        amount: f64,
    ) -> Result<Self, LedgerError> {
        let description = description.into();
        let category = category.into();
        validate_field("description", &description)?;
        validate_field("category", &category)?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::Validation(format!(
                "amount must be a non-negative number, got {amount}"
            )));
        }
        Ok(Self {
            description,
            date,
            category,
            // normalizes -0.0
            amount: amount + 0.0,
        })
    }

    /// Builds a record from raw text fields as typed by a user.
    ///
    /// Empty fields are reported as [`LedgerError::Validation`] before any parsing happens,
    /// so a blank amount is "missing" rather than "malformed".
    pub fn parse(
        description: &str,
        date: &str,
        category: &str,
        amount: &str,
    ) -> Result<Self, LedgerError> {
        if [description, date, category, amount]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(LedgerError::Validation(
                "Please enter all fields for the expense".into(),
            ));
        }
        let date = parse_date(date)?;
        let amount = parse_amount(amount)?;
        Self::new(description, date, category, amount)
    }

    /// Decodes one `description,date,category,amount` row of an expense file.
    pub fn from_line(line: &str) -> Result<Self, LedgerError> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() != 4 {
            return Err(LedgerError::Parse(format!(
                "expected 4 fields, found {}",
                fields.len()
            )));
        }
        let date = parse_date(fields[1])?;
        let amount = parse_amount(fields[3])?;
        Self::new(fields[0], date, fields[2], amount)
    }

    /// Encodes the record as one expense-file row (without the line terminator).
    pub fn to_line(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            self.description,
            self.date_text(),
            self.category,
            format_amount(self.amount),
            sep = FIELD_SEPARATOR
        )
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn date_text(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

impl fmt::Display for ExpenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - Date: {}, Amount: RS {}",
            self.description,
            self.category,
            self.date_text(),
            format_amount(self.amount)
        )
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Result<NaiveDate, LedgerError> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| LedgerError::Parse(format!("invalid date `{trimmed}` (use YYYY-MM-DD)")))
}

/// Parses a finite decimal amount; sign checks happen in [`ExpenseRecord::new`].
pub fn parse_amount(text: &str) -> Result<f64, LedgerError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LedgerError::Parse(format!("invalid amount `{trimmed}`"))),
    }
}

/// Formats an amount the way the flat files store it: integral values keep one
/// decimal place (`10.0`), everything else uses Rust's shortest round-trip
/// decimal. Large and tiny values stay in plain notation, never `1.2E7`.
pub fn format_amount(amount: f64) -> String {
    if amount.is_finite() && amount.fract() == 0.0 && amount.abs() < 1e16 {
        format!("{amount:.1}")
    } else {
        amount.to_string()
    }
}

fn validate_field(name: &str, value: &str) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::Validation(format!("{name} must not be empty")));
    }
    if value.contains([FIELD_SEPARATOR, '\n', '\r']) {
        return Err(LedgerError::Validation(format!(
            "{name} must not contain commas or line breaks"
        )));
    }
    Ok(())
}
