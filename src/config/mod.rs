use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::LedgerError,
    utils::{
        paths::{app_data_dir, config_file_in},
        persistence::{ensure_dir, write_atomic},
    },
};

/// File naming used inside the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub credentials_file: String,
    pub expenses_prefix: String,
    pub totals_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_file: "credentials.txt".into(),
            expenses_prefix: "expenses_".into(),
            totals_file: "totals.txt".into(),
        }
    }
}

impl Config {
    /// Resolves the concrete file locations under `root`.
    pub fn paths(&self, root: impl Into<PathBuf>) -> StoragePaths {
        let root = root.into();
        StoragePaths {
            credentials: root.join(&self.credentials_file),
            totals: root.join(&self.totals_file),
            expenses_prefix: self.expenses_prefix.clone(),
            root,
        }
    }
}

/// Concrete locations of the credential, expense, and totals files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub root: PathBuf,
    pub credentials: PathBuf,
    pub totals: PathBuf,
    expenses_prefix: String,
}

impl StoragePaths {
    /// The per-user expense file: the configured prefix followed by the username.
    pub fn expenses_for(&self, username: &str) -> PathBuf {
        self.root.join(format!("{}{}", self.expenses_prefix, username))
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
