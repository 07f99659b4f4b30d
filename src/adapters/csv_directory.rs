//! File-backed contact directory adapter.
//!
//! Implements [`DirectoryPort`] by re-reading the CSV file on every
//! lookup.  Lookups only happen when an edge is detected, so the cost is
//! negligible, and an edited file takes effect on the very next event
//! without restarting the monitor.

use std::path::{Path, PathBuf};

use log::debug;

use crate::app::ports::{DirectoryPort, LookupError};
use crate::directory::{ContactDirectory, ContactRecord};

pub struct CsvDirectory {
    path: PathBuf,
}

impl CsvDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole directory once (startup checks, `--check-directory`).
    pub fn load(&self) -> Result<ContactDirectory, LookupError> {
        Ok(ContactDirectory::from_path(&self.path)?)
    }
}

impl DirectoryPort for CsvDirectory {
    fn lookup(&self, address: &str) -> Result<ContactRecord, LookupError> {
        let directory = self.load()?;
        debug!(
            "Directory {}: {} record(s) loaded",
            self.path.display(),
            directory.len()
        );
        Ok(directory.lookup(address)?.clone())
    }
}
