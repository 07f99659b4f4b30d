//! Contact directory: per-device location and recipient records.
//!
//! One CSV file is shared by every deployed monitor.  Each row describes a
//! single monitor and is keyed by that monitor's network address:
//!
//! ```text
//! Freezer,IP,Location,Email,Backup Email,Reply-To,From,Comments
//! 1,10.12.80.11,LGRT 345,"lab@example.edu, pi@example.edu",it@example.edu,it@example.edu,freezer-monitor@example.edu,
//! ```
//!
//! Header names must match exactly (surrounding whitespace is ignored),
//! column order is irrelevant and extra columns are ignored.  A directory
//! is only handed out once every row passed validation, so a record that
//! reaches the monitor always has non-empty recipient lists.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use core::fmt;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_ADDRESS: &str = "IP";
pub const COL_LOCATION: &str = "Location";
pub const COL_PRIMARY: &str = "Email";
pub const COL_BACKUP: &str = "Backup Email";
pub const COL_REPLY_TO: &str = "Reply-To";
pub const COL_FROM: &str = "From";

/// Every column a directory header must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_ADDRESS,
    COL_LOCATION,
    COL_PRIMARY,
    COL_BACKUP,
    COL_REPLY_TO,
    COL_FROM,
];

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One monitored freezer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    /// Network address of the monitor (directory key).
    pub address: String,
    /// Human-readable freezer location, e.g. a room number.
    pub location: String,
    /// Recipients of alarm and all-clear messages, in file order.
    pub primary_emails: Vec<String>,
    /// Recipients used when delivery to the primary list fails.
    pub backup_emails: Vec<String>,
    /// Reply-To header for messages about this freezer.
    pub reply_to: String,
    /// Sender address for messages about this freezer.
    pub from_address: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The directory source could not be turned into a usable mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryLoadError {
    /// The source could not be opened or read.
    Unreadable(String),
    /// The header lacks one or more required columns.
    MissingColumns(Vec<&'static str>),
    /// Header present but no data rows.
    Empty,
    /// A record could not be tokenised.
    Malformed { line: u64, details: String },
    /// A required field is blank.
    EmptyField { line: u64, column: &'static str },
    /// Two rows share the same address.
    DuplicateAddress { line: u64, address: String },
}

impl fmt::Display for DirectoryLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable(details) => write!(f, "directory unreadable: {details}"),
            Self::MissingColumns(cols) => {
                write!(f, "directory header is missing column(s): {}", cols.join(", "))
            }
            Self::Empty => write!(f, "directory contains no records"),
            Self::Malformed { line, details } => {
                write!(f, "malformed directory record on line {line}: {details}")
            }
            Self::EmptyField { line, column } => {
                write!(f, "empty '{column}' field on line {line}")
            }
            Self::DuplicateAddress { line, address } => {
                write!(f, "duplicate address {address} on line {line}")
            }
        }
    }
}

impl std::error::Error for DirectoryLoadError {}

/// No record exists for the queried address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordNotFoundError {
    pub address: String,
}

impl fmt::Display for RecordNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no directory record for address {}", self.address)
    }
}

impl std::error::Error for RecordNotFoundError {}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// Loaded, validated mapping from monitor address to [`ContactRecord`].
#[derive(Debug, Clone, Default)]
pub struct ContactDirectory {
    records: HashMap<String, ContactRecord>,
}

/// Positions of the required columns within the header.
struct ColumnMap {
    address: usize,
    location: usize,
    primary: usize,
    backup: usize,
    reply_to: usize,
    from: usize,
}

impl ColumnMap {
    fn from_header(header: &csv::StringRecord) -> Result<Self, DirectoryLoadError> {
        let position = |name: &str| header.iter().position(|h| h.trim() == name);

        let missing: Vec<&'static str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| position(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(DirectoryLoadError::MissingColumns(missing));
        }

        // Presence of every column was checked above.
        let idx = |name: &str| position(name).unwrap_or_default();
        Ok(Self {
            address: idx(COL_ADDRESS),
            location: idx(COL_LOCATION),
            primary: idx(COL_PRIMARY),
            backup: idx(COL_BACKUP),
            reply_to: idx(COL_REPLY_TO),
            from: idx(COL_FROM),
        })
    }
}

impl ContactDirectory {
    /// Parse a directory from any CSV byte source.
    pub fn load<R: io::Read>(source: R) -> Result<Self, DirectoryLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let header = reader.headers().map_err(csv_error)?.clone();
        let columns = ColumnMap::from_header(&header)?;

        let mut records = HashMap::new();
        for (idx, row) in reader.records().enumerate() {
            let row = row.map_err(csv_error)?;
            let line = row.position().map_or(idx as u64 + 2, csv::Position::line);
            let record = parse_row(&row, &columns, line)?;
            if records.contains_key(&record.address) {
                return Err(DirectoryLoadError::DuplicateAddress {
                    line,
                    address: record.address,
                });
            }
            records.insert(record.address.clone(), record);
        }

        if records.is_empty() {
            return Err(DirectoryLoadError::Empty);
        }
        Ok(Self { records })
    }

    /// Open and parse the directory file at `path`.
    pub fn from_path(path: &Path) -> Result<Self, DirectoryLoadError> {
        let file = File::open(path).map_err(|e| {
            DirectoryLoadError::Unreadable(format!("{}: {}", path.display(), e))
        })?;
        Self::load(io::BufReader::new(file))
    }

    /// Resolve `address` to its record.
    pub fn lookup(&self, address: &str) -> Result<&ContactRecord, RecordNotFoundError> {
        self.records.get(address).ok_or_else(|| RecordNotFoundError {
            address: address.to_string(),
        })
    }

    /// All records, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &ContactRecord> {
        self.records.values()
    }

    /// Number of monitors listed.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn csv_error(err: csv::Error) -> DirectoryLoadError {
    if err.is_io_error() {
        return DirectoryLoadError::Unreadable(err.to_string());
    }
    DirectoryLoadError::Malformed {
        line: err.position().map_or(0, csv::Position::line),
        details: err.to_string(),
    }
}

fn parse_row(
    row: &csv::StringRecord,
    columns: &ColumnMap,
    line: u64,
) -> Result<ContactRecord, DirectoryLoadError> {
    let field = |idx: usize| row.get(idx).unwrap_or("").trim();
    let required = |idx: usize, column: &'static str| {
        let value = field(idx);
        if value.is_empty() {
            Err(DirectoryLoadError::EmptyField { line, column })
        } else {
            Ok(value.to_string())
        }
    };
    let recipients = |idx: usize, column: &'static str| {
        let list = parse_recipients(field(idx));
        if list.is_empty() {
            Err(DirectoryLoadError::EmptyField { line, column })
        } else {
            Ok(list)
        }
    };

    Ok(ContactRecord {
        address: required(columns.address, COL_ADDRESS)?,
        location: field(columns.location).to_string(),
        primary_emails: recipients(columns.primary, COL_PRIMARY)?,
        backup_emails: recipients(columns.backup, COL_BACKUP)?,
        reply_to: required(columns.reply_to, COL_REPLY_TO)?,
        from_address: required(columns.from, COL_FROM)?,
    })
}

/// Split a comma-separated recipient field, keeping file order.
///
/// Blank entries and repeats are dropped.
pub fn parse_recipients(field: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for addr in field.split(',').map(str::trim).filter(|a| !a.is_empty()) {
        if !out.iter().any(|seen| seen == addr) {
            out.push(addr.to_string());
        }
    }
    out
}
