//! Dataset loading
//!
//! Reads a CSV file into an immutable, ordered [`Table`]. Any problem with the
//! file (missing, unreadable, missing a required column, a row that fails to
//! parse or breaks a record invariant) aborts the whole load.

use crate::records::{CsvRecord, DailyRecord, HourlyRecord, RowViolation};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a dataset
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("data file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{} line {line}: {message}", path.display())]
    Malformed {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error(
        "{} line {line}: cnt {total} does not equal casual {casual} + registered {registered}",
        path.display()
    )]
    InconsistentTotal {
        path: PathBuf,
        line: u64,
        casual: u32,
        registered: u32,
        total: u32,
    },

    #[error("{} line {line}: hour {hour} is outside 0-23", path.display())]
    HourOutOfRange { path: PathBuf, line: u64, hour: u8 },
}

impl LoadError {
    fn from_violation(path: &Path, line: u64, violation: RowViolation) -> Self {
        let path = path.to_path_buf();
        match violation {
            RowViolation::InconsistentTotal { casual, registered, total } => {
                LoadError::InconsistentTotal { path, line, casual, registered, total }
            }
            RowViolation::HourOutOfRange { hour } => LoadError::HourOutOfRange { path, line, hour },
        }
    }
}

/// In-memory table: header columns plus rows in source file order.
/// Never mutated after load.
#[derive(Debug, Clone)]
pub struct Table<R> {
    columns: Vec<String>,
    rows: Vec<R>,
}

impl<R> Table<R> {
    pub fn new(columns: Vec<String>, rows: Vec<R>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load any CSV-backed record type, checking headers and row invariants
pub fn load_table<R: CsvRecord>(path: &Path) -> Result<Table<R>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound { path: path.to_path_buf() });
    }

    let read_err = |source: csv::Error| LoadError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(read_err)?;
    let headers = rdr.headers().map_err(read_err)?.clone();

    for column in R::REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }

    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| LoadError::Malformed {
            path: path.to_path_buf(),
            line: e.position().map(|p| p.line()).unwrap_or(0),
            message: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let row: R = record
            .deserialize(Some(&headers))
            .map_err(|e| LoadError::Malformed {
                path: path.to_path_buf(),
                line,
                message: e.to_string(),
            })?;

        row.check()
            .map_err(|violation| LoadError::from_violation(path, line, violation))?;

        rows.push(row);
    }

    let columns = headers.iter().map(str::to_string).collect();

    tracing::info!(path = %path.display(), rows = rows.len(), "Loaded dataset");

    Ok(Table::new(columns, rows))
}

pub fn load_daily(path: &Path) -> Result<Table<DailyRecord>, LoadError> {
    load_table(path)
}

pub fn load_hourly(path: &Path) -> Result<Table<HourlyRecord>, LoadError> {
    load_table(path)
}
