/// Error types for loading the dashboard tables
use thiserror::Error;

/// Main error type for data loading. Every variant is fatal at startup.
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLite connection or query failed
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Postgres connection or query failed
    #[cfg(feature = "postgres")]
    #[error("Postgres error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// Failed to parse seed CSV
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to read a seed file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Table name is not a plain SQL identifier
    #[error("Invalid table name {0:?}: expected [A-Za-z_][A-Za-z0-9_]*")]
    InvalidTableName(String),

    /// A required key column was NULL
    #[error("{table}: missing value in required column `{column}` at row {row}")]
    MissingValue {
        table: String,
        column: &'static str,
        row: usize,
    },

    /// A cell could not be converted to the column's type
    #[error("{table}: cannot read column `{column}` at row {row}: {detail}")]
    InvalidValue {
        table: String,
        column: &'static str,
        row: usize,
        detail: String,
    },

    /// The configured backend was not compiled in
    #[error("The {0} backend is not available in this build")]
    BackendUnavailable(&'static str),
}
