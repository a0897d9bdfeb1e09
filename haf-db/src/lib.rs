//! Data loading layer for the US housing affordability dashboard.
//!
//! This crate owns everything between the relational store and the chart
//! producers: the two record types, the SQL that reads them, and the
//! [`DashboardData`] context that holds both tables for the lifetime of the
//! server.
//!
//! # Architecture
//!
//! - [`Database`] wraps a `rusqlite` connection. It reads the two source
//!   tables with `SELECT *` and can seed them from CSV for local runs and
//!   tests.
//! - [`postgres`] (feature `postgres`) reads the same tables from a Postgres
//!   server through `sqlx`.
//! - [`source::load_dashboard_data`] picks the backend named by a
//!   [`DataSource`] and performs the single startup load.
//! - [`DashboardData`] derives the sorted MSA key index and serves filtered
//!   slices to the producers.
//!
//! # Usage
//!
//! ```rust
//! use haf_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_annual_csv(
//!     "msa,year,income,hvi,mortgage_rate,affordability,predicted_affordability,cluster\n\
//!      \"Charlottesville, VA\",2020,78831,354629.8,3.11,4.4986,4.4382,1\n",
//! )
//! .unwrap();
//!
//! let data = db.load_dashboard_data().unwrap();
//! assert_eq!(data.msa_keys(), ["Charlottesville, VA"]);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the SQLite schema. The default names are
//! `acs_zillow_fred_long` (annual) and `zillow_fred_long` (monthly).

pub mod dataset;
pub mod dates;
mod decode;
pub mod error;
mod loader;
pub mod models;
#[cfg(feature = "postgres")]
pub mod postgres;
mod queries;
pub mod schema;
pub mod source;

pub use dataset::DashboardData;
pub use error::DbError;
pub use models::{AnnualRecord, MonthlyRecord};
pub use schema::TableNames;
pub use source::{load_dashboard_data, DataSource, PostgresSettings};

use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// SQLite-backed store holding the annual and monthly tables.
///
/// The server opens an existing file read-only; the CLI and the tests create
/// a fresh store and seed it from CSV.
pub struct Database {
    conn: Connection,
    tables: TableNames,
}

impl Database {
    /// Create a new in-memory database with the default table names and the
    /// full schema applied.
    pub fn new() -> Result<Self, DbError> {
        Self::in_memory(TableNames::default())
    }

    /// Create a new in-memory database using the given table names.
    pub fn in_memory(tables: TableNames) -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(&schema::create_schema(&tables))?;
        Ok(Self { conn, tables })
    }

    /// Create (or reuse) a database file and apply the schema to it.
    pub fn create(path: impl AsRef<Path>, tables: TableNames) -> Result<Self, DbError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch(&schema::create_schema(&tables))?;
        log::info!("loader: Opened {} for writing", path.as_ref().display());
        Ok(Self { conn, tables })
    }

    /// Open an existing database file read-only.
    ///
    /// The tables are expected to exist already; nothing is created.
    pub fn open(path: impl AsRef<Path>, tables: TableNames) -> Result<Self, DbError> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn, tables })
    }

    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    /// Read both tables and build the dashboard context.
    pub fn load_dashboard_data(&self) -> Result<DashboardData, DbError> {
        let annual = self.query_annual()?;
        let monthly = self.query_monthly()?;
        Ok(DashboardData::new(annual, monthly))
    }
}
