//! Where the dashboard tables come from, and the one-shot startup load.

use crate::dataset::DashboardData;
use crate::error::DbError;
use crate::schema::TableNames;
use crate::Database;
use std::fmt;
use std::path::PathBuf;

/// Connection parts for the Postgres source.
#[derive(Clone, PartialEq, Eq)]
pub struct PostgresSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl PostgresSettings {
    /// Connection string with the password masked, for logs.
    pub fn describe(&self) -> String {
        format!(
            "postgresql://{}:***@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

// Hand-written so the password never reaches a log line through `{:?}`.
impl fmt::Debug for PostgresSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// The relational store holding the annual and monthly tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// An existing SQLite file, opened read-only.
    Sqlite(PathBuf),
    Postgres(PostgresSettings),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Sqlite(path) => write!(f, "sqlite://{}", path.display()),
            DataSource::Postgres(settings) => f.write_str(&settings.describe()),
        }
    }
}

/// Run the two startup queries against `source` and build the context.
///
/// A single attempt is made; any error is meant to abort the process.
pub async fn load_dashboard_data(
    source: &DataSource,
    tables: &TableNames,
) -> Result<DashboardData, DbError> {
    log::info!(
        "loader: Loading {} and {} from {}",
        tables.annual(),
        tables.monthly(),
        source
    );
    match source {
        DataSource::Sqlite(path) => Database::open(path, tables.clone())?.load_dashboard_data(),
        DataSource::Postgres(settings) => load_postgres(settings, tables).await,
    }
}

#[cfg(feature = "postgres")]
async fn load_postgres(settings: &PostgresSettings, tables: &TableNames) -> Result<DashboardData, DbError> {
    let (annual, monthly) = crate::postgres::fetch_tables(settings, tables).await?;
    Ok(DashboardData::new(annual, monthly))
}

#[cfg(not(feature = "postgres"))]
async fn load_postgres(_settings: &PostgresSettings, _tables: &TableNames) -> Result<DashboardData, DbError> {
    Err(DbError::BackendUnavailable("postgres"))
}
