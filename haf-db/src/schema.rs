//! Table names and the SQLite schema for the two source tables.
//!
//! In production the tables live in Postgres and are populated by an external
//! ETL job; the schema here mirrors their shape so a SQLite store can stand in
//! for local runs and tests.

use crate::error::DbError;

pub const DEFAULT_ANNUAL_TABLE: &str = "acs_zillow_fred_long";
pub const DEFAULT_MONTHLY_TABLE: &str = "zillow_fred_long";

/// Names of the annual and monthly tables.
///
/// Names are interpolated into `SELECT * FROM ...`, so construction through
/// [`TableNames::new`] only accepts plain SQL identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    annual: String,
    monthly: String,
}

impl TableNames {
    pub fn new(annual: impl Into<String>, monthly: impl Into<String>) -> Result<Self, DbError> {
        let annual = annual.into();
        let monthly = monthly.into();
        for name in [&annual, &monthly] {
            if !is_identifier(name) {
                return Err(DbError::InvalidTableName(name.clone()));
            }
        }
        Ok(Self { annual, monthly })
    }

    pub fn annual(&self) -> &str {
        &self.annual
    }

    pub fn monthly(&self) -> &str {
        &self.monthly
    }
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            annual: DEFAULT_ANNUAL_TABLE.to_string(),
            monthly: DEFAULT_MONTHLY_TABLE.to_string(),
        }
    }
}

/// True if `name` matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Returns the SQLite schema for the given tables as a single batch string.
///
/// This creates:
/// - the annual table: `msa`, `year`, `income`, `hvi`, `mortgage_rate`,
///   `affordability`, `predicted_affordability`, `cluster`
/// - the monthly table: `msa`, `month_year` (ISO date text), `hvi`,
///   `mortgage_rate`
///
/// Each table is keyed on `msa` plus its time column, so reseeding replaces
/// rows instead of duplicating them. Row order is still insertion order.
pub fn create_schema(tables: &TableNames) -> String {
    format!(
        r#"
    CREATE TABLE IF NOT EXISTS {annual} (
        msa TEXT NOT NULL,
        year INTEGER NOT NULL,
        income REAL,
        hvi REAL,
        mortgage_rate REAL,
        affordability REAL,
        predicted_affordability REAL,
        cluster TEXT,
        PRIMARY KEY (msa, year)
    );
    CREATE INDEX IF NOT EXISTS idx_{annual}_msa ON {annual}(msa);

    CREATE TABLE IF NOT EXISTS {monthly} (
        msa TEXT NOT NULL,
        month_year TEXT NOT NULL,
        hvi REAL,
        mortgage_rate REAL,
        PRIMARY KEY (msa, month_year)
    );
    CREATE INDEX IF NOT EXISTS idx_{monthly}_msa ON {monthly}(msa);
    "#,
        annual = tables.annual(),
        monthly = tables.monthly(),
    )
}
