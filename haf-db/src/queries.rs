//! `SELECT *` readers for the SQLite store.
//!
//! Columns are located by name, so extra columns and any column order in the
//! source table are tolerated. Rows come back in the order SQLite returns
//! them.

use crate::decode::{Cell, RowCtx};
use crate::error::DbError;
use crate::models::{AnnualRecord, MonthlyRecord, ANNUAL_COLUMNS, MONTHLY_COLUMNS};
use crate::Database;
use rusqlite::types::ValueRef;

fn cell(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(i) => Cell::Int(i),
        ValueRef::Real(f) => Cell::Real(f),
        ValueRef::Text(t) => Cell::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Cell::Text(String::from_utf8_lossy(b).into_owned()),
    }
}

impl Database {
    /// Read every row of `table`, decoding the named columns with `build`.
    fn select_all<T, const N: usize>(
        &self,
        table: &str,
        columns: [&str; N],
        build: impl Fn(&RowCtx<'_>, &[Cell]) -> Result<T, DbError>,
    ) -> Result<Vec<T>, DbError> {
        let mut stmt = self.conn.prepare(&format!("SELECT * FROM {table}"))?;
        let mut indexes = [0usize; N];
        for (slot, name) in indexes.iter_mut().zip(columns) {
            *slot = stmt.column_index(name)?;
        }

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        let mut cells = Vec::with_capacity(N);
        while let Some(row) = rows.next()? {
            cells.clear();
            for idx in indexes {
                cells.push(cell(row.get_ref(idx)?));
            }
            let ctx = RowCtx {
                table,
                row: out.len(),
            };
            out.push(build(&ctx, cells.as_slice())?);
        }
        log::info!("query: SELECT * FROM {} returned {} rows", table, out.len());
        Ok(out)
    }

    /// Read the annual table in store order.
    pub fn query_annual(&self) -> Result<Vec<AnnualRecord>, DbError> {
        self.select_all(self.tables.annual(), ANNUAL_COLUMNS, AnnualRecord::from_cells)
    }

    /// Read the monthly table in store order.
    pub fn query_monthly(&self) -> Result<Vec<MonthlyRecord>, DbError> {
        self.select_all(self.tables.monthly(), MONTHLY_COLUMNS, MonthlyRecord::from_cells)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbError, TableNames};
    use chrono::NaiveDate;

    const ANNUAL_CSV: &str = include_str!("../../fixtures/acs_zillow_fred_long.csv");
    const MONTHLY_CSV: &str = include_str!("../../fixtures/zillow_fred_long.csv");

    fn seeded() -> Database {
        let db = Database::new().unwrap();
        db.load_annual_csv(ANNUAL_CSV).unwrap();
        db.load_monthly_csv(MONTHLY_CSV).unwrap();
        db
    }

    #[test]
    fn query_annual_preserves_store_order() {
        let db = seeded();
        let rows = db.query_annual().unwrap();
        assert_eq!(rows.len(), 29);
        // Austin rows are seeded out of year order and must stay that way.
        let austin: Vec<i32> = rows
            .iter()
            .filter(|r| r.msa == "Austin-Round Rock-Georgetown, TX")
            .map(|r| r.year)
            .collect();
        assert_eq!(austin, vec![2019, 2015, 2016, 2017, 2018, 2020, 2021, 2022]);
    }

    #[test]
    fn query_annual_decodes_all_columns() {
        let db = seeded();
        let first = &db.query_annual().unwrap()[0];
        assert_eq!(first.msa, "Charlottesville, VA");
        assert_eq!(first.year, 2015);
        assert_eq!(first.income, Some(68000.0));
        assert_eq!(first.hvi, Some(265000.0));
        assert_eq!(first.mortgage_rate, Some(3.85));
        assert_eq!(first.affordability, Some(3.8971));
        assert_eq!(first.predicted_affordability, Some(3.8284));
        assert_eq!(first.cluster.as_deref(), Some("1"));
    }

    #[test]
    fn query_monthly_decodes_dates() {
        let db = seeded();
        let rows = db.query_monthly().unwrap();
        assert_eq!(rows.len(), 36);
        assert_eq!(rows[0].month_year, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert!(rows.iter().all(|r| r.msa != "Ithaca, NY"));
    }

    #[test]
    fn select_all_tolerates_extra_columns_and_order() {
        let db = Database::new().unwrap();
        db.conn
            .execute_batch(
                "DROP TABLE zillow_fred_long;
                 CREATE TABLE zillow_fred_long (mortgage_rate REAL, note TEXT, hvi REAL, month_year TEXT, msa TEXT);
                 INSERT INTO zillow_fred_long VALUES (6.9, 'x', 410000, '2022-10-01', 'Charlottesville, VA');",
            )
            .unwrap();
        let rows = db.query_monthly().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].hvi, Some(410000.0));
        assert_eq!(rows[0].mortgage_rate, Some(6.9));
    }

    #[test]
    fn missing_column_is_an_error() {
        let db = Database::new().unwrap();
        db.conn
            .execute_batch(
                "DROP TABLE zillow_fred_long;
                 CREATE TABLE zillow_fred_long (msa TEXT, hvi REAL);",
            )
            .unwrap();
        assert!(matches!(db.query_monthly(), Err(DbError::Sqlite(_))));
    }

    #[test]
    fn missing_table_is_an_error() {
        let tables = TableNames::new("acs_zillow_fred_long", "zillow_fred_long").unwrap();
        let db = Database::in_memory(tables).unwrap();
        db.conn.execute_batch("DROP TABLE acs_zillow_fred_long;").unwrap();
        assert!(db.query_annual().is_err());
    }
}
