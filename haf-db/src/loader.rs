//! CSV seeding for the SQLite store.
//!
//! Each loader parses headed CSV from a string slice and upserts rows into
//! the corresponding table in file order. A row whose key (`msa` plus `year`
//! or `month_year`) already exists replaces the stored one. This is how local stores and test
//! fixtures get populated; the production tables are filled by ETL.
//!
//! # CSV Formats
//!
//! - **Annual** (has headers):
//!   `msa,year,income,hvi,mortgage_rate,affordability,predicted_affordability,cluster`
//! - **Monthly** (has headers): `msa,month_year(YYYY-MM-DD),hvi,mortgage_rate`
//!
//! Blank numeric cells are stored as NULL. Rows with an empty `msa` are
//! skipped.

use crate::dates;
use crate::error::DbError;
use crate::Database;
use rusqlite::params;

fn parse_optional(s: Option<&str>) -> Result<Option<f64>, std::num::ParseFloatError> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse::<f64>().map(Some),
    }
}

fn invalid(table: &str, column: &'static str, row: usize, detail: String) -> DbError {
    DbError::InvalidValue {
        table: table.to_string(),
        column,
        row,
        detail,
    }
}

impl Database {
    /// Load annual records from CSV string.
    ///
    /// # Example CSV
    /// ```text
    /// msa,year,income,hvi,mortgage_rate,affordability,predicted_affordability,cluster
    /// "Charlottesville, VA",2020,78831,354629.8,3.11,4.4986,4.4382,1
    /// ```
    pub fn load_annual_csv(&self, csv_data: &str) -> Result<usize, DbError> {
        let table = self.tables.annual();
        let sql = format!(
            "INSERT OR REPLACE INTO {table} (msa, year, income, hvi, mortgage_rate, affordability, predicted_affordability, cluster)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut count = 0usize;
        let mut skipped = 0usize;
        for (row, result) in rdr.records().enumerate() {
            let r = result?;
            let msa = r.get(0).unwrap_or("").trim();
            if msa.is_empty() {
                skipped += 1;
                continue;
            }
            let year_str = r.get(1).unwrap_or("").trim();
            let year: i32 = year_str
                .parse()
                .map_err(|_| invalid(table, "year", row, format!("{year_str:?} is not a year")))?;

            let mut metrics = [None; 5];
            for (i, column) in ["income", "hvi", "mortgage_rate", "affordability", "predicted_affordability"]
                .into_iter()
                .enumerate()
            {
                metrics[i] = parse_optional(r.get(i + 2))
                    .map_err(|e| invalid(table, column, row, e.to_string()))?;
            }
            let cluster = r.get(7).map(str::trim).filter(|s| !s.is_empty());

            stmt.execute(params![
                msa, year, metrics[0], metrics[1], metrics[2], metrics[3], metrics[4], cluster
            ])?;
            count += 1;
        }
        log::info!("loader: Loaded {} annual rows into {}, skipped {}", count, table, skipped);
        Ok(count)
    }

    /// Load monthly records from CSV string.
    ///
    /// `month_year` is normalized to "YYYY-MM-DD" before it is stored, so
    /// "2022-03" and "2022-03-01 00:00:00" land as the same value.
    ///
    /// # Example CSV
    /// ```text
    /// msa,month_year,hvi,mortgage_rate
    /// "Charlottesville, VA",2022-03-01,392160.0,4.98
    /// ```
    pub fn load_monthly_csv(&self, csv_data: &str) -> Result<usize, DbError> {
        let table = self.tables.monthly();
        let sql = format!(
            "INSERT OR REPLACE INTO {table} (msa, month_year, hvi, mortgage_rate) VALUES (?1, ?2, ?3, ?4)"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut count = 0usize;
        let mut skipped = 0usize;
        for (row, result) in rdr.records().enumerate() {
            let r = result?;
            let msa = r.get(0).unwrap_or("").trim();
            if msa.is_empty() {
                skipped += 1;
                continue;
            }
            let month_str = r.get(1).unwrap_or("").trim();
            let month = dates::parse_month(month_str).ok_or_else(|| {
                invalid(table, "month_year", row, format!("{month_str:?} is not a date"))
            })?;
            let hvi = parse_optional(r.get(2)).map_err(|e| invalid(table, "hvi", row, e.to_string()))?;
            let rate = parse_optional(r.get(3))
                .map_err(|e| invalid(table, "mortgage_rate", row, e.to_string()))?;

            stmt.execute(params![msa, dates::format_date(&month), hvi, rate])?;
            count += 1;
        }
        log::info!("loader: Loaded {} monthly rows into {}, skipped {}", count, table, skipped);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbError};

    #[test]
    fn load_annual_from_csv() {
        let db = Database::new().unwrap();
        let csv = "\
msa,year,income,hvi,mortgage_rate,affordability,predicted_affordability,cluster
\"Charlottesville, VA\",2020,78831,354629.8,3.11,4.4986,4.4382,1
\"Ithaca, NY\",2020,60285,241030.0,3.11,3.9982,4.0121,0
";
        assert_eq!(db.load_annual_csv(csv).unwrap(), 2);

        let count: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM acs_zillow_fred_long", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);

        let income: f64 = db
            .conn
            .query_row(
                "SELECT income FROM acs_zillow_fred_long WHERE msa = 'Charlottesville, VA'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!((income - 78831.0).abs() < 0.01);
    }

    #[test]
    fn load_annual_stores_blank_metrics_as_null() {
        let db = Database::new().unwrap();
        let csv = "\
msa,year,income,hvi,mortgage_rate,affordability,predicted_affordability,cluster
\"Ithaca, NY\",2021,,241030.0,,,,
";
        db.load_annual_csv(csv).unwrap();

        let (income, cluster): (Option<f64>, Option<String>) = db
            .conn
            .query_row("SELECT income, cluster FROM acs_zillow_fred_long", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert!(income.is_none());
        assert!(cluster.is_none());
    }

    #[test]
    fn load_annual_skips_rows_without_msa() {
        let db = Database::new().unwrap();
        let csv = "\
msa,year,income,hvi,mortgage_rate,affordability,predicted_affordability,cluster
,2020,1,1,1,1,1,1
\"Ithaca, NY\",2020,1,1,1,1,1,1
";
        assert_eq!(db.load_annual_csv(csv).unwrap(), 1);
    }

    #[test]
    fn load_annual_rejects_bad_year() {
        let db = Database::new().unwrap();
        let csv = "\
msa,year,income,hvi,mortgage_rate,affordability,predicted_affordability,cluster
\"Ithaca, NY\",twenty,1,1,1,1,1,1
";
        let err = db.load_annual_csv(csv).unwrap_err();
        assert!(matches!(err, DbError::InvalidValue { column: "year", row: 0, .. }));
    }

    #[test]
    fn load_monthly_normalizes_dates() {
        let db = Database::new().unwrap();
        let csv = "\
msa,month_year,hvi,mortgage_rate
\"Charlottesville, VA\",2022-03,392160.0,4.98
\"Charlottesville, VA\",2022-04-01 00:00:00,395297.3,5.52
";
        assert_eq!(db.load_monthly_csv(csv).unwrap(), 2);

        let mut stmt = db
            .conn
            .prepare("SELECT month_year FROM zillow_fred_long ORDER BY rowid")
            .unwrap();
        let months: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(months, vec!["2022-03-01", "2022-04-01"]);
    }

    #[test]
    fn reloading_replaces_instead_of_duplicating() {
        let db = Database::new().unwrap();
        let annual = include_str!("../../fixtures/acs_zillow_fred_long.csv");
        let monthly = include_str!("../../fixtures/zillow_fred_long.csv");
        for _ in 0..2 {
            db.load_annual_csv(annual).unwrap();
            db.load_monthly_csv(monthly).unwrap();
        }

        let data = db.load_dashboard_data().unwrap();
        assert_eq!(data.annual().len(), 29);
        assert_eq!(data.monthly().len(), 36);
        assert_eq!(data.annual_for("Charlottesville, VA").count(), 8);
    }

    #[test]
    fn reloading_a_key_keeps_the_latest_values() {
        let db = Database::new().unwrap();
        let header = "msa,year,income,hvi,mortgage_rate,affordability,predicted_affordability,cluster\n";
        db.load_annual_csv(&format!("{header}\"Ithaca, NY\",2020,1,1,1,1,1,0\n"))
            .unwrap();
        db.load_annual_csv(&format!("{header}\"Ithaca, NY\",2020,2,1,1,1,1,0\n"))
            .unwrap();

        let rows = db.query_annual().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].income, Some(2.0));
    }

    #[test]
    fn load_monthly_rejects_non_numeric_hvi() {
        let db = Database::new().unwrap();
        let csv = "\
msa,month_year,hvi,mortgage_rate
\"Charlottesville, VA\",2022-03-01,n/a,4.98
";
        assert!(matches!(
            db.load_monthly_csv(csv),
            Err(DbError::InvalidValue { column: "hvi", .. })
        ));
    }
}
