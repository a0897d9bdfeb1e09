//! `seed`: build a SQLite store from CSV exports of the two tables.

use anyhow::Context;
use haf_db::{Database, TableNames};
use log::info;
use std::fs;
use std::path::Path;

pub fn run_seed(
    sqlite: &Path,
    annual_csv: &Path,
    monthly_csv: &Path,
    tables: &TableNames,
) -> anyhow::Result<()> {
    let annual = fs::read_to_string(annual_csv)
        .with_context(|| format!("reading {}", annual_csv.display()))?;
    let monthly = fs::read_to_string(monthly_csv)
        .with_context(|| format!("reading {}", monthly_csv.display()))?;

    let db = Database::create(sqlite, tables.clone())
        .with_context(|| format!("creating {}", sqlite.display()))?;
    let annual_rows = db.load_annual_csv(&annual).context("loading annual CSV")?;
    let monthly_rows = db.load_monthly_csv(&monthly).context("loading monthly CSV")?;

    info!(
        "Seeded {} with {} annual and {} monthly rows",
        sqlite.display(),
        annual_rows,
        monthly_rows
    );
    Ok(())
}
