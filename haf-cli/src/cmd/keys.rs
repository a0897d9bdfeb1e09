//! `keys`: list the filter key index.

use anyhow::Context;
use haf_db::{DataSource, TableNames};
use std::io::Write;
use std::path::Path;

pub async fn run_keys(
    sqlite: &Path,
    tables: &TableNames,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let source = DataSource::Sqlite(sqlite.to_path_buf());
    let data = haf_db::load_dashboard_data(&source, tables)
        .await
        .with_context(|| format!("loading {source}"))?;
    for key in data.msa_keys() {
        writeln!(out, "{key}")?;
    }
    Ok(())
}
