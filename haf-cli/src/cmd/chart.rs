//! `chart`: compute one region and print its figure.

use anyhow::{anyhow, Context};
use haf_chart::{BindingLayer, ChartOptions, Layout, RegionId, DEFAULT_MSA};
use haf_db::{DataSource, TableNames};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

pub async fn run_chart(
    sqlite: &Path,
    tables: &TableNames,
    region: &str,
    msa: Option<&str>,
    trendline: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let region: RegionId = region.parse()?;
    let source = DataSource::Sqlite(sqlite.to_path_buf());
    let data = haf_db::load_dashboard_data(&source, tables)
        .await
        .with_context(|| format!("loading {source}"))?;

    let selection = match msa {
        Some(msa) => msa.to_string(),
        None => Layout::new(&data, DEFAULT_MSA).default_selection().to_string(),
    };
    let options = ChartOptions {
        scatter_trendline: trendline,
    };
    let mut layer = BindingLayer::with_bindings(Arc::new(data), options, vec![(region, region.producer())]);
    layer.select(&selection);

    let (_, output) = layer
        .into_outputs()
        .pop()
        .ok_or_else(|| anyhow!("chart {region} produced no output"))?;
    let figure = output?;
    serde_json::to_writer_pretty(&mut *out, &figure)?;
    writeln!(out)?;
    Ok(())
}
