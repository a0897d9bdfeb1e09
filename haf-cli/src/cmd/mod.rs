//! Subcommands.

use clap::{Args, Subcommand};
use haf_db::schema::{DEFAULT_ANNUAL_TABLE, DEFAULT_MONTHLY_TABLE};
use haf_db::TableNames;
use std::io;
use std::path::PathBuf;

pub mod chart;
pub mod keys;
pub mod seed;

/// Table names shared by every subcommand that touches the store.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct TableArgs {
    /// Annual table name
    #[arg(long, default_value = DEFAULT_ANNUAL_TABLE)]
    pub annual_table: String,

    /// Monthly table name
    #[arg(long, default_value = DEFAULT_MONTHLY_TABLE)]
    pub monthly_table: String,
}

impl TableArgs {
    pub fn tables(&self) -> anyhow::Result<TableNames> {
        Ok(TableNames::new(self.annual_table.clone(), self.monthly_table.clone())?)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a SQLite store and fill it from the annual and monthly CSVs
    Seed {
        /// SQLite file to create; reseeding replaces rows with the same key
        #[arg(short = 's', long)]
        sqlite: PathBuf,

        /// Headed CSV for the annual table
        #[arg(short = 'a', long)]
        annual_csv: PathBuf,

        /// Headed CSV for the monthly table
        #[arg(short = 'm', long)]
        monthly_csv: PathBuf,

        #[command(flatten)]
        tables: TableArgs,
    },

    /// Print the MSA keys offered by the dashboard, one per line
    Keys {
        #[arg(short = 's', long)]
        sqlite: PathBuf,

        #[command(flatten)]
        tables: TableArgs,
    },

    /// Print one chart region as JSON
    Chart {
        #[arg(short = 's', long)]
        sqlite: PathBuf,

        /// Region id, e.g. income_plot or dual_plot
        #[arg(short = 'r', long)]
        region: String,

        /// Metropolitan area; defaults to the dashboard default
        #[arg(long)]
        msa: Option<String>,

        /// Overlay the OLS trendline on scatter_plot
        #[arg(long)]
        trendline: bool,

        #[command(flatten)]
        tables: TableArgs,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::Seed {
            sqlite,
            annual_csv,
            monthly_csv,
            tables,
        } => seed::run_seed(&sqlite, &annual_csv, &monthly_csv, &tables.tables()?),
        Command::Keys { sqlite, tables } => keys::run_keys(&sqlite, &tables.tables()?, &mut out).await,
        Command::Chart {
            sqlite,
            region,
            msa,
            trendline,
            tables,
        } => {
            let tables = tables.tables()?;
            chart::run_chart(&sqlite, &tables, &region, msa.as_deref(), trendline, &mut out).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    fn keys_tables(args: &[&str]) -> TableArgs {
        let cli = TestCli::try_parse_from(["haf-cli", "keys", "-s", "h.sqlite"].iter().chain(args).copied()).unwrap();
        match cli.command {
            Command::Keys { tables, .. } => tables,
            _ => panic!("expected keys"),
        }
    }

    #[test]
    fn table_flags_default_to_dashboard_tables() {
        assert_eq!(keys_tables(&[]).tables().unwrap(), TableNames::default());
    }

    #[test]
    fn table_flags_override_names() {
        let tables = keys_tables(&["--annual-table", "annual_v2", "--monthly-table", "monthly_v2"])
            .tables()
            .unwrap();
        assert_eq!(tables.annual(), "annual_v2");
        assert_eq!(tables.monthly(), "monthly_v2");
    }

    #[test]
    fn invalid_table_flag_is_rejected() {
        assert!(keys_tables(&["--annual-table", "t; DROP TABLE x"]).tables().is_err());
    }
}
