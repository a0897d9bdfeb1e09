//! haf-cli - seed and inspect housing affordability data.

use clap::Parser;

mod cmd;

#[derive(Parser)]
#[command(
    name = "haf-cli",
    version,
    about = "US housing affordability dashboard toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    cmd::run(cli.command).await
}
