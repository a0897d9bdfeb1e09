//! haf-server - serves the housing affordability dashboard.

use anyhow::Context;
use haf_server::{build_router, AppState, ServerConfig};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    log::info!(
        "server: source {}, tables {}/{}, default MSA {:?}",
        config.source,
        config.tables.annual(),
        config.tables.monthly(),
        config.default_msa
    );

    let data = haf_db::load_dashboard_data(&config.source, &config.tables)
        .await
        .with_context(|| format!("failed to load dashboard data from {}", config.source))?;
    let state = AppState::new(Arc::new(data), config.options.clone(), &config.default_msa);
    log::info!(
        "server: {} MSAs available, initial selection {:?}",
        state.layout().dropdown.options.len(),
        state.layout().default_selection()
    );

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    log::info!("server: listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(state))
        .await
        .context("server stopped")?;
    Ok(())
}
