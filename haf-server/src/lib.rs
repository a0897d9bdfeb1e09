//! HTTP dashboard over the annual and monthly housing tables.
//!
//! The tables are loaded once at startup into an `Arc<DashboardData>`.
//! Each request builds its own [`haf_chart::BindingLayer`], so handlers
//! share nothing mutable.

pub mod assets;
pub mod config;
pub mod page;
pub mod routes;

pub use config::{ConfigError, ServerConfig};
pub use routes::{build_router, AppState};
