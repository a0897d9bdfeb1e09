//! Charts for the housing affordability dashboard.
//!
//! [`producers`] turn the loaded tables plus a selected MSA into
//! [`Figure`]s, [`BindingLayer`] recomputes every region when the
//! selection changes, and [`Layout`] describes the page around them.
//!
//! ```
//! use haf_chart::{BindingLayer, ChartOptions, RegionId};
//! use haf_db::DashboardData;
//! use std::sync::Arc;
//!
//! let mut layer = BindingLayer::new(Arc::new(DashboardData::default()), ChartOptions::default());
//! layer.select("Charlottesville, VA");
//! let income = layer.binding(RegionId::Income).and_then(|b| b.output());
//! assert!(matches!(income, Some(Ok(fig)) if fig.point_count() == 0));
//! ```

pub mod figure;
pub mod layout;
pub mod producers;
pub mod reactive;
pub mod region;

pub use figure::Figure;
pub use layout::{Layout, DEFAULT_MSA};
pub use producers::{ChartContext, ChartOptions, Producer};
pub use reactive::{BindingLayer, BindingState, RegionFault, RegionOutput};
pub use region::{RegionId, UnknownRegion};
