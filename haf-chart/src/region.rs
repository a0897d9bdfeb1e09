//! Named chart display regions and the producer bound to each.

use crate::producers::{self, Producer};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the ten chart regions on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "&'static str")]
pub enum RegionId {
    Income,
    Hvi,
    Mortgage,
    Affordability,
    Scatter,
    MonthlyHvi,
    MonthlyMortgage,
    Dual,
    Regression,
    Cluster,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown chart region {0:?}")]
pub struct UnknownRegion(pub String);

impl RegionId {
    /// All regions in page order.
    pub const ALL: [RegionId; 10] = [
        RegionId::Income,
        RegionId::Hvi,
        RegionId::Mortgage,
        RegionId::Affordability,
        RegionId::Scatter,
        RegionId::MonthlyHvi,
        RegionId::MonthlyMortgage,
        RegionId::Dual,
        RegionId::Regression,
        RegionId::Cluster,
    ];

    /// DOM id of the region.
    pub fn as_str(self) -> &'static str {
        match self {
            RegionId::Income => "income_plot",
            RegionId::Hvi => "hvi_plot",
            RegionId::Mortgage => "mortgage_plot",
            RegionId::Affordability => "affordability_plot",
            RegionId::Scatter => "scatter_plot",
            RegionId::MonthlyHvi => "monthly_hvi_plot",
            RegionId::MonthlyMortgage => "monthly_mortgage_plot",
            RegionId::Dual => "dual_plot",
            RegionId::Regression => "regression_plot",
            RegionId::Cluster => "cluster_plot",
        }
    }

    pub fn producer(self) -> Producer {
        match self {
            RegionId::Income => producers::income_plot,
            RegionId::Hvi => producers::hvi_plot,
            RegionId::Mortgage => producers::mortgage_plot,
            RegionId::Affordability => producers::affordability_plot,
            RegionId::Scatter => producers::scatter_plot,
            RegionId::MonthlyHvi => producers::monthly_hvi_plot,
            RegionId::MonthlyMortgage => producers::monthly_mortgage_plot,
            RegionId::Dual => producers::dual_plot,
            RegionId::Regression => producers::regression_plot,
            RegionId::Cluster => producers::cluster_plot,
        }
    }

    /// False for the two model views, whose output ignores the selection.
    pub fn reads_selection(self) -> bool {
        !matches!(self, RegionId::Regression | RegionId::Cluster)
    }
}

impl From<RegionId> for &'static str {
    fn from(region: RegionId) -> Self {
        region.as_str()
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionId {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegionId::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}
