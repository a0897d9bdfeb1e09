//! Static page structure: header, selector and the three chart tabs.

use crate::region::RegionId;
use haf_db::DashboardData;
use serde::Serialize;

pub const DEFAULT_MSA: &str = "Charlottesville, VA";
pub const TITLE: &str = "US Housing Affordability Dashboard";
pub const PAGE_TITLE: &str = "Housing Affordability Dashboard";
pub const DROPDOWN_ID: &str = "msa_dropdown";
pub const DROPDOWN_LABEL: &str = "Select Metropolitan Area:";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dropdown {
    pub id: &'static str,
    pub label: &'static str,
    pub options: Vec<String>,
    /// Initial selection; empty only when there are no keys at all.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tab {
    pub label: &'static str,
    pub regions: Vec<RegionId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: &'static str,
    pub page_title: &'static str,
    pub dropdown: Dropdown,
    pub tabs: Vec<Tab>,
}

impl Layout {
    /// Lay out the page over the loaded key index.
    ///
    /// A `default_msa` missing from the index falls back to the first key.
    pub fn new(data: &DashboardData, default_msa: &str) -> Self {
        let options = data.msa_keys().to_vec();
        let value = if data.contains_msa(default_msa) {
            default_msa.to_string()
        } else {
            let first = options.first().cloned().unwrap_or_default();
            log::warn!("dataset: default MSA {default_msa:?} not found, using {first:?}");
            first
        };

        use RegionId::*;
        let tabs = vec![
            Tab {
                label: "Annual Trends",
                regions: vec![Income, Hvi, Mortgage, Affordability, Scatter],
            },
            Tab {
                label: "Monthly Trends",
                regions: vec![MonthlyHvi, MonthlyMortgage, Dual],
            },
            Tab {
                label: "ML Insights",
                regions: vec![Regression, Cluster],
            },
        ];

        Self {
            title: TITLE,
            page_title: PAGE_TITLE,
            dropdown: Dropdown {
                id: DROPDOWN_ID,
                label: DROPDOWN_LABEL,
                options,
                value,
            },
            tabs,
        }
    }

    /// The initial selection.
    pub fn default_selection(&self) -> &str {
        &self.dropdown.value
    }

    pub fn regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.tabs.iter().flat_map(|t| t.regions.iter().copied())
    }
}
