//! Record types for the two source tables.
//!
//! Both derive `Serialize` so the CLI can print them as JSON. Metric columns
//! are optional: a NULL in the store stays missing and shows up as a gap in
//! the chart rather than a zero.

use chrono::NaiveDate;
use serde::Serialize;

/// Column names read from the annual table, in decode order.
pub const ANNUAL_COLUMNS: [&str; 8] = [
    "msa",
    "year",
    "income",
    "hvi",
    "mortgage_rate",
    "affordability",
    "predicted_affordability",
    "cluster",
];

/// Column names read from the monthly table, in decode order.
pub const MONTHLY_COLUMNS: [&str; 4] = ["msa", "month_year", "hvi", "mortgage_rate"];

/// One row per (metropolitan area, year).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnnualRecord {
    /// Metropolitan statistical area, e.g. "Charlottesville, VA".
    pub msa: String,
    pub year: i32,
    /// Median household income.
    pub income: Option<f64>,
    /// Home value index.
    pub hvi: Option<f64>,
    /// Average 30-year mortgage rate, in percent.
    pub mortgage_rate: Option<f64>,
    /// hvi / income; lower is more affordable.
    pub affordability: Option<f64>,
    /// Regression estimate of `affordability`, computed upstream.
    pub predicted_affordability: Option<f64>,
    /// Cluster label assigned upstream.
    pub cluster: Option<String>,
}

/// One row per (metropolitan area, month).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyRecord {
    pub msa: String,
    /// First day of the month the observation belongs to.
    pub month_year: NaiveDate,
    pub hvi: Option<f64>,
    pub mortgage_rate: Option<f64>,
}
