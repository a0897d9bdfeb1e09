//! The loaded dashboard tables and the MSA key index derived from them.

use crate::models::{AnnualRecord, MonthlyRecord};
use std::collections::BTreeSet;

/// Both source tables, loaded once at startup and read-only afterwards.
///
/// The server wraps this in an `Arc` and hands it to every chart producer;
/// nothing mutates it after construction.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    annual: Vec<AnnualRecord>,
    monthly: Vec<MonthlyRecord>,
    /// Distinct annual `msa` values, ascending.
    msa_keys: Vec<String>,
}

impl DashboardData {
    /// Build the context and its key index.
    ///
    /// Keys are drawn from the annual table only, so every offered key has a
    /// non-empty annual slice. Monthly keys with no annual rows are kept in
    /// the monthly table but logged, since no selection can reach them.
    pub fn new(annual: Vec<AnnualRecord>, monthly: Vec<MonthlyRecord>) -> Self {
        let msa_keys: Vec<String> = annual
            .iter()
            .map(|r| r.msa.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let orphans: BTreeSet<&str> = monthly
            .iter()
            .map(|r| r.msa.as_str())
            .filter(|msa| msa_keys.binary_search_by(|k| k.as_str().cmp(msa)).is_err())
            .collect();
        if !orphans.is_empty() {
            log::warn!(
                "dataset: {} monthly MSA(s) have no annual rows and cannot be selected: {:?}",
                orphans.len(),
                orphans
            );
        }

        log::info!(
            "dataset: {} annual rows, {} monthly rows, {} MSAs",
            annual.len(),
            monthly.len(),
            msa_keys.len()
        );
        Self {
            annual,
            monthly,
            msa_keys,
        }
    }

    pub fn annual(&self) -> &[AnnualRecord] {
        &self.annual
    }

    pub fn monthly(&self) -> &[MonthlyRecord] {
        &self.monthly
    }

    /// The filter key index: distinct annual MSAs, sorted ascending.
    pub fn msa_keys(&self) -> &[String] {
        &self.msa_keys
    }

    pub fn contains_msa(&self, msa: &str) -> bool {
        self.msa_keys
            .binary_search_by(|k| k.as_str().cmp(&msa))
            .is_ok()
    }

    /// Annual rows for one MSA, in store order.
    pub fn annual_for<'a>(&'a self, msa: &'a str) -> impl Iterator<Item = &'a AnnualRecord> + 'a {
        self.annual.iter().filter(move |r| r.msa == msa)
    }

    /// Monthly rows for one MSA, in store order. May be empty.
    pub fn monthly_for<'a>(&'a self, msa: &'a str) -> impl Iterator<Item = &'a MonthlyRecord> + 'a {
        self.monthly.iter().filter(move |r| r.msa == msa)
    }

    /// Min and max of `affordability` over the whole annual table.
    ///
    /// Returns `None` when no row carries a value.
    pub fn affordability_range(&self) -> Option<(f64, f64)> {
        self.annual
            .iter()
            .filter_map(|r| r.affordability)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn annual(msa: &str, year: i32, affordability: Option<f64>) -> AnnualRecord {
        AnnualRecord {
            msa: msa.to_string(),
            year,
            income: Some(50000.0),
            hvi: Some(200000.0),
            mortgage_rate: Some(4.0),
            affordability,
            predicted_affordability: affordability,
            cluster: Some("0".to_string()),
        }
    }

    fn monthly(msa: &str, month: u32) -> MonthlyRecord {
        MonthlyRecord {
            msa: msa.to_string(),
            month_year: NaiveDate::from_ymd_opt(2022, month, 1).unwrap(),
            hvi: Some(1.0),
            mortgage_rate: Some(1.0),
        }
    }

    fn sample() -> DashboardData {
        DashboardData::new(
            vec![
                annual("Ithaca, NY", 2020, Some(4.0)),
                annual("Charlottesville, VA", 2021, Some(4.6)),
                annual("Austin, TX", 2020, None),
                annual("Charlottesville, VA", 2020, Some(2.5)),
                annual("Ithaca, NY", 2021, Some(3.9)),
            ],
            vec![monthly("Charlottesville, VA", 1), monthly("Boise, ID", 1), monthly("Charlottesville, VA", 2)],
        )
    }

    #[test]
    fn key_index_is_sorted_and_distinct() {
        let data = sample();
        assert_eq!(data.msa_keys(), ["Austin, TX", "Charlottesville, VA", "Ithaca, NY"]);
        assert!(data.msa_keys().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn key_index_ignores_monthly_only_keys() {
        let data = sample();
        assert!(!data.contains_msa("Boise, ID"));
        assert_eq!(data.monthly_for("Boise, ID").count(), 1);
    }

    #[test]
    fn annual_filter_returns_only_the_key() {
        let data = sample();
        for key in data.msa_keys() {
            let slice: Vec<_> = data.annual_for(key).collect();
            assert!(!slice.is_empty());
            assert!(slice.iter().all(|r| &r.msa == key));
        }
    }

    #[test]
    fn filters_preserve_store_order() {
        let data = sample();
        let years: Vec<i32> = data.annual_for("Charlottesville, VA").map(|r| r.year).collect();
        assert_eq!(years, vec![2021, 2020]);
    }

    #[test]
    fn monthly_filter_may_be_empty() {
        let data = sample();
        assert_eq!(data.monthly_for("Ithaca, NY").count(), 0);
        assert_eq!(data.monthly_for("Charlottesville, VA").count(), 2);
    }

    #[test]
    fn affordability_range_spans_whole_table() {
        assert_eq!(sample().affordability_range(), Some((2.5, 4.6)));
    }

    #[test]
    fn affordability_range_of_empty_table_is_none() {
        assert_eq!(DashboardData::default().affordability_range(), None);
        let data = DashboardData::new(vec![annual("Austin, TX", 2020, None)], vec![]);
        assert_eq!(data.affordability_range(), None);
    }

    #[test]
    fn contains_msa_uses_exact_match() {
        let data = sample();
        assert!(data.contains_msa("Ithaca, NY"));
        assert!(!data.contains_msa("ithaca, ny"));
        assert!(!data.contains_msa(""));
    }
}
