//! Selection-driven recomputation of chart regions.
//!
//! A [`BindingLayer`] wires one [`SelectionInput`] to a set of
//! [`Binding`]s. Changing the selection marks every subscriber stale and
//! then recomputes each one exactly once, in subscription order. Bindings
//! never read each other's output.

use crate::figure::Figure;
use crate::producers::{ChartContext, ChartOptions, Producer};
use crate::region::RegionId;
use haf_db::DashboardData;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Stale,
    Fresh,
}

/// A producer that panicked while computing its region.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("chart {region} failed: {message}")]
pub struct RegionFault {
    pub region: RegionId,
    pub message: String,
}

pub type RegionOutput = Result<Figure, RegionFault>;

/// The current filter key and who listens to it.
#[derive(Debug, Clone)]
pub struct SelectionInput {
    key: String,
    subscribers: Vec<RegionId>,
}

impl SelectionInput {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn subscribers(&self) -> &[RegionId] {
        &self.subscribers
    }
}

/// One region bound to its producer.
pub struct Binding {
    region: RegionId,
    producer: Producer,
    state: BindingState,
    output: Option<RegionOutput>,
    computations: usize,
}

impl Binding {
    fn new(region: RegionId, producer: Producer) -> Self {
        Self {
            region,
            producer,
            state: BindingState::Stale,
            output: None,
            computations: 0,
        }
    }

    pub fn region(&self) -> RegionId {
        self.region
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    /// Last computed output; `None` before the first selection.
    pub fn output(&self) -> Option<&RegionOutput> {
        self.output.as_ref()
    }

    /// How many times the producer has been invoked.
    pub fn computations(&self) -> usize {
        self.computations
    }

    fn recompute(&mut self, data: &DashboardData, key: &str, options: &ChartOptions) {
        let ctx = ChartContext {
            data,
            msa: key,
            options,
        };
        let producer = self.producer;
        let result = panic::catch_unwind(AssertUnwindSafe(|| producer(&ctx)));
        self.computations += 1;
        self.output = Some(result.map_err(|payload| {
            let fault = RegionFault {
                region: self.region,
                message: panic_message(payload.as_ref()),
            };
            log::error!("binding: {fault}");
            fault
        }));
        self.state = BindingState::Fresh;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "producer panicked".to_string()
    }
}

/// Single input, many independent outputs.
pub struct BindingLayer {
    data: Arc<DashboardData>,
    options: ChartOptions,
    input: SelectionInput,
    bindings: Vec<Binding>,
}

impl BindingLayer {
    /// All ten regions, each bound to its own producer, in page order.
    pub fn new(data: Arc<DashboardData>, options: ChartOptions) -> Self {
        let bindings = RegionId::ALL.into_iter().map(|r| (r, r.producer())).collect();
        Self::with_bindings(data, options, bindings)
    }

    /// A layer over an explicit set of bindings.
    pub fn with_bindings(data: Arc<DashboardData>, options: ChartOptions, bindings: Vec<(RegionId, Producer)>) -> Self {
        let bindings: Vec<Binding> = bindings
            .into_iter()
            .map(|(region, producer)| Binding::new(region, producer))
            .collect();
        let input = SelectionInput {
            key: String::new(),
            subscribers: bindings.iter().map(Binding::region).collect(),
        };
        Self {
            data,
            options,
            input,
            bindings,
        }
    }

    /// Set the selection and recompute every subscriber once.
    pub fn select(&mut self, key: &str) {
        self.input.key = key.to_string();
        for binding in &mut self.bindings {
            binding.state = BindingState::Stale;
        }

        let mut faults = 0;
        for binding in self.bindings.iter_mut().filter(|b| b.state == BindingState::Stale) {
            binding.recompute(&self.data, &self.input.key, &self.options);
            if matches!(binding.output, Some(Err(_))) {
                faults += 1;
            }
        }
        log::debug!(
            "binding: selection {:?} recomputed {} regions, {} faulted",
            self.input.key,
            self.bindings.len(),
            faults
        );
    }

    pub fn selection(&self) -> &SelectionInput {
        &self.input
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn binding(&self, region: RegionId) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.region == region)
    }

    /// Consume the layer, yielding each computed region output in order.
    pub fn into_outputs(self) -> Vec<(RegionId, RegionOutput)> {
        self.bindings
            .into_iter()
            .filter_map(|b| Some((b.region, b.output?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{Axis, ChartKind};
    use crate::producers;
    use haf_db::Database;

    fn fixture() -> Arc<DashboardData> {
        let db = Database::new().unwrap();
        db.load_annual_csv(include_str!("../../fixtures/acs_zillow_fred_long.csv"))
            .unwrap();
        db.load_monthly_csv(include_str!("../../fixtures/zillow_fred_long.csv"))
            .unwrap();
        Arc::new(db.load_dashboard_data().unwrap())
    }

    fn exploding(_: &ChartContext<'_>) -> Figure {
        panic!("boom")
    }

    fn constant(_: &ChartContext<'_>) -> Figure {
        Figure::new(ChartKind::Line, "constant", Axis::field("x"), Axis::field("y"))
    }

    #[test]
    fn starts_stale_with_every_region_subscribed() {
        let layer = BindingLayer::new(fixture(), ChartOptions::default());
        assert_eq!(layer.selection().subscribers(), RegionId::ALL);
        assert!(layer
            .bindings()
            .iter()
            .all(|b| b.state() == BindingState::Stale && b.output().is_none()));
    }

    #[test]
    fn each_selection_recomputes_every_binding_once() {
        let mut layer = BindingLayer::new(fixture(), ChartOptions::default());
        layer.select("Charlottesville, VA");
        layer.select("Ithaca, NY");
        layer.select("Ithaca, NY");

        for binding in layer.bindings() {
            assert_eq!(binding.computations(), 3, "{}", binding.region());
            assert_eq!(binding.state(), BindingState::Fresh);
        }
        assert_eq!(layer.selection().key(), "Ithaca, NY");
    }

    #[test]
    fn outputs_match_direct_producer_calls() {
        let data = fixture();
        let options = ChartOptions::default();
        let mut layer = BindingLayer::new(data.clone(), options.clone());
        layer.select("Cleveland-Elyria, OH");

        let ctx = ChartContext {
            data: &data,
            msa: "Cleveland-Elyria, OH",
            options: &options,
        };
        let output = layer.binding(RegionId::Income).unwrap().output().unwrap();
        assert_eq!(output.as_ref().unwrap(), &producers::income_plot(&ctx));
    }

    #[test]
    fn a_panicking_producer_only_faults_its_own_region() {
        let mut layer = BindingLayer::with_bindings(
            fixture(),
            ChartOptions::default(),
            vec![
                (RegionId::Income, producers::income_plot as Producer),
                (RegionId::Hvi, exploding as Producer),
                (RegionId::Cluster, constant as Producer),
            ],
        );
        layer.select("Charlottesville, VA");

        let outputs = layer.into_outputs();
        assert_eq!(outputs.len(), 3);
        assert!(outputs[0].1.is_ok());
        assert_eq!(
            outputs[1].1,
            Err(RegionFault {
                region: RegionId::Hvi,
                message: "boom".to_string(),
            })
        );
        assert_eq!(outputs[2].1.as_ref().unwrap().title, "constant");
    }

    #[test]
    fn faulted_binding_recovers_state_on_next_selection() {
        let mut layer = BindingLayer::with_bindings(
            fixture(),
            ChartOptions::default(),
            vec![(RegionId::Hvi, exploding as Producer)],
        );
        layer.select("a");
        layer.select("b");
        let binding = layer.binding(RegionId::Hvi).unwrap();
        assert_eq!(binding.state(), BindingState::Fresh);
        assert_eq!(binding.computations(), 2);
        assert!(layer.binding(RegionId::Income).is_none());
    }

    #[test]
    fn fault_message_names_region() {
        let fault = RegionFault {
            region: RegionId::Dual,
            message: "boom".to_string(),
        };
        assert_eq!(fault.to_string(), "chart dual_plot failed: boom");
    }
}
