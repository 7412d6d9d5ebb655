//! Footprint resolution facade over a shared snapshot

use std::sync::Arc;

use crate::config::{EngineConfig, DEFAULT_GRAMS, NATIONAL_DEFAULT_GRAMS};
use crate::probe::AvailabilityProber;
use crate::reference::FlowType;
use crate::report::{render_national, render_process_flow, render_regional, ImpactReport};
use crate::resolve::{
    FallbackResolver, NationalAdapter, ProcessFlowAdapter, Query, RegionalAdapter, Source,
};
use crate::snapshot::Snapshot;

/// One product picked for an ingredient, and the source it was found in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub source: Source,
    pub product: String,
}

impl Selection {
    pub fn new(source: Source, product: impl Into<String>) -> Self {
        Self {
            source,
            product: product.into(),
        }
    }
}

/// Everything resolved for one ingredient
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientResults {
    pub ingredient: String,
    pub grams: f64,
    pub reports: Vec<ImpactReport>,
    pub text: String,
}

/// Resolves footprints against an immutable snapshot.
///
/// Cloning is cheap and every method takes `&self`, so one engine can serve
/// any number of threads.
#[derive(Debug, Clone)]
pub struct FootprintEngine {
    snapshot: Arc<Snapshot>,
    resolver: FallbackResolver,
    home_region: String,
}

impl FootprintEngine {
    pub fn new(snapshot: Snapshot, config: &EngineConfig) -> Self {
        Self::from_shared(Arc::new(snapshot), config)
    }

    pub fn from_shared(snapshot: Arc<Snapshot>, config: &EngineConfig) -> Self {
        Self {
            snapshot,
            resolver: FallbackResolver::default(),
            home_region: config.home_region.clone(),
        }
    }

    pub fn with_resolver(mut self, resolver: FallbackResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn home_region(&self) -> &str {
        &self.home_region
    }

    /// Resolve a process-flow activity of the given flow type in a region
    pub fn process_flow(&self, product: &str, flow_type: FlowType, region: &str, grams: f64) -> ImpactReport {
        let snapshot = &*self.snapshot;
        let query = Query::new(product, flow_type, region);
        let adapter = ProcessFlowAdapter::new(&snapshot.reference, &snapshot.process);
        let resolution = self.resolver.resolve(&adapter, &query);
        render_process_flow(&snapshot.reference, &snapshot.process, &query, grams, &resolution)
    }

    /// Resolve a product of the national lifecycle table
    pub fn national(&self, product: &str, grams: f64) -> ImpactReport {
        let query = Query::untyped(product, &self.home_region);
        let adapter = NationalAdapter::new(&self.snapshot.national);
        let resolution = self.resolver.resolve(&adapter, &query);
        render_national(&query, &self.home_region, grams, &resolution)
    }

    /// Resolve a product of the multi-region table in a region
    pub fn multi_region(&self, product: &str, region: &str, grams: f64) -> ImpactReport {
        let query = Query::untyped(product, region);
        let adapter = RegionalAdapter::new(&self.snapshot.regional);
        let resolution = self.resolver.resolve(&adapter, &query);
        render_regional(&query, grams, &resolution)
    }

    /// Resolve with a source's default mass. Process-flow queries use
    /// `flow_type`; the other sources ignore it.
    pub fn resolve(&self, source: Source, product: &str, flow_type: FlowType, region: &str, grams: Option<f64>) -> ImpactReport {
        match source {
            Source::ProcessFlow => self.process_flow(product, flow_type, region, grams.unwrap_or(DEFAULT_GRAMS)),
            Source::National => self.national(product, grams.unwrap_or(NATIONAL_DEFAULT_GRAMS)),
            Source::MultiRegion => self.multi_region(product, region, grams.unwrap_or(DEFAULT_GRAMS)),
        }
    }

    pub fn prober(&self) -> AvailabilityProber<'_> {
        AvailabilityProber::new(&self.snapshot, &self.home_region)
    }

    pub fn has_data(&self, product: &str, region: &str) -> bool {
        self.prober().has_data(product, region)
    }

    /// Resolve every selected product for an ingredient and concatenate the
    /// text blocks. A miss in one selection never affects the others.
    pub fn ingredient_results(&self, ingredient: &str, grams: f64, selections: &[Selection], region: &str) -> IngredientResults {
        let mut text = format!("Results for selected most similar items to '{}':\n\n", ingredient);
        let mut reports = Vec::new();

        if selections.is_empty() {
            text.push_str(&format!("No data available in all data sources for {}", ingredient));
        }

        for selection in selections {
            match selection.source {
                Source::ProcessFlow => {
                    let production = self.process_flow(&selection.product, FlowType::Product, region, grams);
                    let market = self.process_flow(&selection.product, FlowType::Market, region, grams);
                    text.push_str(&production.text);
                    text.push('\n');
                    text.push_str(&market.text);
                    reports.push(production);
                    reports.push(market);
                }
                Source::National => {
                    let report = self.national(&selection.product, grams);
                    text.push_str(&report.text);
                    reports.push(report);
                }
                Source::MultiRegion => {
                    let report = self.multi_region(&selection.product, region, grams);
                    text.push_str(&report.text);
                    reports.push(report);
                }
            }
            text.push('\n');
        }

        IngredientResults {
            ingredient: ingredient.to_string(),
            grams,
            reports,
            text,
        }
    }
}
