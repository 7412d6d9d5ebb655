use tracing::debug;

use super::{Miss, Query, Resolution, Source, SourceAdapter};
use crate::reference::FlowType;

/// Whether a region miss for (source, flow type) may be answered by a
/// cross-region average
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyRule {
    pub source: Source,
    pub flow_type: FlowType,
    pub fallback: bool,
}

impl PolicyRule {
    pub const fn new(source: Source, flow_type: FlowType, fallback: bool) -> Self {
        Self {
            source,
            flow_type,
            fallback,
        }
    }
}

/// Production figures are never averaged; markets and the multi-region
/// table are. Pairs missing from the table never fall back.
pub static DEFAULT_POLICY: &[PolicyRule] = &[
    PolicyRule::new(Source::ProcessFlow, FlowType::Product, false),
    PolicyRule::new(Source::ProcessFlow, FlowType::Market, true),
    PolicyRule::new(Source::National, FlowType::Product, false),
    PolicyRule::new(Source::National, FlowType::Market, false),
    PolicyRule::new(Source::MultiRegion, FlowType::Product, true),
    PolicyRule::new(Source::MultiRegion, FlowType::Market, true),
];

/// Runs an adapter's exact lookup and applies the region-fallback policy
#[derive(Debug, Clone, Copy)]
pub struct FallbackResolver {
    rules: &'static [PolicyRule],
}

impl FallbackResolver {
    pub fn new(rules: &'static [PolicyRule]) -> Self {
        Self { rules }
    }

    pub fn allows_fallback(&self, source: Source, flow_type: FlowType) -> bool {
        self.rules
            .iter()
            .find(|rule| rule.source == source && rule.flow_type == flow_type)
            .map(|rule| rule.fallback)
            .unwrap_or(false)
    }

    pub fn resolve<A: SourceAdapter>(&self, adapter: &A, query: &Query<'_>) -> Resolution<A::Record> {
        let source = A::SOURCE;
        match adapter.lookup(query) {
            Ok(record) => {
                debug!(source = %source, product = query.product, region = query.region, "exact match");
                Resolution::Exact(record)
            }
            Err(Miss::Region) if self.allows_fallback(source, query.flow_type) => {
                match adapter.average(query) {
                    Some(averaged) => {
                        debug!(
                            source = %source,
                            product = query.product,
                            region = query.region,
                            averaged_regions = averaged.regions.len(),
                            "region fallback"
                        );
                        Resolution::Approximate(averaged)
                    }
                    None => Resolution::NotFound(Miss::Region),
                }
            }
            Err(miss) => {
                debug!(source = %source, product = query.product, region = query.region, %miss, "not found");
                Resolution::NotFound(miss)
            }
        }
    }
}

impl Default for FallbackResolver {
    fn default() -> Self {
        Self::new(DEFAULT_POLICY)
    }
}
