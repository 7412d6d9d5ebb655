//! Rendering of resolved footprints into structured reports and text blocks
//!
//! The text is read back by downstream parsers, so the phrase prefixes
//! ("Impact for {grams} grams:", "Market share for {region}:", ...) are part
//! of the output contract and must not change.

use serde::Serialize;
use std::fmt::Write as _;

use crate::figures::{sig, Figure};
use crate::recipe::{decompose, DecomposedRow, Decomposition};
use crate::records::{LifecycleRecord, ProcessFlowTables, RegionalProductRecord};
use crate::reference::{FlowType, ReferenceTables};
use crate::resolve::{FlowFootprint, Miss, Query, Resolution, Source};

/// Marker that starts every provenance line of an averaged result
pub const AVERAGE_MARKER: &str = "AVERAGE DATA FROM MULTIPLE REGIONS";

/// Number of averaged regions named before the rest are summarized
pub const NAMED_REGION_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Exact,
    Approximate,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseImpact {
    pub phase: &'static str,
    pub impact: Figure,
    /// Share of the total impact, in percent
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakdown {
    /// No breakdown, either because nothing resolved or none exists
    None,
    Recipe(Decomposition),
    Phases(Vec<PhaseImpact>),
}

/// Structured result of one (source, product, region) resolution together
/// with its rendered text block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactReport {
    pub source: Source,
    pub product: String,
    pub region: String,
    pub flow_type: Option<FlowType>,
    pub grams: f64,
    pub outcome: Outcome,
    pub miss: Option<Miss>,
    /// Impact in kg CO2-eq for `grams` of product
    pub impact: Option<Figure>,
    /// Regions averaged into an approximate result
    pub averaged_regions: Vec<String>,
    pub breakdown: Breakdown,
    pub text: String,
}

impl ImpactReport {
    fn not_found(source: Source, query: &Query<'_>, flow_type: Option<FlowType>, grams: f64, miss: Miss, text: String) -> Self {
        Self {
            source,
            product: query.product.to_string(),
            region: query.region.to_string(),
            flow_type,
            grams,
            outcome: Outcome::NotFound,
            miss: Some(miss),
            impact: None,
            averaged_regions: Vec::new(),
            breakdown: Breakdown::None,
            text,
        }
    }
}

/// Summarize averaged regions: at most three names, then a count of the rest
pub fn describe_regions(regions: &[String]) -> String {
    if regions.len() <= NAMED_REGION_LIMIT {
        return regions.join(", ");
    }
    format!(
        "{} and {} other regions",
        regions[..NAMED_REGION_LIMIT].join(", "),
        regions.len() - NAMED_REGION_LIMIT
    )
}

/// Opening lines shared by every resolved result: the header, then the
/// provenance line when the figure is a cross-region average
fn opening(source: Source, product: &str, region: &str, averaged: Option<&[String]>) -> String {
    let mut text = format!("{} results for '{}' in {}:\n", source_heading(source), product, region);
    if let Some(regions) = averaged {
        let _ = writeln!(
            text,
            "{}: {} (no data for {})",
            AVERAGE_MARKER,
            describe_regions(regions),
            region
        );
    }
    text
}

fn source_heading(source: Source) -> &'static str {
    match source {
        Source::ProcessFlow => "BONSAI database",
        Source::National => "Agribalyse database",
        Source::MultiRegion => "BigClimateDatabase",
    }
}

fn split<T>(resolution: &Resolution<T>) -> Option<(&T, Option<&[String]>, Outcome)> {
    match resolution {
        Resolution::Exact(record) => Some((record, None, Outcome::Exact)),
        Resolution::Approximate(averaged) => Some((
            &averaged.record,
            Some(averaged.regions.as_slice()),
            Outcome::Approximate,
        )),
        Resolution::NotFound(_) => None,
    }
}

// =============================================================================
// Process-flow source
// =============================================================================

pub fn render_process_flow(
    reference: &ReferenceTables,
    tables: &ProcessFlowTables,
    query: &Query<'_>,
    grams: f64,
    resolution: &Resolution<FlowFootprint>,
) -> ImpactReport {
    let source = Source::ProcessFlow;
    let flow = query.flow_type;

    let Some((footprint, averaged, outcome)) = split(resolution) else {
        let miss = resolution.miss().unwrap_or(Miss::Activity);
        let text = match miss {
            Miss::Region => format!(
                "No {} data available for '{}' in {} in BONSAI database\n",
                flow, query.product, query.region
            ),
            Miss::Activity | Miss::Product => format!(
                "No {} data available for '{}' in BONSAI database\n",
                flow, query.product
            ),
        };
        return ImpactReport::not_found(source, query, Some(flow), grams, miss, text);
    };

    let impact = sig(footprint.value * grams / 1000.0);
    let mut text = opening(source, query.product, query.region, averaged);
    let _ = writeln!(text, "Impact for {} grams: {} kg co2-eq", grams, impact);

    let decomposition = decompose(reference, tables, &footprint.code, &footprint.region_code, grams);
    match &decomposition {
        None => {
            let _ = writeln!(
                text,
                "No {} recipe available for '{}' in {} in BONSAI database",
                flow,
                query.product,
                reference.region_name(&footprint.region_code)
            );
        }
        Some(d) => render_recipe(&mut text, d, flow, grams),
    }

    ImpactReport {
        source,
        product: query.product.to_string(),
        region: query.region.to_string(),
        flow_type: Some(flow),
        grams,
        outcome,
        miss: None,
        impact: Some(impact),
        averaged_regions: averaged.map(<[String]>::to_vec).unwrap_or_default(),
        breakdown: decomposition.map(Breakdown::Recipe).unwrap_or(Breakdown::None),
        text,
    }
}

fn render_recipe(text: &mut String, decomposition: &Decomposition, flow: FlowType, grams: f64) {
    match &decomposition.direct {
        Some(direct) => {
            let _ = writeln!(text, "Direct process emissions: {} kg co2-eq", direct);
        }
        None => text.push_str("No direct process emissions\n"),
    }

    if flow != FlowType::Market {
        return;
    }

    for row in &decomposition.rows {
        match row {
            DecomposedRow::Named {
                region,
                share,
                emission,
                ..
            } => {
                let _ = writeln!(
                    text,
                    "Market share for {}: {}, Impact for {} grams: {} kg co2-eq",
                    region, share, grams, emission
                );
            }
            DecomposedRow::Other { emission } => {
                let _ = writeln!(text, "Other Market Impact for {} grams: {} kg co2-eq", grams, emission);
            }
        }
    }
}

// =============================================================================
// National lifecycle source
// =============================================================================

/// Render a national-table result. The table covers `home_region` only, so
/// that is the region named in the text.
pub fn render_national(
    query: &Query<'_>,
    home_region: &str,
    grams: f64,
    resolution: &Resolution<LifecycleRecord>,
) -> ImpactReport {
    let source = Source::National;

    let Some((record, averaged, outcome)) = split(resolution) else {
        let miss = resolution.miss().unwrap_or(Miss::Product);
        let text = format!("No data available for '{}' in Agribalyse database\n", query.product);
        return ImpactReport::not_found(source, query, None, grams, miss, text);
    };

    let total = record.total * grams / 1000.0;
    let impact = sig(total);

    let mut text = opening(source, query.product, home_region, averaged);
    let _ = writeln!(text, "Impact for {} grams: {} kg co2-eq", grams, impact);
    let _ = writeln!(text, "Data quality rating: {}", record.dqr);

    let mut phases = Vec::with_capacity(6);
    for (phase, share) in record.phase_shares() {
        let phase_impact = PhaseImpact {
            phase,
            impact: sig(share * total),
            percentage: share * 100.0,
        };
        let _ = writeln!(
            text,
            "{} impact for {} grams: {} kg co2-eq, Percentage: {:.1}%",
            phase, grams, phase_impact.impact, phase_impact.percentage
        );
        phases.push(phase_impact);
    }

    ImpactReport {
        source,
        product: query.product.to_string(),
        region: home_region.to_string(),
        flow_type: None,
        grams,
        outcome,
        miss: None,
        impact: Some(impact),
        averaged_regions: averaged.map(<[String]>::to_vec).unwrap_or_default(),
        breakdown: Breakdown::Phases(phases),
        text,
    }
}

// =============================================================================
// Multi-region source
// =============================================================================

pub fn render_regional(
    query: &Query<'_>,
    grams: f64,
    resolution: &Resolution<RegionalProductRecord>,
) -> ImpactReport {
    let source = Source::MultiRegion;

    let Some((record, averaged, outcome)) = split(resolution) else {
        let miss = resolution.miss().unwrap_or(Miss::Product);
        let text = match miss {
            Miss::Region => format!(
                "No data available for '{}' in {} in BigClimateDatabase\n",
                query.product, query.region
            ),
            Miss::Activity | Miss::Product => {
                format!("No data available for '{}' in BigClimateDatabase\n", query.product)
            }
        };
        return ImpactReport::not_found(source, query, None, grams, miss, text);
    };

    let scale = grams / 1000.0;
    let impact = sig(record.total * scale);

    let mut text = opening(source, query.product, query.region, averaged);
    let _ = writeln!(text, "Impact for {} grams: {} kg co2-eq", grams, impact);

    let mut phases = Vec::with_capacity(6);
    for (phase, value) in record.phases() {
        let phase_impact = PhaseImpact {
            phase,
            impact: sig(value * scale),
            percentage: value / record.total * 100.0,
        };
        let _ = writeln!(
            text,
            "{} impact for {} grams: {} kg co2-eq, Percentage: {:.1}%",
            phase, grams, phase_impact.impact, phase_impact.percentage
        );
        phases.push(phase_impact);
    }

    ImpactReport {
        source,
        product: query.product.to_string(),
        region: query.region.to_string(),
        flow_type: None,
        grams,
        outcome,
        miss: None,
        impact: Some(impact),
        averaged_regions: averaged.map(<[String]>::to_vec).unwrap_or_default(),
        breakdown: Breakdown::Phases(phases),
        text,
    }
}
