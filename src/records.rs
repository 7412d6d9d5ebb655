//! Record types for the three footprint sources

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Recipe inputs that stand for direct emissions rather than a supplying activity
pub const DIRECT_INPUT: &str = "direct";
/// Recipe inputs that collect everything not attributed to a named input
pub const OTHER_INPUT: &str = "other";

/// Display names of the national source's lifecycle phases, in column order
pub const NATIONAL_PHASES: [&str; 6] = [
    "Agriculture",
    "Processing",
    "Packaging",
    "Transportation",
    "Retail",
    "Consumption",
];

/// Display names of the multi-region source's phases, in column order
pub const REGIONAL_PHASES: [&str; 6] = [
    "Agriculture",
    "Indirect Land Use Change",
    "Food processing",
    "Packaging",
    "Transport",
    "Retail",
];

fn missing_value() -> f64 {
    f64::NAN
}

fn nan_if_missing<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

// =============================================================================
// Process-flow source
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintRecord {
    pub flow_code: String,
    pub region_code: String,
    #[serde(deserialize_with = "nan_if_missing")]
    pub value: f64,
    pub unit_reference: String,
    pub version: String,
}

/// A recipe row exactly as it appears in the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecipe {
    pub flow_reference: String,
    pub region_reference: String,
    pub flow_input: String,
    #[serde(default)]
    pub region_inflow: Option<String>,
    #[serde(default = "missing_value", deserialize_with = "nan_if_missing")]
    pub value_inflow: f64,
    #[serde(default = "missing_value", deserialize_with = "nan_if_missing")]
    pub value_emission: f64,
    #[serde(default)]
    pub unit_inflow: Option<String>,
    #[serde(default)]
    pub version: String,
}

/// One contributing input of a composite flow
#[derive(Debug, Clone, PartialEq)]
pub enum Edge {
    /// Emissions of the process itself
    Direct { emission: f64 },
    /// Residual impact not attributed to a named input
    Other { emission: f64 },
    Named {
        input: String,
        region: String,
        value_inflow: f64,
        unit: String,
        emission: f64,
    },
}

impl Edge {
    pub fn emission(&self) -> f64 {
        match self {
            Edge::Direct { emission } | Edge::Other { emission } => *emission,
            Edge::Named { emission, .. } => *emission,
        }
    }

    /// Input code as stored in the snapshot, sentinels included
    pub fn input_code(&self) -> &str {
        match self {
            Edge::Direct { .. } => DIRECT_INPUT,
            Edge::Other { .. } => OTHER_INPUT,
            Edge::Named { input, .. } => input,
        }
    }
}

impl From<RawRecipe> for Edge {
    fn from(raw: RawRecipe) -> Self {
        match raw.flow_input.as_str() {
            DIRECT_INPUT => Edge::Direct {
                emission: raw.value_emission,
            },
            OTHER_INPUT => Edge::Other {
                emission: raw.value_emission,
            },
            _ => Edge::Named {
                input: raw.flow_input,
                region: raw.region_inflow.unwrap_or_default(),
                value_inflow: raw.value_inflow,
                unit: raw.unit_inflow.unwrap_or_default(),
                emission: raw.value_emission,
            },
        }
    }
}

/// A recipe edge keyed by the composite flow it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRow {
    pub flow_reference: String,
    pub region_reference: String,
    pub edge: Edge,
}

impl From<RawRecipe> for RecipeRow {
    fn from(raw: RawRecipe) -> Self {
        Self {
            flow_reference: raw.flow_reference.clone(),
            region_reference: raw.region_reference.clone(),
            edge: Edge::from(raw),
        }
    }
}

/// Footprints and recipes of the process-flow source, indexed by flow
#[derive(Debug, Clone, Default)]
pub struct ProcessFlowTables {
    footprints: Vec<FootprintRecord>,
    recipes: Vec<RecipeRow>,
    /// flow_code -> footprint positions, in snapshot order
    by_flow: HashMap<String, Vec<usize>>,
    /// (flow_reference, region_reference) -> recipe positions, in snapshot order
    by_anchor: HashMap<(String, String), Vec<usize>>,
}

impl ProcessFlowTables {
    pub fn new(footprints: Vec<FootprintRecord>, recipes: Vec<RecipeRow>) -> Self {
        let mut by_flow: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, fp) in footprints.iter().enumerate() {
            by_flow.entry(fp.flow_code.clone()).or_default().push(idx);
        }

        let mut by_anchor: HashMap<(String, String), Vec<usize>> = HashMap::new();
        for (idx, row) in recipes.iter().enumerate() {
            by_anchor
                .entry((row.flow_reference.clone(), row.region_reference.clone()))
                .or_default()
                .push(idx);
        }

        Self {
            footprints,
            recipes,
            by_flow,
            by_anchor,
        }
    }

    pub fn footprints(&self) -> &[FootprintRecord] {
        &self.footprints
    }

    pub fn recipes(&self) -> &[RecipeRow] {
        &self.recipes
    }

    /// All footprints for a flow across regions, in snapshot order
    pub fn footprints_for<'a>(&'a self, flow_code: &str) -> impl Iterator<Item = &'a FootprintRecord> + 'a {
        self.by_flow
            .get(flow_code)
            .map(|positions| positions.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&idx| &self.footprints[idx])
    }

    /// First footprint for (flow, region); later duplicates are ignored
    pub fn footprint(&self, flow_code: &str, region_code: &str) -> Option<&FootprintRecord> {
        self.footprints_for(flow_code)
            .find(|fp| fp.region_code == region_code)
    }

    /// Recipe edges of a composite flow in a region, in snapshot order
    pub fn edges<'a>(&'a self, flow_code: &str, region_code: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.by_anchor
            .get(&(flow_code.to_string(), region_code.to_string()))
            .map(|positions| positions.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&idx| &self.recipes[idx].edge)
    }
}

// =============================================================================
// National lifecycle source
// =============================================================================

/// One product of the national table. Phase columns are fractions of `total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleRecord {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub subgroup: String,
    pub product_name: String,
    #[serde(deserialize_with = "nan_if_missing")]
    pub dqr: f64,
    #[serde(deserialize_with = "nan_if_missing")]
    pub agriculture: f64,
    #[serde(deserialize_with = "nan_if_missing")]
    pub processing: f64,
    #[serde(deserialize_with = "nan_if_missing")]
    pub packaging: f64,
    #[serde(deserialize_with = "nan_if_missing")]
    pub transportation: f64,
    #[serde(deserialize_with = "nan_if_missing")]
    pub retail: f64,
    #[serde(deserialize_with = "nan_if_missing")]
    pub consumption: f64,
    #[serde(deserialize_with = "nan_if_missing")]
    pub total: f64,
}

impl LifecycleRecord {
    /// Phase shares paired with their display names
    pub fn phase_shares(&self) -> [(&'static str, f64); 6] {
        let values = [
            self.agriculture,
            self.processing,
            self.packaging,
            self.transportation,
            self.retail,
            self.consumption,
        ];
        let mut out = [("", 0.0); 6];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = (NATIONAL_PHASES[i], values[i]);
        }
        out
    }
}

// =============================================================================
// Multi-region source
// =============================================================================

/// One (product, region) row of the multi-region table. Phase columns are
/// absolute impacts per kilogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalProductRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "Total kg CO2-eq/kg", deserialize_with = "nan_if_missing")]
    pub total: f64,
    #[serde(rename = "Agriculture", deserialize_with = "nan_if_missing")]
    pub agriculture: f64,
    #[serde(rename = "iLUC", deserialize_with = "nan_if_missing")]
    pub iluc: f64,
    #[serde(rename = "Food processing", deserialize_with = "nan_if_missing")]
    pub food_processing: f64,
    #[serde(rename = "Packaging", deserialize_with = "nan_if_missing")]
    pub packaging: f64,
    #[serde(rename = "Transport", deserialize_with = "nan_if_missing")]
    pub transport: f64,
    #[serde(rename = "Retail", deserialize_with = "nan_if_missing")]
    pub retail: f64,
    pub region: String,
}

impl RegionalProductRecord {
    /// Phase impacts paired with their display names
    pub fn phases(&self) -> [(&'static str, f64); 6] {
        let values = [
            self.agriculture,
            self.iluc,
            self.food_processing,
            self.packaging,
            self.transport,
            self.retail,
        ];
        let mut out = [("", 0.0); 6];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = (REGIONAL_PHASES[i], values[i]);
        }
        out
    }

    /// Copy of this record with a new total and every phase rescaled by
    /// `total / self.total`. A zero or non-finite original total leaves the
    /// phases untouched.
    pub fn rescaled_to(&self, total: f64) -> Self {
        let ratio = if self.total != 0.0 && self.total.is_finite() {
            total / self.total
        } else {
            1.0
        };
        Self {
            total,
            agriculture: self.agriculture * ratio,
            iluc: self.iluc * ratio,
            food_processing: self.food_processing * ratio,
            packaging: self.packaging * ratio,
            transport: self.transport * ratio,
            retail: self.retail * ratio,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(input: &str, emission: f64) -> RawRecipe {
        RawRecipe {
            flow_reference: "M_TOM".into(),
            region_reference: "NL".into(),
            flow_input: input.into(),
            region_inflow: Some("ES".into()),
            value_inflow: 0.4,
            value_emission: emission,
            unit_inflow: Some("tonnes".into()),
            version: "v1.0.0".into(),
        }
    }

    #[test]
    fn test_sentinel_inputs_become_tagged_edges() {
        assert_eq!(Edge::from(raw("direct", 0.1)), Edge::Direct { emission: 0.1 });
        assert_eq!(Edge::from(raw("other", 0.02)), Edge::Other { emission: 0.02 });
        match Edge::from(raw("A_TOM", 0.2)) {
            Edge::Named { input, region, unit, .. } => {
                assert_eq!(input, "A_TOM");
                assert_eq!(region, "ES");
                assert_eq!(unit, "tonnes");
            }
            other => panic!("expected named edge, got {:?}", other),
        }
    }

    #[test]
    fn test_null_recipe_values_load_as_nan() {
        let json = r#"{"flow_reference":"M","region_reference":"NL","flow_input":"other",
            "region_inflow":null,"value_inflow":null,"value_emission":null,"unit_inflow":null,
            "version":"v1.0.0"}"#;
        let raw: RawRecipe = serde_json::from_str(json).unwrap();
        assert!(raw.value_emission.is_nan());
        assert!(raw.region_inflow.is_none());
    }

    #[test]
    fn test_footprint_lookup_takes_first_duplicate() {
        let fp = |region: &str, value: f64| FootprintRecord {
            flow_code: "M_TOM".into(),
            region_code: region.into(),
            value,
            unit_reference: "tonnes".into(),
            version: "v1.0.0".into(),
        };
        let tables = ProcessFlowTables::new(vec![fp("NL", 0.5), fp("ES", 0.3), fp("NL", 9.0)], vec![]);

        assert_eq!(tables.footprint("M_TOM", "NL").unwrap().value, 0.5);
        assert_eq!(tables.footprints_for("M_TOM").count(), 3);
        assert!(tables.footprint("M_TOM", "DE").is_none());
        assert_eq!(tables.edges("M_TOM", "NL").count(), 0);
    }

    #[test]
    fn test_rescale_preserves_phase_shape() {
        let rec = RegionalProductRecord {
            name: "Carrot".into(),
            category: "Vegetables".into(),
            total: 2.0,
            agriculture: 1.0,
            iluc: 0.0,
            food_processing: 0.5,
            packaging: 0.25,
            transport: 0.25,
            retail: 0.0,
            region: "Denmark".into(),
        };
        let scaled = rec.rescaled_to(4.0);
        assert_eq!(scaled.total, 4.0);
        assert_eq!(scaled.agriculture, 2.0);
        assert_eq!(scaled.food_processing, 1.0);
        assert_eq!(scaled.region, "Denmark");
    }
}
