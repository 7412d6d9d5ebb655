//! Decomposition of a process-flow footprint into its recipe inputs

use serde::Serialize;
use std::cmp::Ordering;

use crate::figures::{sig, Figure};
use crate::records::{Edge, ProcessFlowTables};
use crate::reference::ReferenceTables;

/// Label for named inputs whose supplying region is not recorded
pub const UNKNOWN_REGION: &str = "unknown region";

/// One displayed recipe row. Direct emissions never appear here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecomposedRow {
    Named {
        /// Translated input activity name
        input: String,
        /// Translated supplying region name
        region: String,
        /// Inflow quantity with its display unit
        share: String,
        /// Impact attributed to this input for the requested mass
        emission: Figure,
    },
    Other {
        emission: Figure,
    },
}

impl DecomposedRow {
    pub fn emission(&self) -> &Figure {
        match self {
            DecomposedRow::Named { emission, .. } | DecomposedRow::Other { emission } => emission,
        }
    }
}

/// Recipe of a flow, scaled to a requested mass and ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decomposition {
    /// Direct process emissions; `None` when the recipe has no direct row
    pub direct: Option<Figure>,
    /// Named inputs by descending impact, then every "other" row
    pub rows: Vec<DecomposedRow>,
}

/// Decompose the recipe anchored at (flow, region) for `grams` of product.
/// Returns `None` when the anchor has no recipe edges.
pub fn decompose(
    reference: &ReferenceTables,
    tables: &ProcessFlowTables,
    flow_code: &str,
    region_code: &str,
    grams: f64,
) -> Option<Decomposition> {
    let scale = grams / 1000.0;

    let mut seen_any = false;
    let mut direct = None;
    let mut named: Vec<(f64, DecomposedRow)> = Vec::new();
    let mut others: Vec<DecomposedRow> = Vec::new();

    for edge in tables.edges(flow_code, region_code) {
        seen_any = true;
        match edge {
            Edge::Direct { emission } => {
                if direct.is_none() {
                    direct = Some(sig(emission * scale));
                }
            }
            Edge::Other { emission } => others.push(DecomposedRow::Other {
                emission: sig(emission * scale),
            }),
            Edge::Named {
                input,
                region,
                value_inflow,
                unit,
                emission,
            } => {
                let scaled = emission * scale;
                let share = format!("{} {}", sig(*value_inflow), reference.unit_name(unit));
                named.push((
                    scaled,
                    DecomposedRow::Named {
                        input: reference.activity_name(input),
                        region: region_label(reference, region),
                        share: share.trim_end().to_string(),
                        emission: sig(scaled),
                    },
                ));
            }
        }
    }

    if !seen_any {
        return None;
    }

    // Stable: equal impacts keep snapshot order
    named.sort_by(|a, b| by_descending_impact(a.0, b.0));

    let rows = named
        .into_iter()
        .map(|(_, row)| row)
        .chain(others)
        .collect();

    Some(Decomposition { direct, rows })
}

/// Display name of a supplying region. Rows without one are labelled
/// [`UNKNOWN_REGION`].
fn region_label(reference: &ReferenceTables, code: &str) -> String {
    if code.is_empty() {
        UNKNOWN_REGION.to_string()
    } else {
        reference.region_name(code).to_string()
    }
}

/// Descending order with NaN impacts sorted last
fn by_descending_impact(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecipeRow;
    use crate::reference::{ActivityRecord, FlowType, RegionRecord};

    fn row(edge: Edge) -> RecipeRow {
        RecipeRow {
            flow_reference: "M_TOM".into(),
            region_reference: "NL".into(),
            edge,
        }
    }

    fn named(input: &str, emission: f64) -> Edge {
        Edge::Named {
            input: input.into(),
            region: "ES".into(),
            value_inflow: 0.25,
            unit: "tonnes".into(),
            emission,
        }
    }

    fn reference() -> ReferenceTables {
        ReferenceTables::new(
            vec![ActivityRecord {
                code: "A_TOM".into(),
                description: "tomatoes, fresh".into(),
                flow_type: FlowType::Product,
            }],
            vec![RegionRecord {
                code: "ES".into(),
                display_name: "Spain".into(),
            }],
        )
    }

    #[test]
    fn test_other_rows_go_last_and_direct_is_separate() {
        let tables = ProcessFlowTables::new(
            vec![],
            vec![
                row(Edge::Other { emission: 0.5 }),
                row(Edge::Direct { emission: 0.1 }),
                row(named("A_TOM", 0.05)),
                row(named("B_TOM", 0.2)),
            ],
        );
        let d = decompose(&reference(), &tables, "M_TOM", "NL", 1000.0).unwrap();

        assert_eq!(d.direct, Some(sig(0.1)));
        assert_eq!(d.rows.len(), 3);
        assert_eq!(d.rows[0].emission(), &sig(0.2));
        assert_eq!(d.rows[1].emission(), &sig(0.05));
        assert!(matches!(d.rows[2], DecomposedRow::Other { .. }));
    }

    #[test]
    fn test_rows_are_translated_and_scaled() {
        let tables = ProcessFlowTables::new(vec![], vec![row(named("A_TOM", 0.5))]);
        let d = decompose(&reference(), &tables, "M_TOM", "NL", 200.0).unwrap();

        assert_eq!(d.direct, None);
        assert_eq!(
            d.rows[0],
            DecomposedRow::Named {
                input: "Tomatoes, fresh".into(),
                region: "Spain".into(),
                share: "0.25 Tonnes".into(),
                emission: sig(0.1),
            }
        );
    }

    #[test]
    fn test_ties_keep_snapshot_order_and_nan_sorts_last() {
        let tables = ProcessFlowTables::new(
            vec![],
            vec![
                row(named("X1", f64::NAN)),
                row(named("X2", 0.3)),
                row(named("X3", 0.3)),
            ],
        );
        let d = decompose(&reference(), &tables, "M_TOM", "NL", 1000.0).unwrap();
        let inputs: Vec<_> = d
            .rows
            .iter()
            .map(|r| match r {
                DecomposedRow::Named { input, .. } => input.as_str(),
                DecomposedRow::Other { .. } => "other",
            })
            .collect();
        assert_eq!(inputs, vec!["X2", "X3", "X1"]);
    }

    #[test]
    fn test_missing_supplying_region_is_labelled() {
        let edge = Edge::Named {
            input: "A_TOM".into(),
            region: String::new(),
            value_inflow: 0.4,
            unit: "tonnes".into(),
            emission: 0.2,
        };
        let tables = ProcessFlowTables::new(vec![], vec![row(edge)]);
        let d = decompose(&reference(), &tables, "M_TOM", "NL", 1000.0).unwrap();

        match &d.rows[0] {
            DecomposedRow::Named { region, share, .. } => {
                assert_eq!(region, UNKNOWN_REGION);
                assert_eq!(share, "0.4 Tonnes");
            }
            other => panic!("expected named row, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_recipe_is_none() {
        let tables = ProcessFlowTables::new(vec![], vec![]);
        assert!(decompose(&reference(), &tables, "M_TOM", "NL", 1000.0).is_none());
    }
}
