//! Cheap exact-region availability checks used before full resolution

use crate::reference::{capitalize_first as capitalize, FlowType};
use crate::resolve::{ProcessFlowAdapter, Query, RegionalAdapter, SourceAdapter};
use crate::snapshot::Snapshot;

/// Suffix marking candidates that only have approximate data for a region
pub const APPROXIMATE_MARK: &str = " *";

pub struct AvailabilityProber<'a> {
    snapshot: &'a Snapshot,
    home_region: &'a str,
}

impl<'a> AvailabilityProber<'a> {
    pub fn new(snapshot: &'a Snapshot, home_region: &'a str) -> Self {
        Self {
            snapshot,
            home_region,
        }
    }

    /// Whether any source has a non-approximate answer for `product` in
    /// `region`. Never averages.
    pub fn has_data(&self, product: &str, region: &str) -> bool {
        let market = Query::new(product, FlowType::Market, region);
        let process = ProcessFlowAdapter::new(&self.snapshot.reference, &self.snapshot.process);
        if process.lookup(&market).is_ok() {
            return true;
        }

        let untyped = Query::untyped(product, region);
        if RegionalAdapter::new(&self.snapshot.regional).lookup(&untyped).is_ok() {
            return true;
        }

        region == self.home_region
            && self.snapshot.national.iter().any(|r| r.product_name == product)
    }

    /// Sorted, de-duplicated candidate names with their first letter
    /// capitalized; names without exact data for `region` are marked.
    pub fn label_candidates<S: AsRef<str>>(&self, names: &[S], region: &str) -> Vec<String> {
        let mut unique: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
        unique.sort_by_key(|name| capitalize(name));
        unique.dedup_by_key(|name| capitalize(name));

        unique
            .into_iter()
            .map(|name| {
                let label = capitalize(name);
                if self.has_data(name, region) {
                    label
                } else {
                    label + APPROXIMATE_MARK
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{FootprintRecord, LifecycleRecord, ProcessFlowTables};
    use crate::reference::{ActivityRecord, ReferenceTables, RegionRecord};

    fn snapshot() -> Snapshot {
        let reference = ReferenceTables::new(
            vec![
                ActivityRecord {
                    code: "A_TOM".into(),
                    description: "tomatoes".into(),
                    flow_type: FlowType::Product,
                },
                ActivityRecord {
                    code: "M_TOM".into(),
                    description: "tomatoes".into(),
                    flow_type: FlowType::Market,
                },
            ],
            vec![
                RegionRecord {
                    code: "NL".into(),
                    display_name: "Netherlands".into(),
                },
                RegionRecord {
                    code: "DE".into(),
                    display_name: "Germany".into(),
                },
            ],
        );
        let footprint = |code: &str, region: &str| FootprintRecord {
            flow_code: code.into(),
            region_code: region.into(),
            value: 1.0,
            unit_reference: "tonnes".into(),
            version: "v1.0.0".into(),
        };
        let process = ProcessFlowTables::new(
            vec![footprint("M_TOM", "NL"), footprint("A_TOM", "DE")],
            vec![],
        );
        let national = vec![LifecycleRecord {
            group: String::new(),
            subgroup: String::new(),
            product_name: "Tomato, raw".into(),
            dqr: 2.0,
            agriculture: 1.0,
            processing: 0.0,
            packaging: 0.0,
            transportation: 0.0,
            retail: 0.0,
            consumption: 0.0,
            total: 1.0,
        }];
        Snapshot::new(reference, process, national, vec![])
    }

    #[test]
    fn test_market_lookup_counts_product_lookup_does_not() {
        let snapshot = snapshot();
        let prober = AvailabilityProber::new(&snapshot, "France");
        assert!(prober.has_data("tomatoes", "Netherlands"));
        // Only a production footprint exists for Germany
        assert!(!prober.has_data("tomatoes", "Germany"));
    }

    #[test]
    fn test_national_only_counts_in_home_region() {
        let snapshot = snapshot();
        let prober = AvailabilityProber::new(&snapshot, "France");
        assert!(prober.has_data("Tomato, raw", "France"));
        assert!(!prober.has_data("Tomato, raw", "Netherlands"));
    }

    #[test]
    fn test_label_candidates() {
        let snapshot = snapshot();
        let prober = AvailabilityProber::new(&snapshot, "France");
        let labels = prober.label_candidates(&["tomatoes", "Tomato, raw", "tomatoes"], "Netherlands");
        assert_eq!(labels, vec!["Tomato, raw *", "Tomatoes"]);
    }
}
