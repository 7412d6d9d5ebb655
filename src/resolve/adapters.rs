use super::{Averaged, Miss, Query, Source};
use crate::records::{LifecycleRecord, ProcessFlowTables, RegionalProductRecord};
use crate::reference::{FlowType, ReferenceTables};

/// Exact lookup, plus an optional cross-region average, over one source
pub trait SourceAdapter {
    type Record;

    const SOURCE: Source;

    /// Exact-match lookup on the identity and region as stored
    fn lookup(&self, query: &Query<'_>) -> Result<Self::Record, Miss>;

    /// Average over every region the source holds for the query's identity.
    /// `None` when the source cannot average or holds nothing to average.
    fn average(&self, query: &Query<'_>) -> Option<Averaged<Self::Record>>;
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn push_unique(regions: &mut Vec<String>, name: &str) {
    if !regions.iter().any(|r| r == name) {
        regions.push(name.to_string());
    }
}

// =============================================================================
// Process-flow source
// =============================================================================

/// A process-flow footprint resolved to its activity
#[derive(Debug, Clone, PartialEq)]
pub struct FlowFootprint {
    pub code: String,
    pub description: String,
    pub flow_type: FlowType,
    /// Region whose recipe decomposes this flow. For averages this is the
    /// first averaged region.
    pub region_code: String,
    /// Impact per kilogram-equivalent reference
    pub value: f64,
}

pub struct ProcessFlowAdapter<'a> {
    reference: &'a ReferenceTables,
    tables: &'a ProcessFlowTables,
}

impl<'a> ProcessFlowAdapter<'a> {
    pub fn new(reference: &'a ReferenceTables, tables: &'a ProcessFlowTables) -> Self {
        Self { reference, tables }
    }
}

impl SourceAdapter for ProcessFlowAdapter<'_> {
    type Record = FlowFootprint;

    const SOURCE: Source = Source::ProcessFlow;

    fn lookup(&self, query: &Query<'_>) -> Result<FlowFootprint, Miss> {
        let activity = self
            .reference
            .find_activity(query.product, query.flow_type)
            .ok_or(Miss::Activity)?;
        let region_code = self.reference.region_code(query.region).ok_or(Miss::Region)?;
        let footprint = self
            .tables
            .footprint(&activity.code, region_code)
            .ok_or(Miss::Region)?;

        Ok(FlowFootprint {
            code: activity.code.clone(),
            description: activity.description.clone(),
            flow_type: activity.flow_type,
            region_code: footprint.region_code.clone(),
            value: footprint.value,
        })
    }

    fn average(&self, query: &Query<'_>) -> Option<Averaged<FlowFootprint>> {
        let activity = self.reference.find_activity(query.product, query.flow_type)?;
        // Missing values never enter the average or the region list
        let footprints: Vec<_> = self
            .tables
            .footprints_for(&activity.code)
            .filter(|fp| fp.value.is_finite())
            .collect();
        let anchor = footprints.first()?;
        let value = mean(footprints.iter().map(|fp| fp.value))?;

        let mut regions = Vec::new();
        for fp in &footprints {
            push_unique(&mut regions, self.reference.region_name(&fp.region_code));
        }

        Some(Averaged {
            record: FlowFootprint {
                code: activity.code.clone(),
                description: activity.description.clone(),
                flow_type: activity.flow_type,
                region_code: anchor.region_code.clone(),
                value,
            },
            regions,
        })
    }
}

// =============================================================================
// National lifecycle source
// =============================================================================

/// Single-region source: the region of the query is ignored
pub struct NationalAdapter<'a> {
    records: &'a [LifecycleRecord],
}

impl<'a> NationalAdapter<'a> {
    pub fn new(records: &'a [LifecycleRecord]) -> Self {
        Self { records }
    }
}

impl SourceAdapter for NationalAdapter<'_> {
    type Record = LifecycleRecord;

    const SOURCE: Source = Source::National;

    fn lookup(&self, query: &Query<'_>) -> Result<LifecycleRecord, Miss> {
        self.records
            .iter()
            .find(|r| r.product_name == query.product)
            .cloned()
            .ok_or(Miss::Product)
    }

    fn average(&self, _query: &Query<'_>) -> Option<Averaged<LifecycleRecord>> {
        None
    }
}

// =============================================================================
// Multi-region source
// =============================================================================

pub struct RegionalAdapter<'a> {
    records: &'a [RegionalProductRecord],
}

impl<'a> RegionalAdapter<'a> {
    pub fn new(records: &'a [RegionalProductRecord]) -> Self {
        Self { records }
    }
}

impl SourceAdapter for RegionalAdapter<'_> {
    type Record = RegionalProductRecord;

    const SOURCE: Source = Source::MultiRegion;

    fn lookup(&self, query: &Query<'_>) -> Result<RegionalProductRecord, Miss> {
        let mut found_product = false;
        for record in self.records.iter().filter(|r| r.name == query.product) {
            found_product = true;
            if record.region == query.region {
                return Ok(record.clone());
            }
        }
        Err(if found_product { Miss::Region } else { Miss::Product })
    }

    /// Averages the finite totals; phases come from the first contributing
    /// region's record, rescaled to the averaged total.
    fn average(&self, query: &Query<'_>) -> Option<Averaged<RegionalProductRecord>> {
        let records: Vec<_> = self
            .records
            .iter()
            .filter(|r| r.name == query.product && r.total.is_finite())
            .collect();
        let first = records.first()?;
        let total = mean(records.iter().map(|r| r.total))?;

        let mut regions = Vec::new();
        for record in &records {
            push_unique(&mut regions, &record.region);
        }

        Some(Averaged {
            record: first.rescaled_to(total),
            regions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::FootprintRecord;
    use crate::reference::ActivityRecord;

    #[test]
    fn test_mean() {
        assert!((mean([0.5, 0.3]).unwrap() - 0.4).abs() < 1e-12);
        assert_eq!(mean(Vec::<f64>::new()), None);
    }

    fn footprint(region_code: &str, value: f64) -> FootprintRecord {
        FootprintRecord {
            flow_code: "M_TOM".into(),
            region_code: region_code.into(),
            value,
            unit_reference: "tonnes".into(),
            version: "v1.0.0".into(),
        }
    }

    fn regional(region: &str, total: f64) -> RegionalProductRecord {
        RegionalProductRecord {
            name: "Tomato".into(),
            category: "Vegetables".into(),
            total,
            agriculture: total,
            iluc: 0.0,
            food_processing: 0.0,
            packaging: 0.0,
            transport: 0.0,
            retail: 0.0,
            region: region.into(),
        }
    }

    #[test]
    fn test_average_skips_missing_values() {
        let reference = ReferenceTables::new(
            vec![ActivityRecord {
                code: "M_TOM".into(),
                description: "Tomato".into(),
                flow_type: FlowType::Market,
            }],
            vec![],
        );
        let tables = ProcessFlowTables::new(
            vec![footprint("PL", f64::NAN), footprint("ES", 0.3), footprint("FR", 0.5)],
            vec![],
        );
        let adapter = ProcessFlowAdapter::new(&reference, &tables);

        let averaged = adapter
            .average(&Query::new("Tomato", FlowType::Market, "Netherlands"))
            .unwrap();
        assert!((averaged.record.value - 0.4).abs() < 1e-12);
        assert_eq!(averaged.record.region_code, "ES");
        assert_eq!(averaged.regions, vec!["ES", "FR"]);
    }

    #[test]
    fn test_average_of_only_missing_values_is_none() {
        let records = vec![regional("Spain", f64::NAN), regional("Denmark", f64::NAN)];
        let adapter = RegionalAdapter::new(&records);
        assert!(adapter.average(&Query::untyped("Tomato", "Netherlands")).is_none());

        let records = vec![regional("Spain", f64::NAN), regional("Denmark", 1.0)];
        let adapter = RegionalAdapter::new(&records);
        let averaged = adapter.average(&Query::untyped("Tomato", "Netherlands")).unwrap();
        assert_eq!(averaged.record.region, "Denmark");
        assert_eq!(averaged.record.total, 1.0);
        assert_eq!(averaged.regions, vec!["Denmark"]);
    }

    #[test]
    fn test_push_unique_keeps_first_order() {
        let mut regions = Vec::new();
        for name in ["Spain", "France", "Spain", "Italy"] {
            push_unique(&mut regions, name);
        }
        assert_eq!(regions, vec!["Spain", "France", "Italy"]);
    }
}
