//! The immutable in-memory snapshot every resolution reads from

mod loader;

pub use loader::*;

use crate::records::{LifecycleRecord, ProcessFlowTables, RegionalProductRecord};
use crate::reference::ReferenceTables;

/// Process-flow snapshot files, relative to the `BONSAI` directory
pub const ACTIVITIES_FILE: &str = "bonsai_activity-names.json";
pub const LOCATIONS_FILE: &str = "bonsai_locations.json";
pub const FOOTPRINTS_FILE: &str = "bonsai_footprints.json";
pub const RECIPES_FILE: &str = "bonsai_recipes.json";

/// National and multi-region snapshot files, relative to the data directory
pub const NATIONAL_FILE: &str = "agribalyse_data.csv";
pub const REGIONAL_FILE: &str = "bigclimatedb.csv";

/// All source tables, loaded once and shared read-only
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub reference: ReferenceTables,
    pub process: ProcessFlowTables,
    pub national: Vec<LifecycleRecord>,
    pub regional: Vec<RegionalProductRecord>,
}

impl Snapshot {
    pub fn new(
        reference: ReferenceTables,
        process: ProcessFlowTables,
        national: Vec<LifecycleRecord>,
        regional: Vec<RegionalProductRecord>,
    ) -> Self {
        Self {
            reference,
            process,
            national,
            regional,
        }
    }

    /// Total number of records across all tables
    pub fn record_count(&self) -> usize {
        self.reference.activities().len()
            + self.reference.regions().len()
            + self.process.footprints().len()
            + self.process.recipes().len()
            + self.national.len()
            + self.regional.len()
    }
}
