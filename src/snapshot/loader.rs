use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

use super::{
    Snapshot, ACTIVITIES_FILE, FOOTPRINTS_FILE, LOCATIONS_FILE, NATIONAL_FILE, RECIPES_FILE,
    REGIONAL_FILE,
};
use crate::config::EngineConfig;
use crate::records::{
    FootprintRecord, LifecycleRecord, ProcessFlowTables, RawRecipe, RecipeRow, RegionalProductRecord,
};
use crate::reference::{ActivityRecord, ReferenceTables, RegionRecord};

/// Load every snapshot table from `config.data_dir`
pub fn load_snapshot(config: &EngineConfig) -> Result<Snapshot> {
    let bonsai_dir = config.bonsai_dir();

    let activities: Vec<ActivityRecord> = read_json_array(&bonsai_dir.join(ACTIVITIES_FILE))?;
    let regions: Vec<RegionRecord> = read_json_array(&bonsai_dir.join(LOCATIONS_FILE))?;
    let reference = ReferenceTables::new(activities, regions);

    let footprints: Vec<FootprintRecord> = read_json_array(&bonsai_dir.join(FOOTPRINTS_FILE))?;
    let footprints = filter_footprints(footprints, config);

    let recipes: Vec<RawRecipe> = read_json_array(&bonsai_dir.join(RECIPES_FILE))?;
    let recipes = filter_recipes(recipes, config);

    let national: Vec<LifecycleRecord> = read_csv(&config.data_dir.join(NATIONAL_FILE))?;
    let regional: Vec<RegionalProductRecord> = read_csv(&config.data_dir.join(REGIONAL_FILE))?;

    let snapshot = Snapshot::new(
        reference,
        ProcessFlowTables::new(footprints, recipes),
        national,
        regional,
    );

    info!(
        activities = snapshot.reference.activities().len(),
        regions = snapshot.reference.regions().len(),
        footprints = snapshot.process.footprints().len(),
        recipes = snapshot.process.recipes().len(),
        national = snapshot.national.len(),
        regional = snapshot.regional.len(),
        "Loaded snapshot from {:?}",
        config.data_dir
    );

    Ok(snapshot)
}

/// Keep only footprints of the configured version and reference unit
pub fn filter_footprints(footprints: Vec<FootprintRecord>, config: &EngineConfig) -> Vec<FootprintRecord> {
    let before = footprints.len();
    let kept: Vec<FootprintRecord> = footprints
        .into_iter()
        .filter(|fp| fp.version == config.bonsai_version && fp.unit_reference == config.unit_reference)
        .collect();
    debug!("Kept {} of {} footprints", kept.len(), before);
    kept
}

/// Keep only recipes of the configured version
pub fn filter_recipes(recipes: Vec<RawRecipe>, config: &EngineConfig) -> Vec<RecipeRow> {
    let before = recipes.len();
    let kept: Vec<RecipeRow> = recipes
        .into_iter()
        .filter(|r| r.version == config.bonsai_version)
        .map(RecipeRow::from)
        .collect();
    debug!("Kept {} of {} recipe rows", kept.len(), before);
    kept
}

/// Read a file holding a single JSON array
pub fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Failed to open: {:?}", path))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse JSON array in {:?}", path))
}

/// Read a headed CSV file into records
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Failed to open: {:?}", path))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let mut rows = Vec::new();
    for (line, record) in reader.deserialize::<T>().enumerate() {
        let row: T = record.with_context(|| format!("Failed to parse row {} in {:?}", line + 1, path))?;
        rows.push(row);
    }
    Ok(rows)
}
