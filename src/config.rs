use std::path::PathBuf;

/// Snapshot version kept from the process-flow footprint and recipe tables
pub const DEFAULT_BONSAI_VERSION: &str = "v1.0.0";

/// Reference unit kept from the process-flow footprint table
pub const DEFAULT_UNIT_REFERENCE: &str = "tonnes";

/// The only region the national lifecycle table covers
pub const NATIONAL_HOME_REGION: &str = "France";

/// Default requested mass for the process-flow and multi-region sources
pub const DEFAULT_GRAMS: f64 = 1000.0;

/// Default requested mass for the national lifecycle source
pub const NATIONAL_DEFAULT_GRAMS: f64 = 100.0;

/// Settings that decide which snapshot is loaded and how it is interpreted
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Directory holding the snapshot files
    pub data_dir: PathBuf,
    pub bonsai_version: String,
    pub unit_reference: String,
    pub home_region: String,
}

impl EngineConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            bonsai_version: DEFAULT_BONSAI_VERSION.to_string(),
            unit_reference: DEFAULT_UNIT_REFERENCE.to_string(),
            home_region: NATIONAL_HOME_REGION.to_string(),
        }
    }

    pub fn with_bonsai_version(mut self, version: impl Into<String>) -> Self {
        self.bonsai_version = version.into();
        self
    }

    pub fn bonsai_dir(&self) -> PathBuf {
        self.data_dir.join("BONSAI")
    }
}
