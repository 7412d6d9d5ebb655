use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use crate::snapshot::{
    ACTIVITIES_FILE, FOOTPRINTS_FILE, LOCATIONS_FILE, NATIONAL_FILE, RECIPES_FILE, REGIONAL_FILE,
};

/// Process-flow snapshot files, in fetch order
pub const BONSAI_FILES: &[&str] = &[FOOTPRINTS_FILE, RECIPES_FILE, LOCATIONS_FILE, ACTIVITIES_FILE];

/// On-disk layout of the snapshot files
pub struct SnapshotDir {
    data_dir: PathBuf,
}

impl SnapshotDir {
    /// Use `custom_dir`, or the platform data directory when `None`
    pub fn new(custom_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match custom_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        fs::create_dir_all(data_dir.join("BONSAI"))
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn bonsai_dir(&self) -> PathBuf {
        self.data_dir.join("BONSAI")
    }

    pub fn bonsai_path(&self, file: &str) -> PathBuf {
        self.bonsai_dir().join(file)
    }

    /// Process-flow files not present on disk
    pub fn missing_bonsai_files(&self) -> Vec<&'static str> {
        BONSAI_FILES
            .iter()
            .copied()
            .filter(|file| !self.bonsai_path(file).exists())
            .collect()
    }

    /// Spreadsheet-derived files not present on disk. These are prepared
    /// outside this tool.
    pub fn missing_table_files(&self) -> Vec<&'static str> {
        [NATIONAL_FILE, REGIONAL_FILE]
            .into_iter()
            .filter(|file| !self.data_dir.join(file).exists())
            .collect()
    }
}

/// Platform data directory for snapshot files
pub fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs =
        ProjectDirs::from("", "", "food-footprint").context("Could not determine data directory")?;
    Ok(proj_dirs.data_dir().to_path_buf())
}
