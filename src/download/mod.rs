pub mod cache;
pub mod client;

pub use cache::*;
pub use client::*;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;

use crate::ui::{Phase, Ui};

/// Fetch the process-flow files that are not on disk yet, or all of them
/// when `force` is set. Returns the files written.
pub fn fetch_missing(
    dir: &SnapshotDir,
    client: &BonsaiClient,
    force: bool,
    ui: &mut impl Ui,
) -> Result<Vec<&'static str>> {
    ui.set_phase(Phase::Checking);
    let files = if force {
        BONSAI_FILES.to_vec()
    } else {
        dir.missing_bonsai_files()
    };

    if files.is_empty() {
        ui.log("All BONSAI files present");
    }

    ui.set_phase(Phase::Fetching);
    for file in &files {
        ui.log(format!("Downloading {}", file));
        let rows = client.fetch_table(file, ui)?;

        let path = dir.bonsai_path(file);
        let writer = BufWriter::new(
            File::create(&path).with_context(|| format!("Failed to create {:?}", path))?,
        );
        serde_json::to_writer_pretty(writer, &rows)
            .with_context(|| format!("Failed to write {:?}", path))?;
        ui.log(format!("Saved {} rows to {}", rows.len(), path.display()));
    }

    for file in dir.missing_table_files() {
        ui.log(format!("{} not found in {}", file, dir.data_dir().display()));
    }

    ui.set_phase(Phase::Complete);
    Ok(files)
}
