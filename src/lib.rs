pub mod cli;
pub mod config;
pub mod download;
pub mod engine;
pub mod figures;
pub mod filter;
pub mod probe;
pub mod recipe;
pub mod records;
pub mod reference;
pub mod report;
pub mod resolve;
pub mod schema;
pub mod snapshot;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::EngineConfig;
pub use engine::{FootprintEngine, IngredientResults, Selection};
pub use reference::FlowType;
pub use report::ImpactReport;
pub use resolve::{Miss, Resolution, Source};
pub use snapshot::{load_snapshot, Snapshot};
pub use ui::{Phase, SilentUi, Ui};
