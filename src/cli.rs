use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{DEFAULT_BONSAI_VERSION, NATIONAL_HOME_REGION};
use crate::reference::FlowType;
use crate::resolve::Source;

#[derive(Parser, Debug)]
#[command(name = "food-footprint")]
#[command(version, about = "Resolve food greenhouse-gas footprints from BONSAI, Agribalyse and the Big Climate Database")]
pub struct Cli {
    /// Directory holding the snapshot files
    #[arg(long, global = true, env = "FOOTPRINT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// BONSAI snapshot version to keep when loading
    #[arg(long, global = true, default_value = DEFAULT_BONSAI_VERSION)]
    pub bonsai_version: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Bonsai,
    Agribalyse,
    BigClimate,
}

impl From<SourceArg> for Source {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Bonsai => Source::ProcessFlow,
            SourceArg::Agribalyse => Source::National,
            SourceArg::BigClimate => Source::MultiRegion,
        }
    }
}

/// Flow types a caller may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlowTypeArg {
    Product,
    Market,
}

impl From<FlowTypeArg> for FlowType {
    fn from(arg: FlowTypeArg) -> Self {
        match arg {
            FlowTypeArg::Product => FlowType::Product,
            FlowTypeArg::Market => FlowType::Market,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the footprint of one product in one source
    Resolve {
        /// Product name exactly as it appears in the source
        product: String,

        #[arg(short, long, value_enum)]
        source: SourceArg,

        /// BONSAI flow type
        #[arg(short, long, value_enum, default_value_t = FlowTypeArg::Product)]
        flow_type: FlowTypeArg,

        /// Region display name
        #[arg(short, long, default_value = NATIONAL_HOME_REGION)]
        region: String,

        /// Requested mass in grams (default depends on the source)
        #[arg(short, long)]
        grams: Option<f64>,

        /// Print the structured report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether any source has exact data for a product in a region
    Probe {
        product: String,

        #[arg(short, long)]
        region: String,
    },

    /// Download missing BONSAI snapshot files
    Fetch {
        /// BONSAI API token
        #[arg(short, long, env = "BONSAI_TOKEN", hide_env_values = true)]
        token: String,

        /// Re-download files that already exist
        #[arg(long)]
        force: bool,
    },

    /// Export the loaded snapshot to a SQLite database
    Export {
        /// Output SQLite database path
        output_db: PathBuf,

        /// Only include these tables (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        include: Option<Vec<String>>,

        /// Exclude these tables (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,
    },

    /// List region display names known to BONSAI
    ListRegions,

    /// List all exportable table names
    ListTables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
