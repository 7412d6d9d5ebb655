use anyhow::{Context, Result};
use food_footprint::{
    cli::{Cli, Commands},
    config::EngineConfig,
    download::{fetch_missing, BonsaiClient, SnapshotDir},
    engine::FootprintEngine,
    filter::resolve_tables,
    schema::table_names,
    snapshot::load_snapshot,
    ui::{ConsoleUi, Phase, Ui},
    writer::export_snapshot,
};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();
    let snapshot_dir = SnapshotDir::new(cli.data_dir)?;
    let config = EngineConfig::new(snapshot_dir.data_dir()).with_bonsai_version(cli.bonsai_version);
    let mut ui = ConsoleUi::default();

    match cli.command {
        Commands::Resolve {
            product,
            source,
            flow_type,
            region,
            grams,
            json,
        } => {
            let engine = load_engine(&config, &mut ui)?;
            let report = engine.resolve(source.into(), &product, flow_type.into(), &region, grams);

            if json {
                let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
                println!("{}", out);
            } else {
                print!("{}", report.text);
            }
        }

        Commands::Probe { product, region } => {
            let engine = load_engine(&config, &mut ui)?;
            if engine.has_data(&product, &region) {
                println!("'{}' has data for {}", product, region);
            } else {
                println!("'{}' has no exact data for {}", product, region);
            }
        }

        Commands::Fetch { token, force } => {
            let start = Instant::now();
            let client = BonsaiClient::new(token)?;
            let fetched = fetch_missing(&snapshot_dir, &client, force, &mut ui)?;
            println!(
                "Fetched {} file(s) into {:?} in {:.1}s",
                fetched.len(),
                snapshot_dir.bonsai_dir(),
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Export {
            output_db,
            include,
            exclude,
        } => {
            let start = Instant::now();

            let tables = resolve_tables(include, exclude)?;
            let engine = load_engine(&config, &mut ui)?;
            let record_count = export_snapshot(engine.snapshot(), &output_db, &tables, &mut ui)?;

            println!(
                "Created {:?} ({} records) in {:.1}s",
                output_db,
                record_count,
                start.elapsed().as_secs_f64()
            );
        }

        Commands::ListRegions => {
            let engine = load_engine(&config, &mut ui)?;
            for region in engine.snapshot().reference.regions() {
                println!("  {:8} {}", region.code, region.display_name);
            }
        }

        Commands::ListTables => {
            println!("Available tables:\n");
            for name in table_names() {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}

fn load_engine(config: &EngineConfig, ui: &mut impl Ui) -> Result<FootprintEngine> {
    ui.set_phase(Phase::Loading);
    let snapshot = load_snapshot(config)?;
    Ok(FootprintEngine::new(snapshot, config))
}
