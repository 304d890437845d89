use std::fs::File;
use std::io;
use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use phylostate::OutputFormat;
use phylostate::core::config::{load_config, resolve};
use phylostate::core::dataset::{load_dataset, read_dataset};
use phylostate::core::script::{ReplayReport, atomic_write_json, read_script, replay, script_schema};
use phylostate::core::store::{Dispatch, Store};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "phylostate", about = "Replay tree-view interactions against a dataset")]
struct Args {
    /// Dataset JSON (tree, metadata, sequences)
    #[arg(short, long, required_unless_present = "schema")]
    dataset: Option<PathBuf>,

    /// Replay script (.toml or .json)
    #[arg(short, long, required_unless_present = "schema")]
    script: Option<PathBuf>,

    /// Write the full report as JSON to this path
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// How to print the report
    #[arg(short, long, default_value_t, value_enum)]
    format: OutputFormat,

    /// Initial color-by (overrides config and PHYLOSTATE_COLOR_BY)
    #[arg(long)]
    color_by: Option<String>,

    /// Print the JSON Schema of replay scripts and exit
    #[arg(long)]
    schema: bool,
}

fn invalid_data<E: std::error::Error + Send + Sync + 'static>(e: E) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to phylostate.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("phylostate.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    if args.schema {
        println!("{}", script_schema().map_err(invalid_data)?);
        return Ok(());
    }

    let (Some(dataset_path), Some(script_path)) = (args.dataset, args.script) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "--dataset and --script are required",
        ));
    };

    let config = load_config().map_err(invalid_data)?;
    let defaults = resolve(&config, args.color_by.as_deref());
    log::info!("phylostate starting, color-by {}", defaults.color_by);

    let mut store = Store::new(&defaults);
    let dataset = read_dataset(&dataset_path).map_err(invalid_data)?;
    load_dataset(&mut store, dataset).map_err(invalid_data)?;

    let script = read_script(&script_path).map_err(invalid_data)?;
    let actions = script.actions.len();
    let failures = replay(&mut store, script.actions);

    let versions = store.state().tree.versions();
    let (_, events) = store.into_parts();
    let report = ReplayReport {
        recorded_at: Utc::now(),
        dataset: dataset_path.display().to_string(),
        actions,
        failures,
        events,
        versions,
    };

    if let Some(out) = &args.out {
        atomic_write_json(out, &report)?;
        log::info!("Report written to {}", out.display());
    }

    match args.format {
        OutputFormat::Summary => println!("{}", report.summary()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).map_err(invalid_data)?
        ),
    }
    Ok(())
}
