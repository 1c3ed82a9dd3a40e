use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};

use subcategorize::generator::write_artifacts;
use subcategorize::parser::{extract_links, split_records};
use subcategorize::utils::{file_exists, read_input};
use subcategorize::{CancelToken, CountryTable, Pipeline, PipelineError, Settings};

/// Sort proxy subscription links into per-protocol and per-country files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input files with one link per line; `-` reads stdin
    #[arg(value_name = "INPUT")]
    inputs: Vec<String>,

    /// Path to the configuration file (TOML or YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Country table (TOML, YAML or JSON)
    #[arg(long, value_name = "FILE")]
    countries: Option<String>,

    /// Output directory, replaced as a whole on success
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,

    /// Number of decode workers, 0 for one per CPU
    #[arg(short, long, value_name = "N")]
    workers: Option<usize>,

    /// Extract links embedded in free text instead of reading one per line
    #[arg(long)]
    extract: bool,
}

#[tokio::main]
async fn main() {
    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if let Err(e) = run(Args::parse()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    // Override settings with command line arguments if provided
    if !args.inputs.is_empty() {
        settings.common.inputs = args.inputs;
    }
    if let Some(countries) = args.countries {
        settings.common.countries = countries;
    }
    if let Some(output) = args.output {
        settings.common.output_dir = output;
    }
    if let Some(workers) = args.workers {
        settings.common.workers = workers;
    }
    settings.common.extract_links |= args.extract;
    settings.validate()?;

    if settings.common.inputs.is_empty() {
        bail!("no input given; pass files or `-` for stdin");
    }

    // The country table must load before anything else happens
    if !file_exists(&settings.common.countries) {
        bail!("country table {} not found", settings.common.countries);
    }
    let table = CountryTable::load(Path::new(&settings.common.countries))
        .with_context(|| format!("loading country table {}", settings.common.countries))?;
    info!("Loaded {} countries", table.len());

    let mut lines = Vec::new();
    for input in &settings.common.inputs {
        let content = read_input(input).with_context(|| format!("reading {}", input))?;
        let records = if settings.common.extract_links {
            extract_links(&content)
        } else {
            split_records(&content)
        };
        info!("Read {} records from {}", records.len(), input);
        lines.extend(records);
    }

    let pipeline = Pipeline::new(&table, &settings.filter, settings.common.workers)?;
    let cancel = CancelToken::new();

    let worker_cancel = cancel.clone();
    let mut job = tokio::task::spawn_blocking(move || pipeline.run(&lines, &worker_cancel));

    let result = tokio::select! {
        joined = &mut job => joined,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, abandoning run without writing output");
            cancel.cancel();
            job.await
        }
    };

    let output = match result.context("pipeline task failed")? {
        Ok(output) => output,
        Err(PipelineError::Cancelled) => bail!("run cancelled, no output written"),
        Err(e) => return Err(e.into()),
    };

    let summary = write_artifacts(
        Path::new(&settings.common.output_dir),
        &output,
        &table,
        &settings.report,
    )?;

    for row in &summary.protocols {
        info!("{}: {}", row.protocol, row.count);
    }
    info!(
        "{} countries matched, {} records without a country",
        summary.countries.len(),
        output.stats.no_country + output.stats.unnamed
    );

    Ok(())
}
