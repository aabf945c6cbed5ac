//! Facility Placement CLI
//!
//! Finds the cheapest (or best-covering) set of new monitoring facilities for
//! a debris snapshot.
//!
//! Usage:
//!   optimize-placement --debris data/debris.json --budget 400 \
//!                      --facilities data/facilities.json --output placement.json --geojson

use anyhow::{Context, Result};
use clap::Parser;
use debris_coverage::{
    aggregate_coverage, identify_gaps, recommended_facility_types, FacilityType, OrbitalRegion,
    DEFAULT_GAP_TARGET,
};
use placement_optimizer::{
    active_snapshot, explain::explain_formulation, export::to_geojson, loader, optimize_placement,
    FacilityCandidate, OptimizationMode, OptimizerConfig, SetCoverProblem, SetCoverResult,
};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "optimize-placement",
    about = "Choose debris-monitoring facility placements by weighted set cover"
)]
struct Args {
    /// Debris snapshot JSON file
    #[arg(short, long)]
    debris: PathBuf,

    /// Existing facilities JSON file, used for the current coverage report
    #[arg(short, long)]
    facilities: Option<PathBuf>,

    /// Optimizer config JSON file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// min-cost or max-coverage
    #[arg(short, long)]
    mode: Option<OptimizationMode>,

    /// Budget cap in cost units
    #[arg(short, long)]
    budget: Option<f64>,

    /// Fraction of debris to cover in min-cost mode (0..=1)
    #[arg(long)]
    min_coverage: Option<f64>,

    /// Comma-separated facility types to consider (e.g. radar_sband,optical_telescope)
    #[arg(short, long, value_delimiter = ',')]
    types: Option<Vec<FacilityType>>,

    /// Branch-and-bound node limit
    #[arg(long)]
    node_limit: Option<u64>,

    /// Output JSON file
    #[arg(short, long, default_value = "placement.json")]
    output: PathBuf,

    /// Also output GeoJSON of the selected facilities
    #[arg(long)]
    geojson: bool,

    /// Print the set-cover formulation as markdown
    #[arg(long)]
    explain: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlacementReport<'a> {
    summary: String,
    result: &'a SetCoverResult,
    selected: Vec<&'a FacilityCandidate>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(fmt::layer())
        .init();

    info!("{}", "=".repeat(60));
    info!("Orbital Guardian Facility Placement");
    info!("{}", "=".repeat(60));

    let mut config = match &args.config {
        Some(path) => OptimizerConfig::load(path)?,
        None => OptimizerConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(budget) = args.budget {
        config.budget = Some(budget);
    }
    if let Some(min_coverage) = args.min_coverage {
        config.min_coverage = Some(min_coverage);
    }
    if let Some(types) = args.types.clone() {
        config.facility_types = types;
    }
    if let Some(limit) = args.node_limit {
        config.node_limit = limit;
    }
    config.validate().context("invalid optimizer settings")?;

    let debris = loader::load_debris(&args.debris)?;

    if let Some(path) = &args.facilities {
        let facilities = loader::load_facilities(path)?;
        let report = aggregate_coverage(&facilities, &active_snapshot(&debris));
        info!(
            "Current coverage: {:.1}% ({} tracked, {} untracked)",
            report.total_coverage * 100.0,
            report.tracked_count,
            report.untracked_count
        );
        for region in OrbitalRegion::ALL {
            info!("  {:10} {:.1}%", region.label(), report.by_region.get(region) * 100.0);
        }
        let gaps = identify_gaps(&report, DEFAULT_GAP_TARGET);
        if !gaps.is_empty() {
            let recommended: Vec<&str> = recommended_facility_types(&gaps).iter().map(|t| t.as_str()).collect();
            info!("Coverage gaps in {:?}; suited types: {}", gaps, recommended.join(", "));
        }
    }

    let run = optimize_placement(&debris, &config)?;
    let result = &run.result;

    if args.explain {
        let problem = SetCoverProblem {
            debris: &run.debris,
            candidates: &run.candidates,
            budget_limit: config.budget,
            min_coverage: config.min_coverage,
        };
        println!("{}", explain_formulation(&problem, config.mode, &config.formulation_options()));
    }

    let selected: Vec<&FacilityCandidate> = run
        .candidates
        .iter()
        .filter(|c| result.selected_candidates.contains(&c.id))
        .collect();

    info!("Writing output to {:?}", args.output);
    let report = PlacementReport {
        summary: result.summary(),
        result,
        selected: selected.clone(),
    };
    let writer = BufWriter::new(File::create(&args.output)?);
    serde_json::to_writer_pretty(writer, &report)?;

    if args.geojson {
        let geojson_path = args.output.with_extension("geojson");
        info!("Writing GeoJSON to {:?}", geojson_path);
        let writer = BufWriter::new(File::create(&geojson_path)?);
        serde_json::to_writer_pretty(writer, &to_geojson(result, &run.candidates))?;
    }

    info!("{}", "=".repeat(60));
    info!("SUMMARY");
    info!("{}", "=".repeat(60));
    if result.feasible {
        info!("{}", result.summary());
    } else {
        warn!("{}", result.summary());
    }
    for c in &selected {
        info!("  {:12} | {:45} | {:>5.0}", c.id, c.name(), c.cost);
    }

    Ok(())
}
