// ==========================================
// Dryer Sequencer - CLI Entry Point
// ==========================================
// Loads an optimization database and a demand map, runs the
// sequence optimizer, prints the production plan and exports the
// report artifacts.
//
// Usage: dryer-sequencer <database.json> <demand.json> [out_dir]
//   demand.json: {"L28": 12, "L36": 8, ...}  (product -> wagons)
//   optional config via DRYER_CONFIG=<config.json>
// ==========================================

use anyhow::{bail, Context};
use dryer_sequencer::dataset::OptimizationDatabase;
use dryer_sequencer::report::{export_all, render_text, ReportBuilder};
use dryer_sequencer::{logging, OptimizerConfig, SequenceOptimizer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("dryer sequencer - production sequence optimizer");
    tracing::info!("version: {}", dryer_sequencer::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        bail!(
            "usage: {} <database.json> <demand.json> [out_dir]",
            args.first().map(String::as_str).unwrap_or("dryer-sequencer")
        );
    }
    let database_path = PathBuf::from(&args[1]);
    let demand_path = PathBuf::from(&args[2]);
    let out_dir = args.get(3).map(PathBuf::from);

    let database = OptimizationDatabase::from_path(&database_path)
        .with_context(|| format!("loading database {}", database_path.display()))?;

    let demand = load_demand(&demand_path)
        .with_context(|| format!("loading demand {}", demand_path.display()))?;
    tracing::info!(products = demand.len(), "demand loaded");

    let config = load_config()?;
    let jobs = database.jobs_for_demand(&demand)?;
    let model = database.transition_table();

    let optimizer = SequenceOptimizer::new(config)?;
    let run = optimizer.optimize_parallel(jobs, &model).await?;

    let report = ReportBuilder::new().build(&run);
    println!("{}", render_text(&report));

    if let Some(dir) = out_dir {
        export_all(&report, &dir)
            .with_context(|| format!("exporting report to {}", dir.display()))?;
        tracing::info!(dir = %dir.display(), "report artifacts written");
    }

    Ok(())
}

fn load_demand(path: &Path) -> anyhow::Result<BTreeMap<String, u32>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

// Optional optimizer config document via DRYER_CONFIG
fn load_config() -> anyhow::Result<OptimizerConfig> {
    match std::env::var("DRYER_CONFIG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            let config: OptimizerConfig = serde_json::from_str(&raw)?;
            config.validate()?;
            tracing::info!(path, "optimizer config loaded");
            Ok(config)
        }
        Err(_) => Ok(OptimizerConfig::default()),
    }
}
