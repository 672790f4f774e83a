//! Apiary command-line front end.
//!
//! Runs one colony for a fixed wall-clock duration and prints the final
//! report. Ctrl-C halts the colony abruptly instead of waiting for the
//! clock; either way every bee is joined before the report prints.

use anyhow::Context;
use apiary_runtime::Simulation;
use apiary_types::HiveConfig;
use apiary_world::HiveStats;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apiary", about = "Run a honey-bee colony simulation")]
#[command(version)]
struct Cli {
    /// Seconds to let the colony run
    #[arg(long, default_value_t = 10)]
    duration_secs: u64,

    /// Load the hive configuration from a JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial units of nectar in the stores
    #[arg(long)]
    nectar: Option<u64>,

    /// Initial units of pollen in the stores
    #[arg(long)]
    pollen: Option<u64>,

    /// Drones waiting at startup
    #[arg(long)]
    drones: Option<usize>,

    /// Workers per resource at startup
    #[arg(long)]
    workers: Option<usize>,
}

impl Cli {
    fn hive_config(&self) -> anyhow::Result<HiveConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => HiveConfig::default(),
        };

        if let Some(nectar) = self.nectar {
            config.initial_nectar = nectar;
        }
        if let Some(pollen) = self.pollen {
            config.initial_pollen = pollen;
        }
        if let Some(drones) = self.drones {
            config.initial_drones = drones;
        }
        if let Some(workers) = self.workers {
            config.initial_workers_per_resource = workers;
        }
        Ok(config)
    }
}

fn print_report(stats: &HiveStats) {
    println!("colony report");
    println!("  bees spawned:    {}", stats.bees.total_spawned);
    println!("  drones perished: {}", stats.bees.total_perished);
    println!("  bees alive:      {}", stats.bees.live);
    println!("  broods reared:   {}", stats.stores.claimed_pairs);
    println!(
        "  stores left:     {} nectar, {} pollen",
        stats.stores.nectar, stats.stores.pollen
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.hive_config()?;
    let simulation = Simulation::new(config)?;

    tracing::info!(seconds = cli.duration_secs, "colony taking flight");
    simulation.populate().await;

    let stats = tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(cli.duration_secs)) => {
            simulation.shutdown().await
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupt received, halting the colony");
            simulation.halt().await
        }
    };

    print_report(&stats);
    Ok(())
}
