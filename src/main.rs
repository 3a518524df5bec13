use anyhow::Context;
use clap::Parser;

use fog_orchestration_sim::domain::simulator::simulator::Simulation;
use fog_orchestration_sim::loader::parser::load_simulation_config;
use fog_orchestration_sim::logger;

/// Fog node session allocation and orchestration simulator
#[derive(Parser)]
#[command(name = "fog-sim")]
#[command(about = "Simulates vehicle sessions on fog nodes and their periodic rebalancing", long_about = None)]
struct Cli {
    /// Simulation configuration (JSON)
    #[arg(long)]
    config: String,

    /// Overrides the seed of the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Writes the sampled metrics as `;`-separated CSV
    #[arg(long)]
    metrics_out: Option<String>,

    /// Prints the run summary as JSON on stdout
    #[arg(long)]
    summary: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init();

    let mut config = load_simulation_config(&cli.config).with_context(|| format!("Failed to load configuration '{}'", cli.config))?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    log::info!("Running '{}' with seed {}.", cli.config, config.seed);
    let mut simulation = Simulation::new(config).context("Failed to set up simulation")?;
    let summary = simulation.run().context("Simulation aborted")?;

    log::info!(
        "Done at t={}: {} arrivals, {} admitted, {} unplaced, {} rejected, {} migrations.",
        summary.end_time,
        summary.stats.arrivals,
        summary.stats.admitted,
        summary.stats.unplaced,
        summary.stats.rejected,
        summary.stats.migrations
    );

    if let Some(path) = &cli.metrics_out {
        simulation.metrics().save_csv(path).with_context(|| format!("Failed to write metrics to '{}'", path))?;
    }

    if cli.summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
