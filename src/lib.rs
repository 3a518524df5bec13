use crate::domain::simulator::simulator::{Simulation, SimulationSummary};
use crate::error::Result;
use crate::loader::parser::load_simulation_config;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Loads the configuration at `file_path` and runs it to completion.
pub fn run_simulation_from_file(file_path: &str) -> Result<SimulationSummary> {
    let config = load_simulation_config(file_path)?;
    log::info!("Starting simulation with seed {}.", config.seed);

    let mut simulation = Simulation::new(config)?;
    simulation.run()
}
