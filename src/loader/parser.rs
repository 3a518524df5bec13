use serde::de::DeserializeOwned;
use std::fs;

use crate::api::simulation_dto::simulation_dto::SimulationDto;
use crate::domain::simulator::simulation_config::SimulationConfig;
use crate::error::Result;

/// Parses a JSON file into a given type `T`.
///
/// Errors are converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: &str) -> Result<T> {
    let data = fs::read_to_string(file_path)?;
    let parsed_data: T = serde_json::from_str(&data)?;
    Ok(parsed_data)
}

/// Reads and validates a simulation configuration file.
pub fn load_simulation_config(file_path: &str) -> Result<SimulationConfig> {
    let dto: SimulationDto = parse_json_file(file_path)?;
    log::info!("Configuration '{}' parsed successfully.", file_path);
    Ok(SimulationConfig::try_from(dto)?)
}
