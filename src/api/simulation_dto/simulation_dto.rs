use serde::{Deserialize, Serialize};

use crate::api::simulation_dto::component_dto::{ChannelDto, HeuristicDto, MobilityDto, PowerDto, TopologyDto};

/// Root of a simulation configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationDto {
    pub num_fn: usize,
    /// Coverage radius range `[lo, hi]` in metres, drawn uniformly per node.
    pub fn_coverage_radius: [f64; 2],
    /// Bandwidths in MHz, one drawn uniformly per node.
    pub fn_bandwidth: Vec<f64>,
    pub mean_arrival_rate: usize,
    pub mean_departure_rate: usize,
    /// Requested data rate range `[lo, hi]` in Mbit/s.
    pub desired_data_rate: [f64; 2],
    pub total_service_connections: u64,
    #[serde(default = "default_allocation_policy")]
    pub allocation_policy: String,
    #[serde(default = "default_orchestration")]
    pub orchestration: String,
    #[serde(default = "default_time_multiplier")]
    pub time_multiplier: i64,
    pub topology: TopologyDto,
    #[serde(default = "default_cache_content_types")]
    pub cache_content_types: usize,
    #[serde(default = "default_cache_probability")]
    pub cache_probability: f64,
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub max_ticks: Option<i64>,
    #[serde(default)]
    pub mobility: MobilityDto,
    #[serde(default)]
    pub channel: ChannelDto,
    #[serde(default)]
    pub power: PowerDto,
    #[serde(default)]
    pub heuristic: HeuristicDto,
}

fn default_allocation_policy() -> String {
    "signal_aware".to_string()
}

fn default_orchestration() -> String {
    "none".to_string()
}

fn default_time_multiplier() -> i64 {
    1
}

fn default_cache_content_types() -> usize {
    4
}

fn default_cache_probability() -> f64 {
    0.5
}
