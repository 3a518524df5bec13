use serde::{Deserialize, Serialize};

use crate::domain::fog_system_model::client::session::PowerParams;
use crate::domain::fog_system_model::mobility::random_walk::RandomWalkParams;
use crate::domain::fog_system_model::orchestration::subgradient_heuristic::HeuristicParams;
use crate::domain::fog_system_model::resource::channel::ChannelParams;
use crate::domain::fog_system_model::topology::{Position, Topology};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyDto {
    #[serde(default)]
    pub origin: [f64; 2],
    pub length: f64,
    pub breadth: f64,
}

impl From<TopologyDto> for Topology {
    fn from(dto: TopologyDto) -> Self {
        Topology::new(Position::new(dto.origin[0], dto.origin[1]), dto.length, dto.breadth)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MobilityDto {
    /// CSV trace with `Vehicle_ID, Frame_ID, Global_X, Global_Y` columns.
    Trace { path: String },
    RandomWalk {
        #[serde(default = "default_walkers")]
        num_clients: usize,
        #[serde(default = "default_max_step")]
        max_step: f64,
        #[serde(default)]
        lifetime_frames: Option<u64>,
    },
}

impl Default for MobilityDto {
    fn default() -> Self {
        let params = RandomWalkParams::default();
        MobilityDto::RandomWalk { num_clients: params.num_clients, max_step: params.max_step, lifetime_frames: params.lifetime_frames }
    }
}

fn default_walkers() -> usize {
    RandomWalkParams::default().num_clients
}

fn default_max_step() -> f64 {
    RandomWalkParams::default().max_step
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelDto {
    pub transmit_power: f64,
    pub noise_power: f64,
    pub path_loss_exponent: f64,
    pub interference_factor: f64,
    pub block_bandwidth_khz: f64,
    pub min_distance: f64,
}

impl Default for ChannelDto {
    fn default() -> Self {
        let p = ChannelParams::default();
        Self {
            transmit_power: p.transmit_power,
            noise_power: p.noise_power,
            path_loss_exponent: p.path_loss_exponent,
            interference_factor: p.interference_factor,
            block_bandwidth_khz: p.block_bandwidth_khz,
            min_distance: p.min_distance,
        }
    }
}

impl From<ChannelDto> for ChannelParams {
    fn from(dto: ChannelDto) -> Self {
        ChannelParams {
            transmit_power: dto.transmit_power,
            noise_power: dto.noise_power,
            path_loss_exponent: dto.path_loss_exponent,
            interference_factor: dto.interference_factor,
            block_bandwidth_khz: dto.block_bandwidth_khz,
            min_distance: dto.min_distance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerDto {
    pub cached: f64,
    pub uncached: f64,
}

impl Default for PowerDto {
    fn default() -> Self {
        let p = PowerParams::default();
        Self { cached: p.cached, uncached: p.uncached }
    }
}

impl From<PowerDto> for PowerParams {
    fn from(dto: PowerDto) -> Self {
        PowerParams { cached: dto.cached, uncached: dto.uncached }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicDto {
    pub step_size: f64,
    pub eps: f64,
    pub max_iterations: usize,
}

impl Default for HeuristicDto {
    fn default() -> Self {
        let p = HeuristicParams::default();
        Self { step_size: p.step_size, eps: p.eps, max_iterations: p.max_iterations }
    }
}

impl From<HeuristicDto> for HeuristicParams {
    fn from(dto: HeuristicDto) -> Self {
        HeuristicParams { step_size: dto.step_size, eps: dto.eps, max_iterations: dto.max_iterations }
    }
}
