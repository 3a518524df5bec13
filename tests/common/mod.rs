#![allow(dead_code)]

use fog_orchestration_sim::api::simulation_dto::component_dto::{ChannelDto, HeuristicDto, MobilityDto, PowerDto, TopologyDto};
use fog_orchestration_sim::api::simulation_dto::simulation_dto::SimulationDto;
use fog_orchestration_sim::domain::fog_system_model::client::session::PowerParams;
use fog_orchestration_sim::domain::fog_system_model::fog_network::FogNetwork;
use fog_orchestration_sim::domain::fog_system_model::mobility::mobility_model::{FrameUpdate, MobilityModel};
use fog_orchestration_sim::domain::fog_system_model::resource::channel::{ChannelParams, SinrChannel};
use fog_orchestration_sim::domain::fog_system_model::resource::fog_node::FogNode;
use fog_orchestration_sim::domain::fog_system_model::topology::Position;
use fog_orchestration_sim::domain::fog_system_model::utils::id::{ClientId, NodeId};
use fog_orchestration_sim::domain::simulator::simulation_config::SimulationConfig;

/// Configuration of a small random-walk scenario; tweak fields before converting.
pub fn create_simulation_dto() -> SimulationDto {
    SimulationDto {
        num_fn: 4,
        fn_coverage_radius: [150.0, 250.0],
        fn_bandwidth: vec![10.0, 20.0],
        mean_arrival_rate: 3,
        mean_departure_rate: 1,
        desired_data_rate: [1.0, 10.0],
        total_service_connections: 60,
        allocation_policy: "signal_aware".to_string(),
        orchestration: "heuristic".to_string(),
        time_multiplier: 1,
        topology: TopologyDto { origin: [0.0, 0.0], length: 300.0, breadth: 300.0 },
        cache_content_types: 3,
        cache_probability: 0.5,
        metrics: vec![],
        seed: 7,
        max_ticks: Some(500),
        mobility: MobilityDto::RandomWalk { num_clients: 25, max_step: 10.0, lifetime_frames: Some(40) },
        channel: ChannelDto::default(),
        power: PowerDto::default(),
        heuristic: HeuristicDto { step_size: 1.0, eps: 0.1, max_iterations: 2_000 },
    }
}

pub fn create_config(orchestration: &str) -> SimulationConfig {
    let mut dto = create_simulation_dto();
    dto.orchestration = orchestration.to_string();
    SimulationConfig::try_from(dto).expect("Test configuration must be valid")
}

pub fn create_node(id: u64, x: f64, y: f64, radius: f64, bandwidth: f64, cache: Vec<bool>) -> FogNode {
    FogNode::new(NodeId::new(id), Position::new(x, y), radius, bandwidth, SinrChannel::new(ChannelParams::default()), cache).expect("Bandwidth must be supported")
}

pub fn create_network(nodes: Vec<FogNode>) -> FogNetwork {
    FogNetwork::new(nodes, PowerParams::default()).expect("Node ids must match their index")
}

/// Clients that appear on the first frame and never move.
#[derive(Debug, Default)]
pub struct StaticMobility {
    pub clients: Vec<(ClientId, Position)>,
}

impl MobilityModel for StaticMobility {
    fn update(&mut self, frame: u64) -> fog_orchestration_sim::error::Result<FrameUpdate> {
        let mut update = FrameUpdate::default();
        if frame == 1 {
            update.appeared = self.clients.clone();
        }
        Ok(update)
    }
}
