use crate::api::simulation_dto::component_dto::MobilityDto;
use crate::api::simulation_dto::simulation_dto::SimulationDto;
use crate::domain::fog_system_model::allocation::allocation_policy_type::AllocationPolicyType;
use crate::domain::fog_system_model::client::session::PowerParams;
use crate::domain::fog_system_model::mobility::random_walk::RandomWalkParams;
use crate::domain::fog_system_model::orchestration::orchestration_scheme::OrchestrationScheme;
use crate::domain::fog_system_model::orchestration::subgradient_heuristic::HeuristicParams;
use crate::domain::fog_system_model::resource::channel::ChannelParams;
use crate::domain::fog_system_model::resource::fog_node::capacity_for_bandwidth;
use crate::domain::fog_system_model::topology::Topology;
use crate::domain::fog_system_model::utils::statistics::MetricKind;
use crate::error::ConversionError;

#[derive(Debug, Clone, PartialEq)]
pub enum MobilityConfig {
    Trace { path: String },
    RandomWalk(RandomWalkParams),
}

/// Validated configuration of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub num_fn: usize,
    pub coverage_radius: (f64, f64),
    pub bandwidths: Vec<f64>,
    pub mean_arrival_rate: usize,
    pub mean_departure_rate: usize,
    pub data_rate: (f64, f64),
    pub total_service_connections: u64,
    pub allocation_policy: AllocationPolicyType,
    pub orchestration: OrchestrationScheme,
    /// Length of one tick in virtual time units.
    pub time_multiplier: i64,
    pub topology: Topology,
    pub cache_content_types: usize,
    pub cache_probability: f64,
    pub metrics: Vec<MetricKind>,
    pub seed: u64,
    pub max_ticks: Option<i64>,
    pub mobility: MobilityConfig,
    pub channel: ChannelParams,
    pub power: PowerParams,
    pub heuristic: HeuristicParams,
}

fn range(field: &'static str, [lo, hi]: [f64; 2]) -> Result<(f64, f64), ConversionError> {
    if !lo.is_finite() || !hi.is_finite() || lo < 0.0 || lo > hi {
        return Err(ConversionError::InvalidRange { field, lo, hi });
    }
    Ok((lo, hi))
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConversionError {
    ConversionError::InvalidValue { field, reason: reason.into() }
}

impl TryFrom<SimulationDto> for SimulationConfig {
    type Error = ConversionError;

    fn try_from(dto: SimulationDto) -> Result<Self, Self::Error> {
        if dto.num_fn == 0 {
            return Err(invalid("num_fn", "at least one fog node is required"));
        }
        if dto.fn_bandwidth.is_empty() {
            return Err(invalid("fn_bandwidth", "no bandwidth to choose from"));
        }
        for bandwidth in &dto.fn_bandwidth {
            capacity_for_bandwidth(*bandwidth)?;
        }
        if dto.time_multiplier < 1 {
            return Err(invalid("time_multiplier", format!("{} is not a positive tick length", dto.time_multiplier)));
        }
        if dto.cache_content_types == 0 {
            return Err(invalid("cache_content_types", "at least one content type is required"));
        }
        if !(0.0..=1.0).contains(&dto.cache_probability) {
            return Err(invalid("cache_probability", format!("{} is not a probability", dto.cache_probability)));
        }
        if dto.max_ticks.is_some_and(|t| t < 1) {
            return Err(invalid("max_ticks", "must be positive when given"));
        }
        if dto.heuristic.step_size <= 0.0 || dto.heuristic.max_iterations == 0 {
            return Err(invalid("heuristic", "step_size and max_iterations must be positive"));
        }
        if dto.topology.length < 0.0 || dto.topology.breadth < 0.0 {
            return Err(invalid("topology", "area dimensions must not be negative"));
        }

        // An empty selection samples everything.
        let metrics = if dto.metrics.is_empty() {
            MetricKind::all()
        } else {
            dto.metrics.iter().map(|m| m.parse()).collect::<Result<Vec<MetricKind>, _>>()?
        };

        let mobility = match dto.mobility {
            MobilityDto::Trace { path } => MobilityConfig::Trace { path },
            MobilityDto::RandomWalk { num_clients, max_step, lifetime_frames } => {
                MobilityConfig::RandomWalk(RandomWalkParams { num_clients, max_step, lifetime_frames })
            }
        };

        Ok(SimulationConfig {
            num_fn: dto.num_fn,
            coverage_radius: range("fn_coverage_radius", dto.fn_coverage_radius)?,
            bandwidths: dto.fn_bandwidth,
            mean_arrival_rate: dto.mean_arrival_rate,
            mean_departure_rate: dto.mean_departure_rate,
            data_rate: range("desired_data_rate", dto.desired_data_rate)?,
            total_service_connections: dto.total_service_connections,
            allocation_policy: dto.allocation_policy.parse()?,
            orchestration: dto.orchestration.parse()?,
            time_multiplier: dto.time_multiplier,
            topology: dto.topology.into(),
            cache_content_types: dto.cache_content_types,
            cache_probability: dto.cache_probability,
            metrics,
            seed: dto.seed,
            max_ticks: dto.max_ticks,
            mobility,
            channel: dto.channel.into(),
            power: dto.power.into(),
            heuristic: dto.heuristic.into(),
        })
    }
}
