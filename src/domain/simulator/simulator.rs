use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::domain::fog_system_model::allocation::allocation_policy::AllocationPolicy;
use crate::domain::fog_system_model::fog_network::{Admission, FogNetwork};
use crate::domain::fog_system_model::mobility::mobility_model::MobilityModel;
use crate::domain::fog_system_model::mobility::random_walk::RandomWalkMobility;
use crate::domain::fog_system_model::mobility::trace_mobility::TraceMobility;
use crate::domain::fog_system_model::orchestration::decision_strategy::DecisionStrategy;
use crate::domain::fog_system_model::orchestration::orchestration_module::{CycleReport, OrchestrationModule};
use crate::domain::fog_system_model::resource::channel::SinrChannel;
use crate::domain::fog_system_model::resource::fog_node::FogNode;
use crate::domain::fog_system_model::utils::id::{ClientId, NodeId, SessionId};
use crate::domain::fog_system_model::utils::statistics::MetricsCollector;
use crate::domain::simulator::event::{Event, EventQueue, SimTime};
use crate::domain::simulator::simulation_config::{MobilityConfig, SimulationConfig};
use crate::error::{ConversionError, Error, Result};

/// Outcome of one admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionResult {
    Admitted { node: NodeId, blocks: i64, session: SessionId },
    /// No node covers the client, or the policy declined every candidate.
    NoFeasibleNode,
    /// The chosen node lacked the blocks.
    Rejected { node: NodeId },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    pub arrivals: u64,
    pub unplaced: u64,
    pub admitted: u64,
    pub rejected: u64,
    pub departures: u64,
    pub retired_with_session: u64,
    pub migrations: u64,
    pub migration_skips: u64,
    pub orchestration_cycles: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSummary {
    pub id: NodeId,
    pub capacity: i64,
    pub level: i64,
    pub energy_consumed: f64,
    pub overall_throughput: f64,
    pub services_served: u64,
    pub incoming_services: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub end_time: SimTime,
    pub stats: SimulationStats,
    pub nodes: Vec<NodeSummary>,
    /// Latest sample of every collected metric.
    pub metrics: BTreeMap<String, f64>,
}

/// Places `config.num_fn` nodes on the topology grid with randomly drawn radius, bandwidth
/// and cache contents.
pub fn build_network(config: &SimulationConfig, rng: &mut StdRng) -> Result<FogNetwork> {
    let positions = config.topology.assign_positions(config.num_fn);
    let mut nodes = Vec::with_capacity(positions.len());

    for (idx, position) in positions.into_iter().enumerate() {
        let (lo, hi) = config.coverage_radius;
        let radius = rng.random_range(lo..=hi);
        let bandwidth = *config
            .bandwidths
            .choose(rng)
            .ok_or(ConversionError::InvalidValue { field: "fn_bandwidth", reason: "no bandwidth to choose from".to_string() })?;
        let cache = (0..config.cache_content_types).map(|_| rng.random_bool(config.cache_probability)).collect();

        let node = FogNode::new(NodeId::new(idx as u64), position, radius, bandwidth, SinrChannel::new(config.channel), cache)?;
        log::debug!("Created {:?} at ({:.1}, {:.1}) radius {:.1} capacity {}", node.id, position.x, position.y, radius, node.capacity());
        nodes.push(node);
    }

    FogNetwork::new(nodes, config.power)
}

/// Discrete-event engine driving mobility, admissions, departures, serving processes and
/// orchestration over a virtual clock.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    network: FogNetwork,
    mobility: Box<dyn MobilityModel>,
    allocation: Box<dyn AllocationPolicy>,
    orchestration: Option<OrchestrationModule>,
    metrics: MetricsCollector,
    queue: EventQueue,
    rng: StdRng,
    now: SimTime,
    frame: u64,
    attempts: u64,
    stop_scheduled: bool,
    stopped: bool,
    stats: SimulationStats,
    last_cycle: Option<CycleReport>,
}

impl Simulation {
    /// Builds a run from configuration with the built-in decision strategy of its scheme.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Builds a run whose orchestration decisions come from `strategy`.
    pub fn with_strategy(config: SimulationConfig, strategy: Box<dyn DecisionStrategy>) -> Result<Self> {
        Self::build(config, Some(strategy))
    }

    fn build(config: SimulationConfig, strategy: Option<Box<dyn DecisionStrategy>>) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let network = build_network(&config, &mut rng)?;

        let mobility: Box<dyn MobilityModel> = match &config.mobility {
            MobilityConfig::Trace { path } => Box::new(TraceMobility::from_csv(path)?),
            MobilityConfig::RandomWalk(params) => Box::new(RandomWalkMobility::new(*params, config.topology, rng.random())),
        };

        Self::assemble(config, network, mobility, strategy, rng)
    }

    /// Builds a run around an already constructed network and mobility source.
    pub fn from_parts(
        config: SimulationConfig,
        network: FogNetwork,
        mobility: Box<dyn MobilityModel>,
        strategy: Option<Box<dyn DecisionStrategy>>,
    ) -> Result<Self> {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::assemble(config, network, mobility, strategy, rng)
    }

    fn assemble(
        config: SimulationConfig,
        network: FogNetwork,
        mobility: Box<dyn MobilityModel>,
        strategy: Option<Box<dyn DecisionStrategy>>,
        rng: StdRng,
    ) -> Result<Self> {
        let orchestration = if config.orchestration.is_enabled() {
            let strategy = match strategy {
                Some(strategy) => strategy,
                None => config.orchestration.get_instance(config.heuristic)?.ok_or(Error::MissingDecisionStrategy)?,
            };
            Some(OrchestrationModule::new(strategy))
        } else {
            None
        };

        let tick = config.time_multiplier;
        let mut queue = EventQueue::new();
        queue.schedule(0, Event::ClientRefresh);
        queue.schedule(0, Event::ServiceMonitor);
        if orchestration.is_some() {
            queue.schedule(tick, Event::Orchestrate);
        }
        if let Some(max_ticks) = config.max_ticks {
            queue.schedule(max_ticks.saturating_mul(tick), Event::Stop);
        }

        log::info!(
            "Simulation ready: {} fog nodes, policy {:?}, orchestration {:?}, target {} sessions.",
            network.nodes().len(),
            config.allocation_policy,
            config.orchestration,
            config.total_service_connections
        );

        Ok(Self {
            allocation: config.allocation_policy.get_instance(),
            metrics: MetricsCollector::new(config.metrics.clone()),
            config,
            network,
            mobility,
            orchestration,
            queue,
            rng,
            now: 0,
            frame: 0,
            attempts: 0,
            stop_scheduled: false,
            stopped: false,
            stats: SimulationStats::default(),
            last_cycle: None,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn network(&self) -> &FogNetwork {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut FogNetwork {
        &mut self.network
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub fn last_cycle(&self) -> Option<&CycleReport> {
        self.last_cycle.as_ref()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn tick(&self) -> SimTime {
        self.config.time_multiplier
    }

    /// Runs until the stop event fires or the queue drains.
    pub fn run(&mut self) -> Result<SimulationSummary> {
        while self.step()? {}
        log::info!("Simulation finished at t={} after {} admission attempts.", self.now, self.attempts);
        Ok(self.summary())
    }

    /// Processes exactly one event. Returns `false` once the run is over.
    pub fn step(&mut self) -> Result<bool> {
        if self.stopped {
            return Ok(false);
        }
        let Some((time, event)) = self.queue.pop() else {
            self.stopped = true;
            return Ok(false);
        };
        self.now = time;

        match event {
            Event::ClientRefresh => self.on_client_refresh()?,
            Event::ServiceMonitor => self.on_service_monitor()?,
            Event::Orchestrate => self.on_orchestrate()?,
            Event::SessionResume(process) => {
                if self.network.resume_process(process, self.tick() as f64)? {
                    self.queue.schedule(self.now + self.tick(), Event::SessionResume(process));
                }
            }
            Event::Stop => {
                log::debug!("Stop event at t={}", self.now);
                self.stopped = true;
            }
        }

        Ok(!self.stopped)
    }

    fn on_client_refresh(&mut self) -> Result<()> {
        self.frame += 1;
        let update = self.mobility.update(self.frame)?;

        for (client, position) in update.appeared {
            self.network.upsert_client(client, position);
        }
        for (client, position) in update.moved {
            self.network.upsert_client(client, position);
        }
        for client in update.retired {
            if self.network.client(client).is_ok() && self.network.retire_client(client)? {
                self.stats.retired_with_session += 1;
            }
        }

        self.queue.schedule(self.now + self.tick(), Event::ClientRefresh);
        Ok(())
    }

    fn on_service_monitor(&mut self) -> Result<()> {
        let mut served = self.network.served_sessions();
        let departures = self.config.mean_departure_rate.min(served.len());
        for _ in 0..departures {
            let pick = self.rng.random_range(0..served.len());
            let session = served.swap_remove(pick);
            if let Some(node) = self.network.node_of(session) {
                self.network.remove_service(node, session)?;
            }
            self.network.discard_session(session)?;
            self.stats.departures += 1;
        }

        let mut unserved = self.network.unserved_clients();
        for _ in 0..self.config.mean_arrival_rate {
            if self.attempts >= self.config.total_service_connections || unserved.is_empty() {
                break;
            }
            let pick = self.rng.random_range(0..unserved.len());
            let client = unserved.swap_remove(pick);
            let (lo, hi) = self.config.data_rate;
            let rate = self.rng.random_range(lo..=hi);
            let content_type = self.rng.random_range(0..self.config.cache_content_types);
            self.admit_client(client, rate, content_type)?;
        }

        if self.attempts >= self.config.total_service_connections && !self.stop_scheduled {
            log::info!("Reached {} admission attempts at t={}, stopping.", self.attempts, self.now);
            self.stop_scheduled = true;
            self.queue.schedule(self.now, Event::Stop);
        }

        self.metrics.sample(self.now, &self.network, self.stats.unplaced, self.last_cycle.as_ref());
        self.queue.schedule(self.now + self.tick(), Event::ServiceMonitor);
        Ok(())
    }

    fn on_orchestrate(&mut self) -> Result<()> {
        if self.orchestrate_now()?.is_some() {
            self.queue.schedule(self.now + self.tick(), Event::Orchestrate);
        }
        Ok(())
    }

    fn schedule_spawned(&mut self) {
        for process in self.network.take_spawned() {
            self.queue.schedule(self.now, Event::SessionResume(process));
        }
    }

    /// Creates a session for `client` and tries to place it through the allocation policy.
    /// Counts as one admission attempt whatever the outcome.
    pub fn admit_client(&mut self, client: ClientId, rate: f64, content_type: usize) -> Result<AdmissionResult> {
        let session = self.network.create_session(client, rate, content_type)?;
        self.attempts += 1;
        self.stats.arrivals += 1;

        let candidates = self.network.feasible_nodes(client)?;
        let chosen = self.allocation.choose(&self.network, self.network.session(session)?, &candidates)?;

        let Some(node) = chosen else {
            self.network.discard_session(session)?;
            self.stats.unplaced += 1;
            log::debug!("No feasible node for {:?} of {:?}", session, client);
            return Ok(AdmissionResult::NoFeasibleNode);
        };

        match self.network.add_service(node, session, false)? {
            Admission::Admitted { blocks } => {
                self.stats.admitted += 1;
                self.schedule_spawned();
                Ok(AdmissionResult::Admitted { node, blocks, session })
            }
            Admission::Rejected { .. } => {
                self.network.discard_session(session)?;
                self.stats.rejected += 1;
                Ok(AdmissionResult::Rejected { node })
            }
        }
    }

    /// Runs one orchestration cycle immediately, outside the event schedule.
    pub fn orchestrate_now(&mut self) -> Result<Option<CycleReport>> {
        let Some(module) = self.orchestration.as_mut() else {
            return Ok(None);
        };
        let report = module.run_cycle(&mut self.network, self.now)?;
        self.stats.orchestration_cycles += 1;
        self.stats.migrations += report.migrations as u64;
        self.stats.migration_skips += report.migrations_skipped as u64;
        self.last_cycle = Some(report.clone());
        self.schedule_spawned();
        Ok(Some(report))
    }

    pub fn summary(&self) -> SimulationSummary {
        let nodes = self
            .network
            .nodes()
            .iter()
            .map(|n| NodeSummary {
                id: n.id,
                capacity: n.capacity(),
                level: n.level(),
                energy_consumed: n.energy_consumed(),
                overall_throughput: n.overall_throughput(),
                services_served: n.services_served(),
                incoming_services: n.incoming_services(),
            })
            .collect();

        let metrics = self
            .metrics
            .metrics()
            .iter()
            .filter_map(|kind| self.metrics.latest_value(*kind).map(|v| (kind.name().to_string(), v)))
            .collect();

        SimulationSummary { end_time: self.now, stats: self.stats.clone(), nodes, metrics }
    }
}
