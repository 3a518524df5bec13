use std::collections::BTreeMap;

use crate::domain::fog_system_model::resource::channel::SinrChannel;
use crate::domain::fog_system_model::resource::resource_container::ResourceContainer;
use crate::domain::fog_system_model::resource::session_process::ProcessKey;
use crate::domain::fog_system_model::topology::Position;
use crate::domain::fog_system_model::utils::id::{ClientId, NodeId, SessionId};
use crate::error::ConversionError;

/// LTE channel bandwidths (MHz) and the resource blocks they carry.
const BANDWIDTH_TO_BLOCKS: [(f64, i64); 6] = [(1.4, 6), (3.0, 15), (5.0, 25), (10.0, 50), (15.0, 75), (20.0, 100)];

/// Resource-block capacity of a node operating at `bandwidth` MHz.
pub fn capacity_for_bandwidth(bandwidth: f64) -> Result<i64, ConversionError> {
    BANDWIDTH_TO_BLOCKS
        .iter()
        .find(|(mhz, _)| (mhz - bandwidth).abs() < 1e-9)
        .map(|(_, blocks)| *blocks)
        .ok_or(ConversionError::UnsupportedBandwidth(bandwidth))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServingEntry {
    pub session: SessionId,
    pub process: ProcessKey,
}

/// Fixed edge-compute node. Created at simulation start and never destroyed.
#[derive(Debug)]
pub struct FogNode {
    pub id: NodeId,
    pub position: Position,
    pub coverage_radius: f64,
    /// Channel bandwidth in MHz.
    pub bandwidth: f64,
    pub(crate) container: ResourceContainer,
    pub channel: SinrChannel,
    cache: Vec<bool>,
    pub(crate) serving: BTreeMap<ClientId, ServingEntry>,

    pub(crate) energy_consumed: f64,
    pub(crate) overall_throughput: f64,
    pub(crate) services_served: u64,
    pub(crate) incoming_services: u64,
}

impl FogNode {
    pub fn new(id: NodeId, position: Position, coverage_radius: f64, bandwidth: f64, channel: SinrChannel, cache: Vec<bool>) -> Result<Self, ConversionError> {
        let capacity = capacity_for_bandwidth(bandwidth)?;

        Ok(Self {
            id,
            position,
            coverage_radius,
            bandwidth,
            container: ResourceContainer::new(capacity),
            channel,
            cache,
            serving: BTreeMap::new(),
            energy_consumed: 0.0,
            overall_throughput: 0.0,
            services_served: 0,
            incoming_services: 0,
        })
    }

    /// Strictly inside the coverage radius.
    pub fn covers(&self, position: Position) -> bool {
        self.position.distance_to(&position) < self.coverage_radius
    }

    pub fn caches(&self, content_type: usize) -> bool {
        self.cache.get(content_type).copied().unwrap_or(false)
    }

    pub fn cache(&self) -> &[bool] {
        &self.cache
    }

    pub fn capacity(&self) -> i64 {
        self.container.capacity()
    }

    pub fn level(&self) -> i64 {
        self.container.level()
    }

    pub fn allocated(&self) -> i64 {
        self.container.allocated()
    }

    pub fn energy_consumed(&self) -> f64 {
        self.energy_consumed
    }

    pub fn overall_throughput(&self) -> f64 {
        self.overall_throughput
    }

    pub fn services_served(&self) -> u64 {
        self.services_served
    }

    pub fn incoming_services(&self) -> u64 {
        self.incoming_services
    }

    pub fn is_serving(&self, client: ClientId) -> bool {
        self.serving.contains_key(&client)
    }

    pub fn serving_entry(&self, client: ClientId) -> Option<&ServingEntry> {
        self.serving.get(&client)
    }

    /// Clients in the serving map, in id order.
    pub fn served_clients(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.serving.keys().copied()
    }

    pub fn serving_count(&self) -> usize {
        self.serving.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fog_system_model::resource::channel::ChannelParams;

    #[test]
    fn test_bandwidth_maps_to_lte_block_counts() {
        assert_eq!(capacity_for_bandwidth(1.4), Ok(6));
        assert_eq!(capacity_for_bandwidth(10.0), Ok(50));
        assert_eq!(capacity_for_bandwidth(20.0), Ok(100));
        assert_eq!(capacity_for_bandwidth(7.0), Err(ConversionError::UnsupportedBandwidth(7.0)));
    }

    #[test]
    fn test_coverage_is_strict() {
        let node = FogNode::new(NodeId::new(0), Position::new(0.0, 0.0), 10.0, 5.0, SinrChannel::new(ChannelParams::default()), vec![true, false]).unwrap();

        assert!(node.covers(Position::new(9.99, 0.0)));
        assert!(!node.covers(Position::new(10.0, 0.0)), "A client exactly on the radius is not covered");
        assert_eq!(node.capacity(), 25);
        assert_eq!(node.level(), 25);
        assert!(node.caches(0));
        assert!(!node.caches(1));
        assert!(!node.caches(7), "Content types beyond the bitmap are never cached");
    }
}
