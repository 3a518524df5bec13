use crate::domain::fog_system_model::client::session::Session;
use crate::domain::fog_system_model::fog_network::FogNetwork;
use crate::domain::fog_system_model::utils::id::NodeId;
use crate::error::Result;

/// Chooses the admitting node for a new session among the nodes covering its client.
///
/// Candidates arrive in id order; on equal scores the first one wins.
/// `None` means the session cannot be placed.
pub trait AllocationPolicy: std::fmt::Debug {
    fn choose(&self, network: &FogNetwork, session: &Session, candidates: &[NodeId]) -> Result<Option<NodeId>>;
}

/// Returns the candidate with the strictly greatest score, the earliest on ties.
fn first_max_by<F>(candidates: &[NodeId], mut score: F) -> Result<Option<NodeId>>
where
    F: FnMut(NodeId) -> Result<f64>,
{
    let mut best: Option<(NodeId, f64)> = None;
    for &candidate in candidates {
        let value = score(candidate)?;
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((candidate, value)),
        }
    }
    Ok(best.map(|(node, _)| node))
}

/// Highest SINR.
#[derive(Debug, Default)]
pub struct SignalAware;

impl AllocationPolicy for SignalAware {
    fn choose(&self, network: &FogNetwork, session: &Session, candidates: &[NodeId]) -> Result<Option<NodeId>> {
        first_max_by(candidates, |node| network.get_sinr(node, session.client))
    }
}

/// Most spare resource blocks.
#[derive(Debug, Default)]
pub struct CapacityAware;

impl AllocationPolicy for CapacityAware {
    fn choose(&self, network: &FogNetwork, _session: &Session, candidates: &[NodeId]) -> Result<Option<NodeId>> {
        first_max_by(candidates, |node| Ok(network.node(node)?.level() as f64))
    }
}

/// Prefers nodes caching the session's content type, falling back to the signal.
#[derive(Debug, Default)]
pub struct ContentAware;

impl AllocationPolicy for ContentAware {
    fn choose(&self, network: &FogNetwork, session: &Session, candidates: &[NodeId]) -> Result<Option<NodeId>> {
        let mut caching = Vec::new();
        for &candidate in candidates {
            if network.node(candidate)?.caches(session.content_type) {
                caching.push(candidate);
            }
        }

        match caching.as_slice() {
            [] => SignalAware.choose(network, session, candidates),
            [only] => Ok(Some(*only)),
            several => SignalAware.choose(network, session, several),
        }
    }
}
