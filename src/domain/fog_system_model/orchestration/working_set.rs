use std::collections::{BTreeMap, BTreeSet};

use crate::domain::fog_system_model::fog_network::FogNetwork;
use crate::domain::fog_system_model::orchestration::decision_strategy::{PairProblem, Side};
use crate::domain::fog_system_model::utils::id::{ClientId, NodeId, SessionId};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    node: NodeId,
    session: SessionId,
    held: i64,
}

/// Snapshot of the network taken at the start of an orchestration cycle.
///
/// Holds the block cost `b[node][client]` of every served client at every node and the current
/// placement `x[node][client]`. At the serving node the cost is the blocks the session holds, at
/// every other node it is the what-if cost against that node's current interferers. Built fresh
/// each cycle and dropped afterwards.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    nodes: Vec<NodeId>,
    levels: BTreeMap<NodeId, i64>,
    blocks: BTreeMap<(NodeId, ClientId), i64>,
    covered: BTreeSet<(NodeId, ClientId)>,
    placement: BTreeMap<ClientId, Placement>,
}

impl WorkingSet {
    pub fn build(network: &FogNetwork) -> Result<Self> {
        let mut placement = BTreeMap::new();
        for session in network.served_sessions() {
            let s = network.session(session)?;
            if let Some(node) = network.node_of(session) {
                placement.insert(s.client, Placement { node, session, held: s.blocks });
            }
        }

        let mut blocks = BTreeMap::new();
        let mut covered = BTreeSet::new();
        for node in network.nodes() {
            for (&client, p) in &placement {
                let cost = if p.node == node.id {
                    p.held
                } else {
                    network.get_resource_blocks(node.id, client, network.session(p.session)?.requested_rate)?
                };
                blocks.insert((node.id, client), cost);
                if node.covers(network.client(client)?.position) {
                    covered.insert((node.id, client));
                }
            }
        }

        Ok(Self {
            nodes: network.nodes().iter().map(|n| n.id).collect(),
            levels: network.nodes().iter().map(|n| (n.id, n.level())).collect(),
            blocks,
            covered,
            placement,
        })
    }

    /// Block cost of serving `client` at `node`.
    pub fn b(&self, node: NodeId, client: ClientId) -> Option<i64> {
        self.blocks.get(&(node, client)).copied()
    }

    /// Whether `node` currently serves `client`.
    pub fn x(&self, node: NodeId, client: ClientId) -> bool {
        self.placement.get(&client).is_some_and(|p| p.node == node)
    }

    pub fn served_clients(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.placement.keys().copied()
    }

    /// Clients served by `i` or `j` and covered by both, in id order.
    pub fn candidates(&self, i: NodeId, j: NodeId) -> Vec<ClientId> {
        self.placement
            .iter()
            .filter(|(_, p)| p.node == i || p.node == j)
            .map(|(client, _)| *client)
            .filter(|client| self.covered.contains(&(i, *client)) && self.covered.contains(&(j, *client)))
            .collect()
    }

    pub fn pair_problem(&self, i: NodeId, j: NodeId) -> Option<PairProblem> {
        let candidates = self.candidates(i, j);
        if candidates.is_empty() {
            return None;
        }

        let mut sessions = Vec::with_capacity(candidates.len());
        let mut blocks_i = Vec::with_capacity(candidates.len());
        let mut blocks_j = Vec::with_capacity(candidates.len());
        let mut current = Vec::with_capacity(candidates.len());
        let mut capacity_i = self.levels.get(&i).copied().unwrap_or(0);
        let mut capacity_j = self.levels.get(&j).copied().unwrap_or(0);

        for client in &candidates {
            let p = self.placement.get(client)?;
            sessions.push(p.session);
            let (b_i, b_j) = (self.b(i, *client)?, self.b(j, *client)?);
            blocks_i.push(b_i);
            blocks_j.push(b_j);
            if p.node == i {
                current.push(Side::I);
                capacity_i += b_i;
            } else {
                current.push(Side::J);
                capacity_j += b_j;
            }
        }

        Some(PairProblem { i, j, candidates, sessions, blocks_i, blocks_j, current, capacity_i, capacity_j })
    }

    /// Every unordered node pair with a non-empty candidate set, `i < j`.
    pub fn pair_problems(&self) -> Vec<PairProblem> {
        let mut problems = Vec::new();
        for (idx, &i) in self.nodes.iter().enumerate() {
            for &j in &self.nodes[idx + 1..] {
                if let Some(problem) = self.pair_problem(i, j) {
                    problems.push(problem);
                }
            }
        }
        problems
    }
}
