use std::collections::BTreeMap;

use slotmap::SlotMap;

use crate::domain::fog_system_model::client::client::Client;
use crate::domain::fog_system_model::client::session::{PowerClass, PowerParams, Session};
use crate::domain::fog_system_model::resource::fog_node::{FogNode, ServingEntry};
use crate::domain::fog_system_model::resource::session_process::{ProcessKey, ProcessState, SessionProcess};
use crate::domain::fog_system_model::topology::Position;
use crate::domain::fog_system_model::utils::id::{ClientId, NodeId, SessionId};
use crate::error::{Error, Result};

/// Result of the admission step of a freshly spawned session process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted { blocks: i64 },
    Rejected { required: i64, available: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    Migrated { from: NodeId, to: NodeId, blocks: i64 },
    /// The session had no serving node any more; nothing was changed.
    NotServed,
    OutOfCoverage,
    InsufficientCapacity { required: i64, available: i64 },
    /// The target would not need fewer blocks than the session holds now.
    NoSaving { required: i64, held: i64 },
}

impl MigrationOutcome {
    pub fn is_migrated(&self) -> bool {
        matches!(self, MigrationOutcome::Migrated { .. })
    }
}

/// All fog nodes, clients and sessions of a run, plus the bidirectional client/node index.
///
/// Every mutation that touches a serving relation (admit, remove, migrate, retire) updates the
/// node's serving map, the client's node reference and the session/node map together.
#[derive(Debug)]
pub struct FogNetwork {
    nodes: Vec<FogNode>,
    clients: BTreeMap<ClientId, Client>,
    sessions: BTreeMap<SessionId, Session>,
    service_map: BTreeMap<SessionId, NodeId>,
    processes: SlotMap<ProcessKey, SessionProcess>,
    spawned: Vec<ProcessKey>,
    power: PowerParams,
    next_session_id: u64,
}

impl FogNetwork {
    /// Node ids must match their position in `nodes`.
    pub fn new(nodes: Vec<FogNode>, power: PowerParams) -> Result<Self> {
        if let Some((idx, node)) = nodes.iter().enumerate().find(|(idx, node)| node.id.index() != *idx) {
            return Err(Error::InvariantViolation(format!("Fog node {:?} stored at index {}", node.id, idx)));
        }

        Ok(Self {
            nodes,
            clients: BTreeMap::new(),
            sessions: BTreeMap::new(),
            service_map: BTreeMap::new(),
            processes: SlotMap::with_key(),
            spawned: Vec::new(),
            power,
            next_session_id: 0,
        })
    }

    pub fn nodes(&self) -> &[FogNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Result<&FogNode> {
        self.nodes.get(id.index()).ok_or(Error::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut FogNode> {
        self.nodes.get_mut(id.index()).ok_or(Error::UnknownNode(id))
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    pub fn client(&self, id: ClientId) -> Result<&Client> {
        self.clients.get(&id).ok_or(Error::UnknownClient(id))
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn session(&self, id: SessionId) -> Result<&Session> {
        self.sessions.get(&id).ok_or(Error::UnknownSession(id))
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    /// Serving node of a session according to the session/node map.
    pub fn node_of(&self, session: SessionId) -> Option<NodeId> {
        self.service_map.get(&session).copied()
    }

    /// Sessions currently held by some node, in id order.
    pub fn served_sessions(&self) -> Vec<SessionId> {
        self.service_map.keys().copied().collect()
    }

    /// Clients without a session, in id order.
    pub fn unserved_clients(&self) -> Vec<ClientId> {
        self.clients.values().filter(|c| c.session.is_none() && c.allotted_node.is_none()).map(|c| c.id).collect()
    }

    pub fn served_client_count(&self) -> usize {
        self.clients.values().filter(|c| c.is_served()).count()
    }

    pub fn power(&self) -> &PowerParams {
        &self.power
    }

    /// Registers a client or, if it is already known, moves it.
    pub fn upsert_client(&mut self, id: ClientId, position: Position) {
        self.clients.entry(id).and_modify(|c| c.position = position).or_insert_with(|| Client::new(id, position));
    }

    pub fn move_client(&mut self, id: ClientId, position: Position) -> Result<()> {
        let client = self.clients.get_mut(&id).ok_or(Error::UnknownClient(id))?;
        client.position = position;
        Ok(())
    }

    /// Removes a client, ending its session first. Returns whether a session was ended.
    pub fn retire_client(&mut self, id: ClientId) -> Result<bool> {
        let client = self.client(id)?.clone();

        let mut ended = false;
        if let Some(session) = client.session {
            if let Some(node) = self.node_of(session) {
                ended = self.remove_service(node, session)?;
            }
            self.discard_session(session)?;
        }

        self.clients.remove(&id);
        Ok(ended)
    }

    /// Creates an unplaced session for a client that has none.
    pub fn create_session(&mut self, client: ClientId, requested_rate: f64, content_type: usize) -> Result<SessionId> {
        let owner = self.clients.get_mut(&client).ok_or(Error::UnknownClient(client))?;
        if let Some(existing) = owner.session {
            return Err(Error::InvariantViolation(format!("{:?} already holds {:?}", client, existing)));
        }

        let id = SessionId::new(self.next_session_id);
        self.next_session_id += 1;

        owner.session = Some(id);
        self.sessions.insert(id, Session::new(id, client, requested_rate, content_type));
        Ok(id)
    }

    /// Destroys a session that no node is serving.
    pub fn discard_session(&mut self, id: SessionId) -> Result<()> {
        if let Some(node) = self.node_of(id) {
            return Err(Error::InvariantViolation(format!("Cannot discard {:?} while {:?} serves it", id, node)));
        }

        let session = self.sessions.remove(&id).ok_or(Error::UnknownSession(id))?;
        if let Some(client) = self.clients.get_mut(&session.client) {
            client.session = None;
        }
        Ok(())
    }

    /// Nodes whose coverage strictly contains the client, in id order.
    pub fn feasible_nodes(&self, client: ClientId) -> Result<Vec<NodeId>> {
        let position = self.client(client)?.position;
        Ok(self.nodes.iter().filter(|n| n.covers(position)).map(|n| n.id).collect())
    }

    /// SINR of `client` at `node`, interfered by every other client the node serves.
    pub fn get_sinr(&self, node: NodeId, client: ClientId) -> Result<f64> {
        let fog_node = self.node(node)?;
        let position = self.client(client)?.position;

        let interferers = fog_node
            .served_clients()
            .filter(|other| *other != client)
            .filter_map(|other| self.clients.get(&other).map(|c| c.position))
            .collect::<Vec<_>>();

        Ok(fog_node.channel.sinr(fog_node.position, position, interferers))
    }

    /// Blocks `node` would need to carry `rate` Mbit/s to `client` right now.
    pub fn get_resource_blocks(&self, node: NodeId, client: ClientId, rate: f64) -> Result<i64> {
        let sinr = self.get_sinr(node, client)?;
        let fog_node = self.node(node)?;
        Ok(fog_node.channel.resource_blocks(sinr, rate, fog_node.capacity()))
    }

    /// Places `session` on `node` and runs the admission step of its serving process.
    ///
    /// A rejected session is left unplaced; the caller decides whether to discard it.
    pub fn add_service(&mut self, node: NodeId, session: SessionId, migrated: bool) -> Result<Admission> {
        let (client, rate, content_type) = {
            let s = self.session(session)?;
            (s.client, s.requested_rate, s.content_type)
        };
        if self.node_of(session).is_some() {
            return Err(Error::InvariantViolation(format!("{:?} is already placed", session)));
        }
        self.client(client)?;

        let power_class = if self.node(node)?.caches(content_type) { PowerClass::Cached } else { PowerClass::Uncached };
        let process = self.processes.insert(SessionProcess::new(session, client, node, migrated));
        {
            let fog_node = self.node_mut(node)?;
            if !migrated {
                fog_node.incoming_services += 1;
            }
            fog_node.serving.insert(client, ServingEntry { session, process });
        }
        if let Some(c) = self.clients.get_mut(&client) {
            c.allotted_node = Some(node);
        }
        if let Some(s) = self.sessions.get_mut(&session) {
            s.power_class = power_class;
        }

        let required = self.get_resource_blocks(node, client, rate)?;
        let available = self.node(node)?.level();

        if !self.node(node)?.container.can_acquire(required) {
            self.node_mut(node)?.serving.remove(&client);
            self.processes.remove(process);
            if let Some(c) = self.clients.get_mut(&client) {
                c.allotted_node = None;
            }
            log::debug!("{:?} rejected {:?}: requires {} blocks, {} available", node, session, required, available);
            return Ok(Admission::Rejected { required, available });
        }

        let grant = {
            let fog_node = self.node_mut(node)?;
            if !migrated {
                fog_node.services_served += 1;
            }
            fog_node.container.acquire(required)?
        };
        if let Some(p) = self.processes.get_mut(process) {
            p.start_serving(grant);
        }
        if let Some(s) = self.sessions.get_mut(&session) {
            s.blocks = required;
        }
        self.service_map.insert(session, node);
        self.spawned.push(process);

        log::debug!("{:?} admitted {:?} with {} blocks (migrated: {})", node, session, required, migrated);
        Ok(Admission::Admitted { blocks: required })
    }

    /// Ends the service of `session` at `node`, releasing its blocks.
    ///
    /// Returns `false` without changing anything when the node does not serve the session.
    pub fn remove_service(&mut self, node: NodeId, session: SessionId) -> Result<bool> {
        let client = match self.sessions.get(&session) {
            Some(s) => s.client,
            None => return Ok(false),
        };
        let process = match self.node(node)?.serving_entry(client) {
            Some(entry) if entry.session == session => entry.process,
            _ => return Ok(false),
        };

        let grant = self.processes.remove(process).and_then(|mut p| p.terminate());
        {
            let fog_node = self.node_mut(node)?;
            fog_node.serving.remove(&client);
            if let Some(grant) = grant {
                fog_node.container.release(grant)?;
            }
        }
        if let Some(c) = self.clients.get_mut(&client) {
            c.allotted_node = None;
        }
        if let Some(s) = self.sessions.get_mut(&session) {
            s.blocks = 0;
        }
        self.service_map.remove(&session);

        Ok(true)
    }

    /// Moves a served session to `target`, keeping its identity.
    ///
    /// The target must cover the client and have enough spare blocks, otherwise nothing changes.
    pub fn migrate_service(&mut self, session: SessionId, target: NodeId) -> Result<MigrationOutcome> {
        self.migrate(session, target, false)
    }

    /// Like [`FogNetwork::migrate_service`], but only moves the session when the target serves it
    /// with strictly fewer blocks than it holds now.
    pub fn migrate_if_saving(&mut self, session: SessionId, target: NodeId) -> Result<MigrationOutcome> {
        self.migrate(session, target, true)
    }

    fn migrate(&mut self, session: SessionId, target: NodeId, require_saving: bool) -> Result<MigrationOutcome> {
        let Some(source) = self.node_of(session) else {
            log::warn!("Migration of {:?} to {:?} ignored: session is not served", session, target);
            return Ok(MigrationOutcome::NotServed);
        };
        if source == target {
            return Err(Error::InvariantViolation(format!("Migration of {:?} onto its own node {:?}", session, source)));
        }

        let (client, rate, held) = {
            let s = self.session(session)?;
            (s.client, s.requested_rate, s.blocks)
        };
        let position = self.client(client)?.position;
        if !self.node(target)?.covers(position) {
            log::debug!("Migration of {:?} {:?} -> {:?} skipped: out of coverage", session, source, target);
            return Ok(MigrationOutcome::OutOfCoverage);
        }

        let required = self.get_resource_blocks(target, client, rate)?;
        if require_saving && required >= held {
            log::debug!("Migration of {:?} {:?} -> {:?} skipped: requires {} blocks, holds {}", session, source, target, required, held);
            return Ok(MigrationOutcome::NoSaving { required, held });
        }

        let available = self.node(target)?.level();
        if !self.node(target)?.container.can_acquire(required) {
            log::debug!("Migration of {:?} {:?} -> {:?} skipped: requires {} blocks, {} available", session, source, target, required, available);
            return Ok(MigrationOutcome::InsufficientCapacity { required, available });
        }

        self.remove_service(source, session)?;
        match self.add_service(target, session, true)? {
            Admission::Admitted { blocks } => Ok(MigrationOutcome::Migrated { from: source, to: target, blocks }),
            Admission::Rejected { required, available } => {
                log::warn!("{:?} dropped during migration {:?} -> {:?}", session, source, target);
                self.discard_session(session)?;
                Ok(MigrationOutcome::InsufficientCapacity { required, available })
            }
        }
    }

    /// Processes spawned since the last call, ready to be scheduled.
    pub fn take_spawned(&mut self) -> Vec<ProcessKey> {
        std::mem::take(&mut self.spawned)
    }

    /// One tick of a serving process. Returns `false` once the process is gone and must not be
    /// rescheduled.
    pub fn resume_process(&mut self, key: ProcessKey, tick: f64) -> Result<bool> {
        let Some(process) = self.processes.get(key) else {
            return Ok(false);
        };
        if process.state() != ProcessState::Serving {
            return Ok(false);
        }

        let (node, client, session) = (process.node, process.client, process.session);
        let still_serving = self.node(node)?.serving_entry(client).is_some_and(|e| e.process == key);
        if !still_serving {
            return Ok(false);
        }

        let s = self.session(session)?;
        let energy = self.power.power_for(s.power_class) * tick;
        let throughput = s.requested_rate * tick;

        let fog_node = self.node_mut(node)?;
        fog_node.energy_consumed += energy;
        fog_node.overall_throughput += throughput;
        Ok(true)
    }

    /// Verifies the container and serving-index invariants of every node.
    pub fn check_invariants(&self) -> Result<()> {
        for node in &self.nodes {
            if node.level() < 0 || node.level() > node.capacity() {
                return Err(Error::InvariantViolation(format!("{:?} level {} outside [0, {}]", node.id, node.level(), node.capacity())));
            }
            if node.services_served() > node.incoming_services() {
                return Err(Error::InvariantViolation(format!(
                    "{:?} served {} exceeds incoming {}",
                    node.id,
                    node.services_served(),
                    node.incoming_services()
                )));
            }

            let mut held = 0;
            for (client, entry) in &node.serving {
                let process = self.processes.get(entry.process).ok_or_else(|| Error::InvariantViolation(format!("{:?} has no process for {:?}", node.id, client)))?;
                if process.state() != ProcessState::Serving || process.session != entry.session {
                    return Err(Error::InvariantViolation(format!("{:?} holds a stale process for {:?}", node.id, client)));
                }
                if self.clients.get(client).and_then(|c| c.allotted_node) != Some(node.id) {
                    return Err(Error::InvariantViolation(format!("{:?} serves {:?} which points elsewhere", node.id, client)));
                }
                if self.node_of(entry.session) != Some(node.id) {
                    return Err(Error::InvariantViolation(format!("Session map disagrees with {:?} on {:?}", node.id, entry.session)));
                }
                held += process.allocated_blocks();
            }

            if node.allocated() != held {
                return Err(Error::InvariantViolation(format!("{:?} has {} blocks allocated but processes hold {}", node.id, node.allocated(), held)));
            }
        }

        for client in self.clients.values() {
            if let Some(node) = client.allotted_node {
                if !self.node(node)?.is_serving(client.id) {
                    return Err(Error::InvariantViolation(format!("{:?} points to {:?} which does not serve it", client.id, node)));
                }
            }
        }

        Ok(())
    }
}
