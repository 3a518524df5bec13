use slotmap::new_key_type;

use crate::domain::fog_system_model::resource::resource_container::ResourceGrant;
use crate::domain::fog_system_model::utils::id::{ClientId, NodeId, SessionId};

new_key_type! {
    /// Generational handle of a session-serving process. Continuations scheduled for a
    /// process that has since been removed fail to resolve and are dropped.
    pub struct ProcessKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Spawned, admission step not yet evaluated.
    Admitted,
    /// Holds its blocks and accrues energy and throughput each tick.
    Serving,
    /// Blocks released; the process only waits to be reaped.
    Terminating,
}

/// Per-session serving process run by a fog node.
#[derive(Debug)]
pub struct SessionProcess {
    pub session: SessionId,
    pub client: ClientId,
    pub node: NodeId,
    pub migrated: bool,
    state: ProcessState,
    grant: Option<ResourceGrant>,
}

impl SessionProcess {
    pub fn new(session: SessionId, client: ClientId, node: NodeId, migrated: bool) -> Self {
        Self { session, client, node, migrated, state: ProcessState::Admitted, grant: None }
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn allocated_blocks(&self) -> i64 {
        self.grant.as_ref().map_or(0, ResourceGrant::amount)
    }

    /// `Admitted -> Serving`, taking ownership of the acquired blocks.
    pub fn start_serving(&mut self, grant: ResourceGrant) {
        self.grant = Some(grant);
        self.state = ProcessState::Serving;
    }

    /// Moves to `Terminating` and hands back whatever blocks the process held.
    pub fn terminate(&mut self) -> Option<ResourceGrant> {
        self.state = ProcessState::Terminating;
        self.grant.take()
    }
}
