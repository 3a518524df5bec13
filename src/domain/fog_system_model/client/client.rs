use crate::domain::fog_system_model::topology::Position;
use crate::domain::fog_system_model::utils::id::{ClientId, NodeId, SessionId};

/// A mobile client (vehicle). Holds at most one session and at most one serving node.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub position: Position,
    pub allotted_node: Option<NodeId>,
    pub session: Option<SessionId>,
}

impl Client {
    pub fn new(id: ClientId, position: Position) -> Self {
        Self { id, position, allotted_node: None, session: None }
    }

    pub fn is_served(&self) -> bool {
        self.allotted_node.is_some()
    }
}
