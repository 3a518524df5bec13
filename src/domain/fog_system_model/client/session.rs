use serde::{Deserialize, Serialize};

use crate::domain::fog_system_model::utils::id::{ClientId, SessionId};

/// Whether the serving node has the session's content cached locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerClass {
    Cached,
    /// Content is fetched from the cloud, which costs more energy per tick.
    Uncached,
}

/// Power draw in watts per power class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerParams {
    pub cached: f64,
    pub uncached: f64,
}

impl Default for PowerParams {
    fn default() -> Self {
        Self { cached: 1.0, uncached: 2.5 }
    }
}

impl PowerParams {
    pub fn power_for(&self, class: PowerClass) -> f64 {
        match class {
            PowerClass::Cached => self.cached,
            PowerClass::Uncached => self.uncached,
        }
    }
}

/// One service instance requested by a client.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub client: ClientId,
    /// Requested data rate in Mbit/s.
    pub requested_rate: f64,
    pub content_type: usize,
    /// Blocks held at the serving node, 0 while unplaced.
    pub blocks: i64,
    pub power_class: PowerClass,
}

impl Session {
    pub fn new(id: SessionId, client: ClientId, requested_rate: f64, content_type: usize) -> Self {
        Self { id, client, requested_rate, content_type, blocks: 0, power_class: PowerClass::Uncached }
    }
}
