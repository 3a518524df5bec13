use crate::domain::fog_system_model::topology::Position;
use crate::domain::fog_system_model::utils::id::ClientId;
use crate::error::Result;

/// Client changes produced by one mobility frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameUpdate {
    pub appeared: Vec<(ClientId, Position)>,
    pub moved: Vec<(ClientId, Position)>,
    pub retired: Vec<ClientId>,
}

impl FrameUpdate {
    pub fn is_empty(&self) -> bool {
        self.appeared.is_empty() && self.moved.is_empty() && self.retired.is_empty()
    }
}

/// Source of client positions, queried once per tick with a strictly increasing frame number.
pub trait MobilityModel: std::fmt::Debug {
    fn update(&mut self, frame: u64) -> Result<FrameUpdate>;
}

/// Recorded path of one client, ordered by frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    samples: Vec<(u64, Position)>,
}

impl Trajectory {
    pub fn new(mut samples: Vec<(u64, Position)>) -> Self {
        samples.sort_by_key(|(frame, _)| *frame);
        Self { samples }
    }

    pub fn first_frame(&self) -> Option<u64> {
        self.samples.first().map(|(frame, _)| *frame)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn position_at(&self, idx: usize) -> Option<Position> {
        self.samples.get(idx).map(|(_, p)| *p)
    }

    /// Positions in frame order. Each call starts from the beginning.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.samples.iter().map(|(_, p)| *p)
    }
}
