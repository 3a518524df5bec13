use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::fog_system_model::mobility::mobility_model::{FrameUpdate, MobilityModel};
use crate::domain::fog_system_model::topology::{Position, Topology};
use crate::domain::fog_system_model::utils::id::ClientId;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomWalkParams {
    /// Walkers present at any time.
    pub num_clients: usize,
    /// Largest displacement per axis and frame, in metres.
    pub max_step: f64,
    /// Frames a walker lives before it is replaced by a new one. `None` keeps walkers forever.
    pub lifetime_frames: Option<u64>,
}

impl Default for RandomWalkParams {
    fn default() -> Self {
        Self { num_clients: 20, max_step: 5.0, lifetime_frames: None }
    }
}

#[derive(Debug, Clone, Copy)]
struct Walker {
    id: ClientId,
    position: Position,
    born: u64,
}

/// Synthetic walkers moving uniformly at random inside the topology area.
#[derive(Debug)]
pub struct RandomWalkMobility {
    params: RandomWalkParams,
    area: Topology,
    rng: StdRng,
    walkers: Vec<Walker>,
    next_id: u64,
}

impl RandomWalkMobility {
    pub fn new(params: RandomWalkParams, area: Topology, seed: u64) -> Self {
        Self { params, area, rng: StdRng::seed_from_u64(seed), walkers: Vec::new(), next_id: 0 }
    }

    fn spawn(&mut self, frame: u64) -> Walker {
        let x = self.area.origin.x + self.rng.random_range(0.0..=self.area.length.max(0.0));
        let y = self.area.origin.y + self.rng.random_range(0.0..=self.area.breadth.max(0.0));
        let walker = Walker { id: ClientId::new(self.next_id), position: Position::new(x, y), born: frame };
        self.next_id += 1;
        walker
    }

    fn step(&mut self, position: Position) -> Position {
        let reach = self.params.max_step.abs();
        let dx = self.rng.random_range(-reach..=reach);
        let dy = self.rng.random_range(-reach..=reach);
        self.area.clamp(Position::new(position.x + dx, position.y + dy))
    }
}

impl MobilityModel for RandomWalkMobility {
    fn update(&mut self, frame: u64) -> Result<FrameUpdate> {
        let mut update = FrameUpdate::default();
        let mut survivors = Vec::with_capacity(self.walkers.len());

        for mut walker in std::mem::take(&mut self.walkers) {
            let expired = self.params.lifetime_frames.is_some_and(|life| frame.saturating_sub(walker.born) >= life);
            if expired {
                update.retired.push(walker.id);
                continue;
            }
            walker.position = self.step(walker.position);
            update.moved.push((walker.id, walker.position));
            survivors.push(walker);
        }

        while survivors.len() < self.params.num_clients {
            let walker = self.spawn(frame);
            update.appeared.push((walker.id, walker.position));
            survivors.push(walker);
        }

        self.walkers = survivors;
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Topology {
        Topology::new(Position::new(0.0, 0.0), 100.0, 50.0)
    }

    #[test]
    fn test_walkers_stay_inside_area() {
        let mut model = RandomWalkMobility::new(RandomWalkParams { num_clients: 10, max_step: 30.0, lifetime_frames: None }, area(), 1);

        let first = model.update(1).unwrap();
        assert_eq!(first.appeared.len(), 10);

        for frame in 2..50 {
            let update = model.update(frame).unwrap();
            assert_eq!(update.moved.len(), 10);
            assert!(update.moved.iter().all(|(_, p)| area().contains(p)), "Frame {} left the area", frame);
        }
    }

    #[test]
    fn test_expired_walkers_are_replaced() {
        let mut model = RandomWalkMobility::new(RandomWalkParams { num_clients: 3, max_step: 1.0, lifetime_frames: Some(2) }, area(), 9);

        model.update(1).unwrap();
        model.update(2).unwrap();
        let third = model.update(3).unwrap();

        assert_eq!(third.retired.len(), 3);
        assert_eq!(third.appeared.len(), 3);
        assert!(third.appeared.iter().all(|(id, _)| id.id >= 3), "Replacements get fresh ids");
    }

    #[test]
    fn test_same_seed_same_walk() {
        let params = RandomWalkParams::default();
        let mut a = RandomWalkMobility::new(params, area(), 42);
        let mut b = RandomWalkMobility::new(params, area(), 42);

        for frame in 1..10 {
            assert_eq!(a.update(frame).unwrap(), b.update(frame).unwrap());
        }
    }
}
