use std::collections::BTreeMap;
use std::io::Read;

use serde::Deserialize;

use crate::domain::fog_system_model::mobility::mobility_model::{FrameUpdate, MobilityModel, Trajectory};
use crate::domain::fog_system_model::topology::Position;
use crate::domain::fog_system_model::utils::id::ClientId;
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct TraceRecord {
    #[serde(rename = "Vehicle_ID")]
    vehicle_id: u64,
    #[serde(rename = "Frame_ID")]
    frame_id: u64,
    #[serde(rename = "Global_X")]
    global_x: f64,
    #[serde(rename = "Global_Y")]
    global_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TraceState {
    Pending,
    Active { cursor: usize },
    Done,
}

/// Replays recorded vehicle trajectories.
///
/// A vehicle appears at the first frame that reaches its earliest sample, advances one
/// sample per frame and is retired once its samples run out.
#[derive(Debug)]
pub struct TraceMobility {
    trajectories: BTreeMap<ClientId, Trajectory>,
    states: BTreeMap<ClientId, TraceState>,
}

impl TraceMobility {
    pub fn new(trajectories: BTreeMap<ClientId, Trajectory>) -> Self {
        let states = trajectories.keys().map(|id| (*id, TraceState::Pending)).collect();
        Self { trajectories, states }
    }

    pub fn from_csv(file_path: &str) -> Result<Self> {
        let file = std::fs::File::open(file_path)?;
        let model = Self::from_reader(file)?;
        log::info!("Loaded {} vehicle trajectories from '{}'.", model.trajectories.len(), file_path);
        Ok(model)
    }

    /// Reads a comma separated trace with `Vehicle_ID`, `Frame_ID`, `Global_X` and `Global_Y`
    /// columns. Other columns are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut samples: BTreeMap<ClientId, Vec<(u64, Position)>> = BTreeMap::new();

        for record in rdr.deserialize() {
            let record: TraceRecord = record?;
            samples.entry(ClientId::new(record.vehicle_id)).or_default().push((record.frame_id, Position::new(record.global_x, record.global_y)));
        }

        Ok(Self::new(samples.into_iter().map(|(id, s)| (id, Trajectory::new(s))).collect()))
    }

    pub fn trajectory(&self, id: ClientId) -> Option<&Trajectory> {
        self.trajectories.get(&id)
    }
}

impl MobilityModel for TraceMobility {
    fn update(&mut self, frame: u64) -> Result<FrameUpdate> {
        let mut update = FrameUpdate::default();

        for (id, trajectory) in &self.trajectories {
            let Some(state) = self.states.get_mut(id) else { continue };

            match *state {
                TraceState::Pending => {
                    if trajectory.first_frame().is_some_and(|first| first <= frame) {
                        if let Some(position) = trajectory.position_at(0) {
                            update.appeared.push((*id, position));
                            *state = TraceState::Active { cursor: 1 };
                        }
                    }
                }
                TraceState::Active { cursor } => match trajectory.position_at(cursor) {
                    Some(position) => {
                        update.moved.push((*id, position));
                        *state = TraceState::Active { cursor: cursor + 1 };
                    }
                    None => {
                        update.retired.push(*id);
                        *state = TraceState::Done;
                    }
                },
                TraceState::Done => {}
            }
        }

        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = "Vehicle_ID,Frame_ID,Global_X,Global_Y,v_Vel\n\
                         7,2,10.0,0.0,1.0\n\
                         7,3,11.0,0.0,1.0\n\
                         3,1,0.0,0.0,0.5\n";

    #[test]
    fn test_vehicles_appear_move_and_retire() {
        let mut model = TraceMobility::from_reader(TRACE.as_bytes()).unwrap();

        let f1 = model.update(1).unwrap();
        assert_eq!(f1.appeared, vec![(ClientId::new(3), Position::new(0.0, 0.0))]);

        let f2 = model.update(2).unwrap();
        assert_eq!(f2.appeared, vec![(ClientId::new(7), Position::new(10.0, 0.0))]);
        assert_eq!(f2.retired, vec![ClientId::new(3)], "Single-sample vehicle leaves after its frame");

        let f3 = model.update(3).unwrap();
        assert_eq!(f3.moved, vec![(ClientId::new(7), Position::new(11.0, 0.0))]);

        let f4 = model.update(4).unwrap();
        assert_eq!(f4.retired, vec![ClientId::new(7)]);
        assert!(model.update(5).unwrap().is_empty());
    }

    #[test]
    fn test_trajectory_positions_restart() {
        let model = TraceMobility::from_reader(TRACE.as_bytes()).unwrap();
        let trajectory = model.trajectory(ClientId::new(7)).unwrap();

        assert_eq!(trajectory.positions().count(), 2);
        assert_eq!(trajectory.positions().next(), Some(Position::new(10.0, 0.0)));
    }
}
