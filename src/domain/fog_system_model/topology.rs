use serde::{Deserialize, Serialize};

/// Planar position in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        distance(*self, *other)
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two positions.
pub fn distance(a: Position, b: Position) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Rectangular deployment area in which fog nodes are placed on a regular grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Topology {
    pub origin: Position,
    pub length: f64,
    pub breadth: f64,
}

impl Topology {
    pub fn new(origin: Position, length: f64, breadth: f64) -> Self {
        Self { origin, length, breadth }
    }

    /// Returns `count` positions on a `ceil(sqrt(count))`-wide grid spanning the area,
    /// filled row by row starting at the origin.
    pub fn assign_positions(&self, count: usize) -> Vec<Position> {
        if count == 0 {
            return Vec::new();
        }

        let per_row = (count as f64).sqrt().ceil() as usize;
        let (dx, dy) = if per_row > 1 {
            (self.length / (per_row - 1) as f64, self.breadth / (per_row - 1) as f64)
        } else {
            (0.0, 0.0)
        };

        (0..count)
            .map(|idx| {
                let column = idx % per_row;
                let row = idx / per_row;
                Position::new(self.origin.x + column as f64 * dx, self.origin.y + row as f64 * dy)
            })
            .collect()
    }

    pub fn contains(&self, position: &Position) -> bool {
        position.x >= self.origin.x
            && position.x <= self.origin.x + self.length
            && position.y >= self.origin.y
            && position.y <= self.origin.y + self.breadth
    }

    /// Clamps a position into the area.
    pub fn clamp(&self, position: Position) -> Position {
        Position::new(
            position.x.clamp(self.origin.x, self.origin.x + self.length),
            position.y.clamp(self.origin.y, self.origin.y + self.breadth),
        )
    }
}
