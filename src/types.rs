//! various types that are useful for driving a session
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::time::Duration;

/// A vector with which to do positional math
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    /// x component
    pub x: i32,
    /// y component
    pub y: i32,
}

impl Vector {
    /// multiply both components by `factor`
    pub fn scale(self, factor: i32) -> Vector {
        Vector {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// Represents a move. Screen coordinates: y grows downward, so `Up` is negative y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    #[allow(missing_docs)]
    Left,
    #[allow(missing_docs)]
    Down,
    #[allow(missing_docs)]
    Up,
    #[allow(missing_docs)]
    Right,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Left => write!(f, "left"),
            Move::Right => write!(f, "right"),
            Move::Up => write!(f, "up"),
            Move::Down => write!(f, "down"),
        }
    }
}

impl Move {
    /// convert this move to a unit vector
    pub fn to_vector(self) -> Vector {
        match self {
            Move::Left => Vector { x: -1, y: 0 },
            Move::Right => Vector { x: 1, y: 0 },
            Move::Up => Vector { x: 0, y: -1 },
            Move::Down => Vector { x: 0, y: 1 },
        }
    }

    /// create a Move from the given unit vector, None for anything else
    pub fn from_vector(vector: Vector) -> Option<Self> {
        match vector {
            Vector { x: -1, y: 0 } => Some(Self::Left),
            Vector { x: 1, y: 0 } => Some(Self::Right),
            Vector { x: 0, y: -1 } => Some(Self::Up),
            Vector { x: 0, y: 1 } => Some(Self::Down),
            _ => None,
        }
    }

    /// returns all possible moves
    pub fn all() -> [Move; 4] {
        [Move::Up, Move::Down, Move::Left, Move::Right]
    }
}

/// What the input collaborator asks of the session for one tick. Raw key events
/// never reach the engine, only these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Request {
    /// keep going
    #[default]
    None,
    /// steer one cell per tick in the given direction
    Move(Move),
    /// extend the target trail length by this many cells
    Grow(u16),
    /// raise the pacing rate by the configured step
    SpeedUp,
}

/// Instruments to be used with a session
pub trait TickInstruments: std::fmt::Debug {
    /// called once per committed tick with its wall time
    fn observe_tick(&self, duration: Duration);
}

/// Instruments that discard every observation
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInstruments;

impl TickInstruments for NoInstruments {
    fn observe_tick(&self, _duration: Duration) {}
}
