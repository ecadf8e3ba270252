//! The agent's kinematic state
use serde::{Deserialize, Serialize};

use crate::config::FieldConfig;
use crate::types::{Move, Vector};

/// Position, velocity and sheet of the snake's head.
///
/// This is a value: every transition in the engine builds a new one, so two ticks can
/// be compared by equality. `sheet` says which face of the doubled surface the agent is
/// on; it only changes on orientation-reversing crossings and decides both the render
/// colour and which food can be eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentState {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
    #[allow(missing_docs)]
    pub dx: i32,
    #[allow(missing_docs)]
    pub dy: i32,
    #[allow(missing_docs)]
    pub sheet: bool,
}

impl AgentState {
    /// a resting agent at the centre of the field, on the front sheet
    pub fn spawn(field: &FieldConfig) -> Self {
        let (x, y) = field.center();
        AgentState {
            x,
            y,
            dx: 0,
            dy: 0,
            sheet: true,
        }
    }

    /// the velocity as a vector
    pub fn velocity(&self) -> Vector {
        Vector {
            x: self.dx,
            y: self.dy,
        }
    }

    /// replace the velocity with one cell step in the direction of `mv`
    pub fn steer(self, mv: Move, cell_size: i32) -> Self {
        let v = mv.to_vector().scale(cell_size);
        AgentState {
            dx: v.x,
            dy: v.y,
            ..self
        }
    }

    /// move by the current velocity without looking at the edges
    pub fn translate(self) -> Self {
        AgentState {
            x: self.x + self.dx,
            y: self.y + self.dy,
            ..self
        }
    }

    /// does this agent occupy the same cell on the same sheet as the given triple
    pub fn is_at(&self, x: i32, y: i32, sheet: bool) -> bool {
        self.x == x && self.y == y && self.sheet == sheet
    }
}
