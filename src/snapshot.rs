//! The read-only view a renderer (or a test fixture) gets of a session
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::agent::AgentState;
use crate::config::FieldConfig;
use crate::food::FoodItem;
use crate::topology::EdgeTopology;
use crate::trail::Segment;

/// Whether the session still accepts ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[allow(missing_docs)]
    #[default]
    Running,
    /// the snake ran into itself; only restart or quit make sense now
    Over,
}

/// Everything needed to draw one frame, and everything needed to rebuild the session
/// that produced it.
/// ```
/// # use manifold_snake::snapshot::Snapshot;
/// let body = br#"{"field":{"width":40,"height":30,"cell_size":10},"tick":3,"status":"running","speed":15,
///   "agent":{"x":10,"y":0,"dx":0,"dy":-10,"sheet":true},
///   "trail":[{"x":10,"y":10,"sheet":true},{"x":10,"y":0,"sheet":true}],"target_length":2,
///   "food":{"x":30,"y":20,"sheet":true,"next_edge":"top","next_effect":"twisted"},
///   "edges":{"left":"straight","right":"straight","top":"twisted","bottom":"straight"}}"#;
/// let s: Snapshot = serde_json::from_slice(body).unwrap();
/// assert_eq!(s.trail.len(), 2);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    #[allow(missing_docs)]
    pub field: FieldConfig,
    /// ticks committed since the session (re)started
    pub tick: u64,
    #[allow(missing_docs)]
    pub status: SessionStatus,
    /// ticks per second the pacer should run at
    pub speed: u32,
    #[allow(missing_docs)]
    pub agent: AgentState,
    /// oldest first, the last entry is the head
    pub trail: Vec<Segment>,
    #[allow(missing_docs)]
    pub target_length: usize,
    #[allow(missing_docs)]
    pub food: FoodItem,
    #[allow(missing_docs)]
    pub edges: EdgeTopology,
}

impl Snapshot {
    #[allow(missing_docs)]
    pub fn is_over(&self) -> bool {
        self.status == SessionStatus::Over
    }
}

// front sheet in lower case, back sheet in upper case
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.field.cell_size;
        writeln!(f)?;
        for row in 0..self.field.rows() {
            for column in 0..self.field.columns() {
                let (x, y) = (column * cell, row * cell);
                let on = |sheet: bool, front: char| {
                    if sheet {
                        front
                    } else {
                        front.to_ascii_uppercase()
                    }
                };
                if self.agent.x == x && self.agent.y == y {
                    write!(f, "{}", on(self.agent.sheet, 'h'))?;
                } else if let Some(s) = self.trail.iter().rev().find(|s| s.x == x && s.y == y) {
                    write!(f, "{}", on(s.sheet, 's'))?;
                } else if self.food.x == x && self.food.y == y {
                    write!(f, "{}", on(self.food.sheet, 'f'))?;
                } else {
                    write!(f, ".")?;
                }
                write!(f, " ")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "(tick: {} {:?} length: {}/{} edges: {} next: {} -> {})",
            self.tick,
            self.status,
            self.trail.len(),
            self.target_length,
            self.edges,
            self.food.next_edge,
            self.food.next_effect
        )
    }
}
