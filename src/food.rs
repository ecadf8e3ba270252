//! Food placement and the edge effect each food carries
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::agent::AgentState;
use crate::config::FieldConfig;
use crate::error::SourceError;
use crate::topology::{EdgeName, EdgeState, EdgeTopology};

/// The uniform random capability the selector draws from
pub trait UniformSource {
    /// an integer in `[lo, hi)`
    fn uniform_int(&mut self, lo: i32, hi: i32) -> Result<i32, SourceError>;

    /// a fair coin
    fn uniform_bool(&mut self) -> Result<bool, SourceError>;
}

impl<R: Rng + ?Sized> UniformSource for R {
    fn uniform_int(&mut self, lo: i32, hi: i32) -> Result<i32, SourceError> {
        if lo >= hi {
            return Err(SourceError::EmptyRange { lo, hi });
        }
        Ok(self.gen_range(lo..hi))
    }

    fn uniform_bool(&mut self) -> Result<bool, SourceError> {
        Ok(self.gen_bool(0.5))
    }
}

/// A food item. Its edge effect is chosen when it is placed but only touches the
/// edge table once it is eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoodItem {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
    /// only an agent on the same sheet can eat it
    pub sheet: bool,
    #[allow(missing_docs)]
    pub next_edge: EdgeName,
    #[allow(missing_docs)]
    pub next_effect: EdgeState,
}

impl FoodItem {
    /// same cell and same sheet
    pub fn is_eaten_by(&self, agent: &AgentState) -> bool {
        agent.is_at(self.x, self.y, self.sheet)
    }
}

fn sample_cell<R: UniformSource + ?Sized>(
    field: &FieldConfig,
    rng: &mut R,
) -> Result<(i32, i32), SourceError> {
    let column = rng.uniform_int(0, field.columns())?;
    let row = rng.uniform_int(0, field.rows())?;
    Ok((column * field.cell_size, row * field.cell_size))
}

/// The first food of a session: random cell, given effect, on the agent's sheet
pub fn opening_food<R: UniformSource + ?Sized>(
    field: &FieldConfig,
    agent_sheet: bool,
    next_edge: EdgeName,
    next_effect: EdgeState,
    rng: &mut R,
) -> Result<FoodItem, SourceError> {
    let (x, y) = sample_cell(field, rng)?;
    Ok(FoodItem {
        x,
        y,
        sheet: agent_sheet,
        next_edge,
        next_effect,
    })
}

/// Pick the food that replaces one that was just eaten.
///
/// `edges` must already have the eaten food's effect applied. The new food goes on a
/// random sheet only when some axis is straight/twisted, since otherwise the other
/// sheet cannot be reached; else it goes on `current_sheet`.
pub fn select_next_food<R: UniformSource + ?Sized>(
    edges: &EdgeTopology,
    field: &FieldConfig,
    current_sheet: bool,
    rng: &mut R,
) -> Result<FoodItem, SourceError> {
    let (x, y) = sample_cell(field, rng)?;
    let edge_choices = EdgeName::all();
    let effect_choices = EdgeState::all();
    let next_edge = edge_choices[rng.uniform_int(0, edge_choices.len() as i32)? as usize];
    let next_effect = effect_choices[rng.uniform_int(0, effect_choices.len() as i32)? as usize];
    let sheet = if edges.has_orientation_reversing_axis() {
        rng.uniform_bool()?
    } else {
        current_sheet
    };
    debug!(x, y, sheet, %next_edge, %next_effect, "placed food");
    Ok(FoodItem {
        x,
        y,
        sheet,
        next_edge,
        next_effect,
    })
}
