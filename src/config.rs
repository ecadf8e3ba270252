//! Field dimensions and session tunables
//!
//! Screen size, cell size and pacing are all carried here and handed to
//! [crate::session::Session] at construction.
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::topology::{EdgeName, EdgeState};

/// The cell grid the agent moves on. All coordinates are pixel offsets that are
/// multiples of `cell_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// width of the playfield
    pub width: i32,
    /// height of the playfield
    pub height: i32,
    /// side length of one cell, also the distance moved per tick
    pub cell_size: i32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            width: 640,
            height: 480,
            cell_size: 10,
        }
    }
}

impl FieldConfig {
    /// build and validate a field
    pub fn new(width: i32, height: i32, cell_size: i32) -> Result<Self, ConfigurationError> {
        let field = FieldConfig {
            width,
            height,
            cell_size,
        };
        field.validate()?;
        Ok(field)
    }

    /// check that the field is made of at least 2x2 whole cells
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("cell_size", self.cell_size),
        ] {
            if value <= 0 {
                return Err(ConfigurationError::NonPositive { name, value });
            }
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value % self.cell_size != 0 {
                return Err(ConfigurationError::NotCellAligned {
                    name,
                    value,
                    cell_size: self.cell_size,
                });
            }
        }
        if self.columns() < 2 || self.rows() < 2 {
            return Err(ConfigurationError::FieldTooSmall {
                columns: self.columns(),
                rows: self.rows(),
            });
        }
        Ok(())
    }

    /// number of cells across
    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    /// number of cells down
    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    /// the cell-aligned centre of the field, where every session starts
    pub fn center(&self) -> (i32, i32) {
        (
            self.columns() / 2 * self.cell_size,
            self.rows() / 2 * self.cell_size,
        )
    }

    /// determines if a given coordinate pair is a cell inside the field
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0
            && x < self.width
            && y >= 0
            && y < self.height
            && x % self.cell_size == 0
            && y % self.cell_size == 0
    }
}

/// Everything needed to start a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[allow(missing_docs)]
    pub field: FieldConfig,
    /// ticks per second handed to the external pacer at session start
    pub initial_speed: u32,
    /// how much a speed-up request adds to the pacing rate
    pub speed_step: u32,
    /// the bulk growth the input layer should request for its "extend" key
    pub grow_bulk: u16,
    /// the edge the first food of a session will change
    pub opening_edge: EdgeName,
    /// what the first food of a session does to `opening_edge`
    pub opening_effect: EdgeState,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            field: FieldConfig::default(),
            initial_speed: 15,
            speed_step: 5,
            grow_bulk: 10,
            opening_edge: EdgeName::Top,
            opening_effect: EdgeState::Twisted,
        }
    }
}

impl SessionConfig {
    #[allow(missing_docs)]
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.field.validate()
    }
}
