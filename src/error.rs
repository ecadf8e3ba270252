//! error types returned across the engine boundary
use thiserror::Error;

/// Raised when an identifier, a field description or a restored table is not usable.
/// Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// the string does not name one of left, right, top or bottom
    #[error("unknown edge identifier {0:?}")]
    UnknownEdge(String),
    /// the string does not name one of straight, twisted or point-compactified
    #[error("unknown edge effect {0:?}")]
    UnknownEffect(String),
    /// a field dimension is zero or negative
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        #[allow(missing_docs)]
        name: &'static str,
        #[allow(missing_docs)]
        value: i32,
    },
    /// a field dimension does not divide into whole cells
    #[error("{name} ({value}) is not a multiple of the cell size {cell_size}")]
    NotCellAligned {
        #[allow(missing_docs)]
        name: &'static str,
        #[allow(missing_docs)]
        value: i32,
        #[allow(missing_docs)]
        cell_size: i32,
    },
    /// the field must be at least two cells in each direction
    #[error("field must be at least 2x2 cells, got {columns}x{rows}")]
    FieldTooSmall {
        #[allow(missing_docs)]
        columns: i32,
        #[allow(missing_docs)]
        rows: i32,
    },
    /// one edge of an axis is point-compactified while its partner is not
    #[error("edge table is inconsistent: {0}")]
    InconsistentEdges(String),
    /// a restored snapshot does not fit the configured field
    #[error("snapshot does not fit the field: {0}")]
    SnapshotMismatch(String),
}

/// The injected random source could not produce a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SourceError {
    /// the source has no more values to give
    #[error("random source is exhausted")]
    Exhausted,
    /// asked for an integer from an empty range
    #[error("cannot sample from the empty range [{lo}, {hi})")]
    EmptyRange {
        #[allow(missing_docs)]
        lo: i32,
        #[allow(missing_docs)]
        hi: i32,
    },
}

/// The resolver was handed a coordinate or velocity further out than a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionError {
    /// a coordinate is more than one cell outside the field
    #[error("coordinate {value} is more than one cell outside [0, {bound})")]
    CoordinateOutOfReach {
        #[allow(missing_docs)]
        value: i32,
        #[allow(missing_docs)]
        bound: i32,
    },
    /// a velocity component moves further than one cell per tick
    #[error("velocity component {value} exceeds the cell size {cell_size}")]
    StepTooLarge {
        #[allow(missing_docs)]
        value: i32,
        #[allow(missing_docs)]
        cell_size: i32,
    },
}

/// Any failure that can abort a session tick
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[allow(missing_docs)]
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[allow(missing_docs)]
    #[error(transparent)]
    Source(#[from] SourceError),
    #[allow(missing_docs)]
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}
