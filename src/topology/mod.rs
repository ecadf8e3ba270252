//! The four playfield edges and how eating food re-glues them
//!
//! Each edge holds an [EdgeState]. The pair on one axis decides what crossing that
//! axis does: equal states wrap like a torus, a `straight`/`twisted` mix wraps with a
//! half twist (klein bottle / projective plane), and a `point-compactified` pair sends
//! the agent back out through the antipodal point of the same edge.
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigurationError;

pub mod crossing;

pub use crossing::{advance, resolve, resolve_crossing, Crossing, CrossingKind, Resolution};

/// One of the four edges of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeName {
    #[allow(missing_docs)]
    Left,
    #[allow(missing_docs)]
    Right,
    #[allow(missing_docs)]
    Top,
    #[allow(missing_docs)]
    Bottom,
}

impl EdgeName {
    /// all edges in table order
    pub fn all() -> [EdgeName; 4] {
        [EdgeName::Left, EdgeName::Right, EdgeName::Top, EdgeName::Bottom]
    }

    /// the axis this edge bounds
    pub fn axis(self) -> Axis {
        match self {
            EdgeName::Left | EdgeName::Right => Axis::Horizontal,
            EdgeName::Top | EdgeName::Bottom => Axis::Vertical,
        }
    }

    /// the other edge of the same axis
    pub fn opposite(self) -> EdgeName {
        match self {
            EdgeName::Left => EdgeName::Right,
            EdgeName::Right => EdgeName::Left,
            EdgeName::Top => EdgeName::Bottom,
            EdgeName::Bottom => EdgeName::Top,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            EdgeName::Left => "left",
            EdgeName::Right => "right",
            EdgeName::Top => "top",
            EdgeName::Bottom => "bottom",
        }
    }
}

impl fmt::Display for EdgeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeName {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EdgeName::all()
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownEdge(s.to_string()))
    }
}

/// How an edge is identified with the rest of the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeState {
    /// plain wrap to the opposite edge
    Straight,
    /// wrap to the opposite edge; reverses orientation when the partner is straight
    Twisted,
    /// the whole edge is collapsed to a pole
    PointCompactified,
}

impl EdgeState {
    /// all effects a food can carry
    pub fn all() -> [EdgeState; 3] {
        [
            EdgeState::Straight,
            EdgeState::Twisted,
            EdgeState::PointCompactified,
        ]
    }

    #[allow(missing_docs)]
    pub fn is_compactified(self) -> bool {
        self == EdgeState::PointCompactified
    }

    fn as_str(self) -> &'static str {
        match self {
            EdgeState::Straight => "straight",
            EdgeState::Twisted => "twisted",
            EdgeState::PointCompactified => "point-compactified",
        }
    }
}

impl fmt::Display for EdgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeState {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EdgeState::all()
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownEffect(s.to_string()))
    }
}

/// every (edge, effect) pair a food can carry, in a stable order
pub fn all_effects() -> Vec<(EdgeName, EdgeState)> {
    EdgeName::all()
        .into_iter()
        .cartesian_product(EdgeState::all())
        .collect()
}

/// A direction of travel, bounded by a near and a far edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// x, bounded by left (near) and right (far)
    Horizontal,
    /// y, bounded by top (near) and bottom (far)
    Vertical,
}

impl Axis {
    /// (near, far) edges of this axis
    pub fn edges(self) -> (EdgeName, EdgeName) {
        match self {
            Axis::Horizontal => (EdgeName::Left, EdgeName::Right),
            Axis::Vertical => (EdgeName::Top, EdgeName::Bottom),
        }
    }

    #[allow(missing_docs)]
    pub fn all() -> [Axis; 2] {
        [Axis::Horizontal, Axis::Vertical]
    }
}

/// The state of all four edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeTopology {
    #[allow(missing_docs)]
    pub left: EdgeState,
    #[allow(missing_docs)]
    pub right: EdgeState,
    #[allow(missing_docs)]
    pub top: EdgeState,
    #[allow(missing_docs)]
    pub bottom: EdgeState,
}

impl Default for EdgeTopology {
    fn default() -> Self {
        EdgeTopology::uniform(EdgeState::Straight)
    }
}

impl EdgeTopology {
    /// every edge in the same state
    pub fn uniform(state: EdgeState) -> Self {
        EdgeTopology {
            left: state,
            right: state,
            top: state,
            bottom: state,
        }
    }

    /// state of a single edge
    pub fn get(&self, edge: EdgeName) -> EdgeState {
        match edge {
            EdgeName::Left => self.left,
            EdgeName::Right => self.right,
            EdgeName::Top => self.top,
            EdgeName::Bottom => self.bottom,
        }
    }

    fn set(&mut self, edge: EdgeName, state: EdgeState) {
        match edge {
            EdgeName::Left => self.left = state,
            EdgeName::Right => self.right = state,
            EdgeName::Top => self.top = state,
            EdgeName::Bottom => self.bottom = state,
        }
    }

    /// builder style setter, mostly for tests and fixtures. Bypasses the pairing rules.
    pub fn with(mut self, edge: EdgeName, state: EdgeState) -> Self {
        self.set(edge, state);
        self
    }

    /// (near, far) states of an axis
    pub fn axis(&self, axis: Axis) -> (EdgeState, EdgeState) {
        let (near, far) = axis.edges();
        (self.get(near), self.get(far))
    }

    /// Apply a food's effect to `edge`.
    ///
    /// Compactification always takes the whole axis at once. Any other effect only sets
    /// `edge`, dragging the opposite edge along only if that one was compactified, so a
    /// pole pair is never split.
    pub fn apply_effect(&mut self, edge: EdgeName, effect: EdgeState) {
        if effect.is_compactified() {
            self.set(edge, effect);
            self.set(edge.opposite(), effect);
        } else {
            self.set(edge, effect);
            if self.get(edge.opposite()).is_compactified() {
                self.set(edge.opposite(), effect);
            }
        }
        debug!(%edge, %effect, edges = %self, "applied edge effect");
    }

    /// true when the two edges of `axis` are one straight and one twisted, i.e. crossing
    /// that axis reverses orientation
    pub fn is_orientation_reversing(&self, axis: Axis) -> bool {
        matches!(
            self.axis(axis),
            (EdgeState::Straight, EdgeState::Twisted) | (EdgeState::Twisted, EdgeState::Straight)
        )
    }

    /// true when any axis reverses orientation, so the back sheet is reachable
    pub fn has_orientation_reversing_axis(&self) -> bool {
        Axis::all()
            .into_iter()
            .any(|a| self.is_orientation_reversing(a))
    }

    /// an axis is never half compactified
    pub fn assert_consistency(&self) -> bool {
        Axis::all().into_iter().all(|a| {
            let (near, far) = self.axis(a);
            near.is_compactified() == far.is_compactified()
        })
    }
}

impl fmt::Display for EdgeTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "left={} right={} top={} bottom={}",
            self.left, self.right, self.top, self.bottom
        )
    }
}

/// Pure form of [EdgeTopology::apply_effect]
pub fn apply_food_effect(edges: &EdgeTopology, edge: EdgeName, effect: EdgeState) -> EdgeTopology {
    let mut next = *edges;
    next.apply_effect(edge, effect);
    next
}

/// Parse both identifiers, then apply. On an unknown identifier nothing is applied.
pub fn apply_named_effect(
    edges: &EdgeTopology,
    edge: &str,
    effect: &str,
) -> Result<EdgeTopology, ConfigurationError> {
    let edge: EdgeName = edge.parse()?;
    let effect: EdgeState = effect.parse()?;
    Ok(apply_food_effect(edges, edge, effect))
}
