//! The snake's body: a bounded history of the cells its head has occupied
use std::collections::VecDeque;

use fxhash::FxHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::agent::AgentState;

/// One occupied cell. Two segments on different sheets never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
    #[allow(missing_docs)]
    pub sheet: bool,
}

impl From<&AgentState> for Segment {
    fn from(agent: &AgentState) -> Self {
        Segment {
            x: agent.x,
            y: agent.y,
            sheet: agent.sheet,
        }
    }
}

/// Ordered oldest to newest. The last entry is the head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyTrail {
    segments: VecDeque<Segment>,
    occupancy: FxHashMap<Segment, u32>,
    target_length: usize,
}

impl Default for BodyTrail {
    fn default() -> Self {
        BodyTrail::new(1)
    }
}

impl BodyTrail {
    /// an empty trail that will hold up to `target_length` segments
    pub fn new(target_length: usize) -> Self {
        BodyTrail {
            segments: VecDeque::new(),
            occupancy: FxHashMap::default(),
            target_length: target_length.max(1),
        }
    }

    /// rebuild a trail from stored segments, oldest first. Extra segments beyond the
    /// target are dropped from the old end.
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>, target_length: usize) -> Self {
        let mut trail = BodyTrail::new(target_length);
        for s in segments {
            trail.insert(s);
        }
        trail.evict();
        trail
    }

    fn insert(&mut self, segment: Segment) {
        self.segments.push_back(segment);
        *self.occupancy.entry(segment).or_insert(0) += 1;
    }

    fn evict(&mut self) {
        while self.segments.len() > self.target_length {
            if let Some(old) = self.segments.pop_front() {
                if let Some(count) = self.occupancy.get_mut(&old) {
                    *count -= 1;
                    if *count == 0 {
                        self.occupancy.remove(&old);
                    }
                }
            }
        }
    }

    /// Push a new head, evict the oldest segments past the target length and report
    /// whether the new head landed on its own body
    pub fn push_head(&mut self, head: Segment) -> bool {
        self.insert(head);
        self.evict();
        self.occupancy.get(&head).copied().unwrap_or(0) > 1
    }

    /// raise the target length; the body fills in over the next ticks
    pub fn grow(&mut self, by: usize) {
        self.target_length += by;
    }

    #[allow(missing_docs)]
    pub fn target_length(&self) -> usize {
        self.target_length
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// the newest segment
    pub fn head(&self) -> Option<&Segment> {
        self.segments.back()
    }

    /// oldest first
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &Segment> + '_ {
        self.segments.iter()
    }

    /// is this cell taken by any segment, head included
    pub fn occupies(&self, segment: &Segment) -> bool {
        self.occupancy.contains_key(segment)
    }

    /// Checks that no cell is repeated behind the head and that the occupancy index
    /// agrees with the segment list
    pub fn assert_consistency(&self) -> bool {
        let behind_head = self.segments.len().saturating_sub(1);
        if self.segments.iter().take(behind_head).duplicates().next().is_some() {
            return false;
        }
        let counts = self.segments.iter().copied().counts();
        counts.len() == self.occupancy.len()
            && counts
                .iter()
                .all(|(s, c)| self.occupancy.get(s).map(|o| *o as usize) == Some(*c))
    }
}

/// true iff `head` equals some entry of `trail` other than its newest one
pub fn check_collision(trail: &BodyTrail, head: &Segment) -> bool {
    trail.segments().rev().skip(1).any(|s| s == head)
}
