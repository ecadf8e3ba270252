//! Boundary crossing
//!
//! The resolver looks at one axis at a time, x (left/right) first and then y
//! (top/bottom) on the already corrected state. An axis is being crossed when the agent
//! is already past one of its edges or its pending step would carry it past one. Far
//! edges are tested before near ones.
//!
//! For a crossing on an axis with bound `B`, cell size `s` and perpendicular bound `P`:
//!
//! * point-compactified edge: the agent comes back out of the same edge (`0` or
//!   `B - s`) heading the other way, at the antipodal perpendicular coordinate
//!   `(P - p) mod P`. The sheet is kept.
//! * straight or twisted edge: the agent lands on the opposite edge (`B - s` or `0`)
//!   with its velocity unchanged. If the axis' two edges differ the perpendicular
//!   coordinate is mirrored the same way and the sheet flips.
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{Axis, EdgeName, EdgeTopology};
use crate::agent::AgentState;
use crate::config::FieldConfig;
use crate::error::PreconditionError;

/// What a crossing did to the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingKind {
    /// bounced off a collapsed edge at the antipodal point
    Pole,
    /// plain wrap, perpendicular coordinate and sheet unchanged
    Preserving,
    /// half twist wrap, perpendicular coordinate mirrored and sheet flipped
    Reversing,
}

/// A single edge crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crossing {
    /// the edge the agent went through
    pub edge: EdgeName,
    #[allow(missing_docs)]
    pub kind: CrossingKind,
}

/// The result of running the resolver over both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// the corrected agent
    pub agent: AgentState,
    /// crossing on the x axis, if any
    pub horizontal: Option<Crossing>,
    /// crossing on the y axis, if any
    pub vertical: Option<Crossing>,
}

impl Resolution {
    /// the crossing that fired on `axis`, if any
    pub fn crossing(&self, axis: Axis) -> Option<Crossing> {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// crossings in the order they were resolved
    pub fn crossings(&self) -> impl Iterator<Item = Crossing> {
        self.horizontal.into_iter().chain(self.vertical)
    }
}

/// view of one axis of an agent, so both axes share the same arithmetic
#[derive(Debug, Clone, Copy)]
struct AxisView {
    along: i32,
    velocity: i32,
    perpendicular: i32,
    bound: i32,
    perpendicular_bound: i32,
}

impl AxisView {
    fn of(agent: &AgentState, axis: Axis, field: &FieldConfig) -> Self {
        match axis {
            Axis::Horizontal => AxisView {
                along: agent.x,
                velocity: agent.dx,
                perpendicular: agent.y,
                bound: field.width,
                perpendicular_bound: field.height,
            },
            Axis::Vertical => AxisView {
                along: agent.y,
                velocity: agent.dy,
                perpendicular: agent.x,
                bound: field.height,
                perpendicular_bound: field.width,
            },
        }
    }

    fn write(self, agent: AgentState, axis: Axis, sheet: bool) -> AgentState {
        match axis {
            Axis::Horizontal => AgentState {
                x: self.along,
                dx: self.velocity,
                y: self.perpendicular,
                sheet,
                ..agent
            },
            Axis::Vertical => AgentState {
                y: self.along,
                dy: self.velocity,
                x: self.perpendicular,
                sheet,
                ..agent
            },
        }
    }
}

/// reflection of the perpendicular coordinate through the centre of the field,
/// taken modulo the bound so coordinate 0 stays on the field
fn mirror(p: i32, bound: i32) -> i32 {
    (bound - p).rem_euclid(bound)
}

fn check_reach(value: i32, bound: i32, cell_size: i32) -> Result<(), PreconditionError> {
    if value < -cell_size || value >= bound + cell_size {
        Err(PreconditionError::CoordinateOutOfReach { value, bound })
    } else {
        Ok(())
    }
}

fn check_preconditions(agent: &AgentState, field: &FieldConfig) -> Result<(), PreconditionError> {
    let s = field.cell_size;
    for v in [agent.dx, agent.dy] {
        if v.abs() > s {
            return Err(PreconditionError::StepTooLarge {
                value: v,
                cell_size: s,
            });
        }
    }
    check_reach(agent.x, field.width, s)?;
    check_reach(agent.y, field.height, s)
}

fn cross_axis(
    agent: AgentState,
    axis: Axis,
    edges: &EdgeTopology,
    field: &FieldConfig,
    translate: bool,
) -> (AgentState, Option<Crossing>) {
    let s = field.cell_size;
    let mut view = AxisView::of(&agent, axis, field);
    let (near_edge, far_edge) = axis.edges();
    let (near_state, far_state) = edges.axis(axis);
    let last_cell = view.bound - s;
    let pending = view.along + view.velocity;

    let (edge, landing_same, landing_opposite) =
        if view.along > last_cell || pending > last_cell {
            (far_edge, last_cell, 0)
        } else if view.along < 0 || pending < 0 {
            (near_edge, 0, last_cell)
        } else if translate {
            view.along = pending;
            return (view.write(agent, axis, agent.sheet), None);
        } else {
            return (agent, None);
        };

    let mut sheet = agent.sheet;
    let kind = if edges.get(edge).is_compactified() {
        view.velocity = -view.velocity;
        view.along = if translate {
            // the bounce takes the reversed step, so the head leaves the pole cell
            (landing_same + view.velocity).clamp(0, last_cell)
        } else {
            landing_same
        };
        view.perpendicular = mirror(view.perpendicular, view.perpendicular_bound);
        CrossingKind::Pole
    } else if near_state != far_state {
        view.along = landing_opposite;
        view.perpendicular = mirror(view.perpendicular, view.perpendicular_bound);
        sheet = !sheet;
        CrossingKind::Reversing
    } else {
        view.along = landing_opposite;
        CrossingKind::Preserving
    };

    debug!(%edge, state = %edges.get(edge), ?kind, "crossed edge");
    (view.write(agent, axis, sheet), Some(Crossing { edge, kind }))
}

fn run(
    agent: AgentState,
    edges: &EdgeTopology,
    field: &FieldConfig,
    translate: bool,
) -> Result<Resolution, PreconditionError> {
    check_preconditions(&agent, field)?;
    let (agent, horizontal) = cross_axis(agent, Axis::Horizontal, edges, field, translate);
    let (agent, vertical) = cross_axis(agent, Axis::Vertical, edges, field, translate);
    Ok(Resolution {
        agent,
        horizontal,
        vertical,
    })
}

/// Resolve both axes, x then y, and report which crossings fired
#[instrument(level = "trace", skip_all)]
pub fn resolve(
    agent: AgentState,
    edges: &EdgeTopology,
    field: &FieldConfig,
) -> Result<Resolution, PreconditionError> {
    run(agent, edges, field, false)
}

/// Correct an agent that is crossing (or about to cross) the edge of the field
pub fn resolve_crossing(
    agent: AgentState,
    edges: &EdgeTopology,
    field: &FieldConfig,
) -> Result<AgentState, PreconditionError> {
    resolve(agent, edges, field).map(|r| r.agent)
}

/// One full tick of movement. Each axis, x then y, either crosses or simply moves by
/// its velocity. Landing on the far side of a straight or twisted edge uses up that
/// axis' step; bouncing off a pole takes the reversed step away from it.
#[instrument(level = "trace", skip_all)]
pub fn advance(
    agent: AgentState,
    edges: &EdgeTopology,
    field: &FieldConfig,
) -> Result<Resolution, PreconditionError> {
    run(agent, edges, field, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::EdgeState::{self, *};
    use crate::topology::EdgeName::*;
    use proptest::prelude::*;

    fn field() -> FieldConfig {
        FieldConfig::default()
    }

    fn agent(x: i32, y: i32, dx: i32, dy: i32, sheet: bool) -> AgentState {
        AgentState { x, y, dx, dy, sheet }
    }

    #[test]
    fn test_torus_wrap_left() {
        let out = resolve_crossing(agent(0, 200, -10, 0, true), &EdgeTopology::default(), &field())
            .unwrap();
        assert_eq!(out, agent(630, 200, -10, 0, true));
    }

    #[test]
    fn test_pole_on_the_right() {
        let edges = EdgeTopology::default().with(Right, PointCompactified);
        let res = resolve(agent(635, 100, 10, 0, false), &edges, &field()).unwrap();
        assert_eq!(res.agent, agent(630, 380, -10, 0, false));
        assert_eq!(
            res.horizontal,
            Some(Crossing {
                edge: Right,
                kind: CrossingKind::Pole
            })
        );
        assert_eq!(res.vertical, None);
    }

    #[test]
    fn test_twisted_top() {
        let edges = EdgeTopology::default().with(Top, Twisted);
        let out = resolve_crossing(agent(300, -5, 0, -10, true), &edges, &field()).unwrap();
        assert_eq!(out, agent(340, 470, 0, -10, false));
    }

    #[test]
    fn test_interior_agent_is_untouched() {
        let edges = EdgeTopology::uniform(Twisted).with(Left, Straight);
        let a = agent(320, 240, 10, 0, true);
        let res = resolve(a, &edges, &field()).unwrap();
        assert_eq!(res.agent, a);
        assert_eq!(res.crossings().count(), 0);
    }

    #[test]
    fn test_pending_step_onto_the_last_cell_is_not_a_crossing() {
        let edges = EdgeTopology::default();
        let a = agent(620, 0, 10, 0, true);
        assert_eq!(resolve_crossing(a, &edges, &field()).unwrap(), a);
        let a = agent(10, 240, -10, 0, true);
        assert_eq!(resolve_crossing(a, &edges, &field()).unwrap(), a);
    }

    #[test]
    fn test_far_wrap_lands_on_zero() {
        let out = resolve_crossing(agent(630, 100, 10, 0, true), &EdgeTopology::default(), &field())
            .unwrap();
        assert_eq!(out, agent(0, 100, 10, 0, true));
        let out = resolve_crossing(agent(40, 470, 0, 10, true), &EdgeTopology::default(), &field())
            .unwrap();
        assert_eq!(out, agent(40, 0, 0, 10, true));
    }

    #[test]
    fn test_mirror_keeps_zero_on_the_field() {
        let edges = EdgeTopology::default().with(Right, Twisted);
        let out = resolve_crossing(agent(630, 0, 10, 0, true), &edges, &field()).unwrap();
        assert_eq!(out, agent(0, 0, 10, 0, false));
    }

    #[test]
    fn test_corner_resolves_x_then_y() {
        // x crossing mirrors y first, the y stage then sees the mirrored value
        let edges = EdgeTopology::default()
            .with(Left, Twisted)
            .with(Top, PointCompactified)
            .with(Bottom, PointCompactified);
        let a = agent(-10, -10, -10, -10, true);
        let res = resolve(a, &edges, &field()).unwrap();
        // x: near crossing, reversing -> x=630, y = (480 + 10) mod 480 = 10, sheet flips.
        // y: 10 + -10 = 0 is on the field, so no second crossing
        assert_eq!(res.agent, agent(630, 10, -10, -10, false));
        assert_eq!(res.vertical, None);

        let a = agent(0, 0, -10, -10, true);
        let res = resolve(a, &edges, &field()).unwrap();
        // x: reversing -> x=630, y = 0 mirrored = 0, sheet false
        // y: pole on top -> y=0, dy=10, x = 640 - 630 = 10
        assert_eq!(res.agent, agent(10, 0, -10, 10, false));
        assert_eq!(
            res.crossings().map(|c| c.edge).collect::<Vec<_>>(),
            vec![Left, Top]
        );
        assert_eq!(resolve(a, &edges, &field()).unwrap(), res);
    }

    #[test]
    fn test_rejects_agents_out_of_reach() {
        let edges = EdgeTopology::default();
        assert_eq!(
            resolve_crossing(agent(-20, 0, -10, 0, true), &edges, &field()),
            Err(PreconditionError::CoordinateOutOfReach {
                value: -20,
                bound: 640
            })
        );
        assert_eq!(
            resolve_crossing(agent(0, 490, 0, 10, true), &edges, &field()),
            Err(PreconditionError::CoordinateOutOfReach {
                value: 490,
                bound: 480
            })
        );
        assert_eq!(
            resolve_crossing(agent(0, 0, 20, 0, true), &edges, &field()),
            Err(PreconditionError::StepTooLarge {
                value: 20,
                cell_size: 10
            })
        );
    }

    #[test]
    fn test_advance_visits_every_column() {
        let edges = EdgeTopology::default();
        let mut a = agent(0, 100, 10, 0, true);
        let mut seen = vec![];
        for _ in 0..64 {
            seen.push(a.x);
            a = advance(a, &edges, &field()).unwrap().agent;
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..64).map(|c| c * 10).collect::<Vec<_>>());
        assert_eq!(a.x, 0);
    }

    #[test]
    fn test_advance_through_a_pole_comes_back() {
        let edges = EdgeTopology::uniform(PointCompactified);
        let a = agent(630, 100, 10, 0, true);
        let bounced = advance(a, &edges, &field()).unwrap().agent;
        assert_eq!(bounced, agent(620, 380, -10, 0, true));
        let next = advance(bounced, &edges, &field()).unwrap().agent;
        assert_eq!(next, agent(610, 380, -10, 0, true));

        // the near pole bounces back in as well
        let a = agent(0, 100, -10, 0, true);
        assert_eq!(
            advance(a, &edges, &field()).unwrap().agent,
            agent(10, 380, 10, 0, true)
        );
    }

    #[test]
    fn test_advance_through_a_pole_at_the_mirror_fixed_points_leaves_the_cell() {
        let edges = EdgeTopology::default()
            .with(Left, PointCompactified)
            .with(Right, PointCompactified);
        for y in [0, 240] {
            let a = agent(630, y, 10, 0, true);
            let res = advance(a, &edges, &field()).unwrap();
            assert_eq!(res.agent, agent(620, y, -10, 0, true));
            assert_eq!(res.horizontal.map(|c| c.kind), Some(CrossingKind::Pole));
        }
        let edges = EdgeTopology::default()
            .with(Top, PointCompactified)
            .with(Bottom, PointCompactified);
        for x in [0, 320] {
            let a = agent(x, 0, 0, -10, true);
            assert_eq!(
                advance(a, &edges, &field()).unwrap().agent,
                agent(x, 10, 0, 10, true)
            );
        }
    }

    #[test]
    fn test_klein_bottle_round_trip_restores_the_sheet() {
        // twisted/straight on y: going all the way around twice is the identity
        let edges = EdgeTopology::default().with(Bottom, Twisted);
        let start = agent(100, 0, 0, 10, true);
        let mut a = start;
        for _ in 0..48 {
            a = advance(a, &edges, &field()).unwrap().agent;
        }
        assert_eq!(a, agent(540, 0, 0, 10, false));
        for _ in 0..48 {
            a = advance(a, &edges, &field()).unwrap().agent;
        }
        assert_eq!(a, start);
    }

    fn arb_open_state() -> impl Strategy<Value = EdgeState> {
        prop_oneof![Just(Straight), Just(Twisted)]
    }

    fn step() -> impl Strategy<Value = i32> {
        prop_oneof![Just(-10), Just(10)]
    }

    proptest! {
        #[test]
        fn equal_states_preserve_orientation(
            state in prop_oneof![Just(Straight), Just(Twisted)],
            horizontal in any::<bool>(),
            perpendicular in 0i32..48,
            dir in step(),
            sheet in any::<bool>(),
        ) {
            let f = field();
            let edges = EdgeTopology::uniform(state);
            let (a, p) = if horizontal {
                let x = if dir < 0 { 0 } else { 630 };
                (agent(x, perpendicular * 10, dir, 0, sheet), perpendicular * 10)
            } else {
                let y = if dir < 0 { 0 } else { 470 };
                (agent(perpendicular * 10 % 640, y, 0, dir, sheet), perpendicular * 10 % 640)
            };
            let res = resolve(a, &edges, &f).unwrap();
            prop_assert_eq!(res.crossings().count(), 1);
            prop_assert_eq!(res.agent.sheet, sheet);
            let out_p = if horizontal { res.agent.y } else { res.agent.x };
            prop_assert_eq!(out_p, p);
            prop_assert_eq!(res.agent.velocity(), a.velocity());
        }

        #[test]
        fn unequal_states_mirror_once_and_flip(
            near in arb_open_state(),
            perpendicular in 0i32..48,
            dir in step(),
            sheet in any::<bool>(),
        ) {
            let f = field();
            let far = if near == Straight { Twisted } else { Straight };
            let edges = EdgeTopology::default().with(Left, near).with(Right, far);
            let x = if dir < 0 { 0 } else { 630 };
            let a = agent(x, perpendicular * 10, dir, 0, sheet);
            let res = resolve(a, &edges, &f).unwrap();
            prop_assert_eq!(
                res.horizontal.map(|c| c.kind),
                Some(CrossingKind::Reversing)
            );
            prop_assert_eq!(res.agent.sheet, !sheet);
            prop_assert_eq!(res.agent.y, mirror(perpendicular * 10, 480));
            prop_assert!(res.agent.y >= 0 && res.agent.y < 480);
            prop_assert_eq!(res.vertical, None);
        }

        #[test]
        fn pole_crossing_is_involutive(
            far in any::<bool>(),
            perpendicular in 0i32..48,
            sheet in any::<bool>(),
        ) {
            let f = field();
            let edges = EdgeTopology::default()
                .with(Top, PointCompactified)
                .with(Bottom, PointCompactified);
            let (y, dy) = if far { (470, 10) } else { (0, -10) };
            let a = agent(perpendicular * 10 % 640, y, 0, dy, sheet);
            let once = resolve_crossing(a, &edges, &f).unwrap();
            prop_assert_eq!(once.dy, -dy);
            prop_assert_eq!(once.sheet, sheet);
            // come back into the same pole: reverse the outgoing ray
            let again = resolve_crossing(AgentState { dy: -once.dy, ..once }, &edges, &f).unwrap();
            prop_assert_eq!(again.dy, -dy);
            prop_assert_eq!(again.x, a.x);
            prop_assert_eq!(again.y, a.y);
        }

        #[test]
        fn resolution_is_deterministic_and_lands_on_the_field(
            left in prop_oneof![Just(Straight), Just(Twisted), Just(PointCompactified)],
            right in prop_oneof![Just(Straight), Just(Twisted)],
            top in prop_oneof![Just(Straight), Just(Twisted), Just(PointCompactified)],
            bottom in prop_oneof![Just(Straight), Just(Twisted)],
            cx in 0i32..64,
            cy in 0i32..48,
            dx in prop_oneof![Just(-10), Just(0), Just(10)],
            dy in prop_oneof![Just(-10), Just(0), Just(10)],
            sheet in any::<bool>(),
        ) {
            let f = field();
            let edges = EdgeTopology { left, right, top, bottom };
            let a = agent(cx * 10, cy * 10, dx, dy, sheet);
            let first = advance(a, &edges, &f).unwrap();
            let second = advance(a, &edges, &f).unwrap();
            prop_assert_eq!(first, second);
            prop_assert!(f.contains(first.agent.x, first.agent.y));
        }
    }
}
