//! A single game session: owns every piece of mutable state and advances it one
//! tick at a time
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::agent::AgentState;
use crate::config::SessionConfig;
use crate::error::{ConfigurationError, EngineError};
use crate::food::{opening_food, select_next_food, FoodItem, UniformSource};
use crate::snapshot::{SessionStatus, Snapshot};
use crate::topology::{advance, apply_food_effect, Crossing, EdgeName, EdgeState, EdgeTopology};
use crate::trail::{BodyTrail, Segment};
use crate::types::{Request, TickInstruments};

/// What happened during a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickOutcome {
    /// the agent moved, crossing these edges on the way
    Moved(Vec<Crossing>),
    /// the agent ate the food and the edge table changed
    Ate {
        #[allow(missing_docs)]
        edge: EdgeName,
        #[allow(missing_docs)]
        effect: EdgeState,
    },
    /// the agent ran into its own body, the session is now over
    Collided,
    /// the session was already over, nothing changed
    Over,
}

/// One run of the game, from spawn to self-collision.
///
/// Every tick reads the committed state, builds the whole next state on the side and
/// only then commits it, so a tick that fails leaves the session as it was.
#[derive(Debug, Clone)]
pub struct Session<R = SmallRng> {
    config: SessionConfig,
    rng: R,
    tick: u64,
    status: SessionStatus,
    speed: u32,
    agent: AgentState,
    trail: BodyTrail,
    food: FoodItem,
    edges: EdgeTopology,
}

impl Session<SmallRng> {
    /// a session driven by a seeded small rng
    pub fn seeded(config: SessionConfig, seed: u64) -> Result<Self, EngineError> {
        Session::new(config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: UniformSource> Session<R> {
    /// start a fresh session
    pub fn new(config: SessionConfig, mut rng: R) -> Result<Self, EngineError> {
        config.validate()?;
        let agent = AgentState::spawn(&config.field);
        let food = opening_food(
            &config.field,
            agent.sheet,
            config.opening_edge,
            config.opening_effect,
            &mut rng,
        )?;
        Ok(Session {
            config,
            rng,
            tick: 0,
            status: SessionStatus::Running,
            speed: config.initial_speed,
            agent,
            trail: BodyTrail::new(1),
            food,
            edges: EdgeTopology::default(),
        })
    }

    /// rebuild a session from a snapshot taken with the same field
    pub fn restore(config: SessionConfig, snapshot: Snapshot, rng: R) -> Result<Self, EngineError> {
        config.validate()?;
        let field = config.field;
        if snapshot.field != field {
            return Err(ConfigurationError::SnapshotMismatch(format!(
                "snapshot field {:?} differs from configured {:?}",
                snapshot.field, field
            ))
            .into());
        }
        if !snapshot.edges.assert_consistency() {
            return Err(ConfigurationError::InconsistentEdges(snapshot.edges.to_string()).into());
        }
        if !field.contains(snapshot.agent.x, snapshot.agent.y) {
            return Err(ConfigurationError::SnapshotMismatch(format!(
                "agent at ({}, {}) is not on a cell",
                snapshot.agent.x, snapshot.agent.y
            ))
            .into());
        }
        if !field.contains(snapshot.food.x, snapshot.food.y) {
            return Err(ConfigurationError::SnapshotMismatch(format!(
                "food at ({}, {}) is not on a cell",
                snapshot.food.x, snapshot.food.y
            ))
            .into());
        }
        if let Some(s) = snapshot.trail.iter().find(|s| !field.contains(s.x, s.y)) {
            return Err(ConfigurationError::SnapshotMismatch(format!(
                "trail segment at ({}, {}) is not on a cell",
                s.x, s.y
            ))
            .into());
        }
        let trail = BodyTrail::from_segments(snapshot.trail, snapshot.target_length);
        if snapshot.status == SessionStatus::Running && !trail.assert_consistency() {
            return Err(ConfigurationError::SnapshotMismatch(
                "running session with a self-intersecting trail".to_string(),
            )
            .into());
        }
        Ok(Session {
            config,
            rng,
            tick: snapshot.tick,
            status: snapshot.status,
            speed: snapshot.speed,
            agent: snapshot.agent,
            trail,
            food: snapshot.food,
            edges: snapshot.edges,
        })
    }

    /// throw away all state and start again from spawn. If the opening food cannot be
    /// placed the session is left untouched.
    pub fn restart(&mut self) -> Result<(), EngineError> {
        let agent = AgentState::spawn(&self.config.field);
        let food = opening_food(
            &self.config.field,
            agent.sheet,
            self.config.opening_edge,
            self.config.opening_effect,
            &mut self.rng,
        )?;
        self.tick = 0;
        self.status = SessionStatus::Running;
        self.speed = self.config.initial_speed;
        self.agent = agent;
        self.trail = BodyTrail::new(1);
        self.food = food;
        self.edges = EdgeTopology::default();
        debug!("session restarted");
        Ok(())
    }

    /// Run one tick: apply the request, move (crossing edges as needed), record the
    /// new head, and eat the food if the head is on it.
    #[instrument(level = "trace", skip_all, fields(tick = self.tick))]
    pub fn tick<I: TickInstruments>(
        &mut self,
        request: Request,
        instruments: &I,
    ) -> Result<TickOutcome, EngineError> {
        if self.status == SessionStatus::Over {
            return Ok(TickOutcome::Over);
        }
        let start = Instant::now();
        let field = self.config.field;

        let mut agent = self.agent;
        let mut speed = self.speed;
        let mut trail = self.trail.clone();
        match request {
            Request::None => {}
            Request::Move(mv) => agent = agent.steer(mv, field.cell_size),
            Request::Grow(n) => trail.grow(n as usize),
            Request::SpeedUp => speed = speed.saturating_add(self.config.speed_step),
        }

        let resolution = advance(agent, &self.edges, &field)?;
        let agent = resolution.agent;
        let collided = trail.push_head(Segment::from(&agent));

        let mut edges = self.edges;
        let mut food = self.food;
        let outcome = if collided {
            TickOutcome::Collided
        } else if self.food.is_eaten_by(&agent) {
            edges = apply_food_effect(&self.edges, self.food.next_edge, self.food.next_effect);
            food = select_next_food(&edges, &field, agent.sheet, &mut self.rng)?;
            trail.grow(1);
            TickOutcome::Ate {
                edge: self.food.next_edge,
                effect: self.food.next_effect,
            }
        } else {
            TickOutcome::Moved(resolution.crossings().collect())
        };

        self.tick += 1;
        self.agent = agent;
        self.speed = speed;
        self.trail = trail;
        self.edges = edges;
        self.food = food;
        if collided {
            self.status = SessionStatus::Over;
            debug!(x = agent.x, y = agent.y, sheet = agent.sheet, "self collision");
        }
        instruments.observe_tick(start.elapsed());
        trace!(?outcome, "tick committed");
        Ok(outcome)
    }

    /// the read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            field: self.config.field,
            tick: self.tick,
            status: self.status,
            speed: self.speed,
            agent: self.agent,
            trail: self.trail.segments().copied().collect(),
            target_length: self.trail.target_length(),
            food: self.food,
            edges: self.edges,
        }
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[allow(missing_docs)]
    pub fn agent(&self) -> AgentState {
        self.agent
    }

    #[allow(missing_docs)]
    pub fn edges(&self) -> EdgeTopology {
        self.edges
    }

    #[allow(missing_docs)]
    pub fn food(&self) -> FoodItem {
        self.food
    }

    #[allow(missing_docs)]
    pub fn trail(&self) -> &BodyTrail {
        &self.trail
    }

    #[allow(missing_docs)]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// ticks per second the pacer should use
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// ticks committed since the session (re)started
    pub fn tick_count(&self) -> u64 {
        self.tick
    }
}
