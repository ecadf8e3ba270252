#![deny(
    warnings,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! A snake game engine for a playfield whose edges can be glued together.
//!
//! Each of the four edges is straight, twisted or point-compactified, and food changes
//! one edge when it is eaten, so over a session the field turns from a torus into a
//! Klein bottle, a projective plane or a sphere-like pole. Crossing an edge pair that
//! reverses orientation moves the snake onto the other sheet of the doubled surface.
//!
//! The engine is pure state: a [session::Session] is driven one tick at a time by an
//! external pacer with a [types::Request], and a renderer reads [snapshot::Snapshot]s.
//! ```
//! use manifold_snake::config::SessionConfig;
//! use manifold_snake::session::{Session, TickOutcome};
//! use manifold_snake::types::{Move, NoInstruments, Request};
//!
//! let mut session = Session::seeded(SessionConfig::default(), 17).unwrap();
//! let outcome = session.tick(Request::Move(Move::Left), &NoInstruments).unwrap();
//! assert_ne!(outcome, TickOutcome::Over);
//! assert_eq!(session.agent().x, 310);
//! ```

use snapshot::Snapshot;

pub mod agent;
pub mod config;
pub mod error;
pub mod food;
pub mod session;
pub mod snapshot;
pub mod topology;
pub mod trail;
pub mod types;

pub use error::EngineError;
pub use session::{Session, TickOutcome};

/// Loads a snapshot fixture from a given string
pub fn snapshot_fixture(snapshot_fixture: &str) -> Snapshot {
    let s: Result<Snapshot, _> = serde_json::from_str(snapshot_fixture);
    s.expect("the json literal is valid")
}
