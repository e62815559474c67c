//! Deterministic course and agent physics for gap-flying agents.
//!
//! The crate is split the same way as the simulation itself:
//!
//! - [`core`] - Plain data: the play field, gap columns, hitboxes, modes and controls
//! - [`engine`] - Behavior: the seeded obstacle stream, per-mode dynamics,
//!   the policy network and the agents that combine them
//!
//! Nothing in this crate performs I/O. Every step is a pure function of the
//! current state, the visible obstacles and a control input, so two runs
//! with the same seed and the same genomes produce identical trajectories.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
