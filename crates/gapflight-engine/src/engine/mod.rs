//! Simulation behavior built on the [`core`](crate::core) data structures.
//!
//! - [`ObstacleStream`] - Seeded, re-seedable generator of gap columns
//! - [`Course`] - Camera plus obstacle stream, advanced once per tick
//! - [`Dynamics`] - Per-mode kinematics behind one interface
//! - [`Genome`] / [`Sensors`] - The policy network and what it observes
//! - [`Agent`] - Genome + body + life bookkeeping
//! - [`PlaySession`] - A restartable human-controlled run
//! - [`Scene`] - Read-only snapshot for renderers
//!
//! # Tick Order
//!
//! 1. The course advances its camera and spawns/evicts columns
//! 2. Each living agent decides a control from its sensors (or input)
//! 3. Its body integrates the control and checks for collisions
//! 4. The caller kills collided agents, freezing their fitness

pub use self::{
    agent::*, course::*, dynamics::*, genome::*, obstacle_stream::*, play_session::*, scene::*,
    sensors::*,
};

mod agent;
mod course;
mod dynamics;
mod genome;
mod obstacle_stream;
mod play_session;
mod scene;
mod sensors;
