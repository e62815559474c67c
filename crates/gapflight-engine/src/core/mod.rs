//! Core data structures shared by the simulation.
//!
//! - [`Field`] - Play field dimensions and the agents' fixed screen column
//! - [`GapColumn`] - A single obstacle: a column of boxes with one vertical gap
//! - [`Rect`] - Axis-aligned hitbox with strict overlap semantics
//! - [`Mode`] - Physics mode selector (gravity, helicopter, thrust)
//! - [`Control`] / [`ControlSource`] - Per-tick control input and where it comes from

pub use self::{control::*, field::*, gap_column::*, mode::*, rect::*};

pub(crate) mod control;
pub(crate) mod field;
pub(crate) mod gap_column;
pub(crate) mod mode;
pub(crate) mod rect;
