//! Terminal front-end runtime.
//!
//! [`Tui`] runs an [`App`] against a fixed-rate simulation clock. The
//! clock's speed can be changed at run time through [`Pacing`], which also
//! measures the tick rate actually achieved.

mod app;
mod event;
mod event_loop;
mod pacing;
mod runner;

pub use self::{
    app::App,
    event_loop::RenderMode,
    pacing::{GameSpeed, Pacing},
    runner::Tui,
};
