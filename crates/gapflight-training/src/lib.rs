//! Evolutionary training of gap-flying agents.
//!
//! This crate drives [`gapflight_engine`] agents through generations:
//!
//! - [`Trainer`]: the per-tick loop over two cohorts and the
//!   generation-end transition
//! - [`Evolution`]: elitist tournament selection and roulette breeding
//! - [`operators`]: BLX-α crossover and Gaussian mutation
//! - [`CheckpointStore`]: JSON snapshots of selected survivors
//! - [`TrainingConfig`]: run parameters, loadable from a JSON file
//!
//! Everything random is drawn from explicitly seeded [`rand_pcg::Pcg32`]
//! streams, so a run is reproducible from its configuration.

pub use self::{checkpoint::*, config::*, evolution::*, population::*, stats::*, trainer::*};

mod checkpoint;
mod config;
mod evolution;
pub mod operators;
mod population;
mod stats;
mod trainer;
