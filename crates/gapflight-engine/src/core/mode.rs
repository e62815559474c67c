use serde::{Deserialize, Serialize};

/// Physics mode of a run.
///
/// Every agent of a run shares the same mode. The mode decides how the
/// control input moves an agent and what happens at the field boundary;
/// see [`Dynamics`](crate::Dynamics) for the per-mode rules.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Constant downward pull; a flap gives a capped upward kick.
    #[display("gravity")]
    Gravity,
    /// Hold to climb, release to sink.
    #[default]
    #[display("helicopter")]
    Helicopter,
    /// Continuous vertical thrust with heavier drag.
    #[display("thrust")]
    Thrust,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Gravity, Mode::Helicopter, Mode::Thrust];
}
