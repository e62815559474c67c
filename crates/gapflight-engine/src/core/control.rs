use serde::{Deserialize, Serialize};

/// Control input applied to an agent for a single tick.
///
/// Which variants a mode reacts to is decided by its dynamics: gravity only
/// reacts to [`Control::Flap`], the helicopter to [`Control::Up`] /
/// [`Control::Down`], and thrust to [`Control::Axis`]. Any other input is
/// treated as "no input" for that mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum Control {
    #[default]
    None,
    /// Discrete upward impulse.
    Flap,
    /// Accelerate upward.
    Up,
    /// Accelerate downward.
    Down,
    /// Continuous thrust in `[-1.0, 1.0]`; positive values push upward.
    Axis(f32),
}

impl Control {
    /// Returns the thrust axis value, clamped to `[-1.0, 1.0]`.
    ///
    /// `Up` and `Down` read as full thrust in either direction.
    #[must_use]
    pub fn axis(self) -> f32 {
        match self {
            Control::Axis(value) => value.clamp(-1.0, 1.0),
            Control::Up => 1.0,
            Control::Down => -1.0,
            Control::None | Control::Flap => 0.0,
        }
    }
}

/// Where an agent takes its per-tick control decision from.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum ControlSource {
    /// The agent's genome decides.
    #[default]
    Policy,
    /// An external input device decides.
    Human,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_is_clamped() {
        assert!((Control::Axis(3.0).axis() - 1.0).abs() < f32::EPSILON);
        assert!((Control::Axis(-3.0).axis() + 1.0).abs() < f32::EPSILON);
        assert!((Control::Axis(0.25).axis() - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_discrete_controls_map_to_full_axis() {
        assert!((Control::Up.axis() - 1.0).abs() < f32::EPSILON);
        assert!((Control::Down.axis() + 1.0).abs() < f32::EPSILON);
        assert!(Control::Flap.axis().abs() < f32::EPSILON);
        assert!(Control::None.axis().abs() < f32::EPSILON);
    }
}
