//! Per-mode kinematics.
//!
//! Every mode implements [`Dynamics`]. An agent picks its implementation
//! once, through [`ModeDynamics::for_mode`], and keeps it for its whole
//! life; the per-tick step never branches on the mode again.
//!
//! | mode       | reacts to          | boundary |
//! |------------|--------------------|----------|
//! | gravity    | `Flap`             | kill     |
//! | helicopter | `Up` (else sinks)  | clamp    |
//! | thrust     | `Axis`             | clamp    |

use crate::{Control, Field, Mode};

/// What happens when a hitbox leaves the vertical extent of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EdgePolicy {
    /// Leaving the field is a collision.
    Kill,
    /// The hitbox is pinned to the field and its velocity is zeroed.
    Clamp,
}

/// Vertical kinematic state of an agent.
///
/// `y` is the top edge of the hitbox in screen coordinates and `velocity`
/// is in pixels per tick (positive values move down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    pub y: f32,
    pub velocity: f32,
    /// Animation phase, advanced by modes that animate.
    pub phase: u8,
}

/// Capability shared by every physics mode.
pub trait Dynamics {
    /// Width and height of the hitbox.
    fn hitbox_size(&self) -> (f32, f32);

    fn edge_policy(&self) -> EdgePolicy;

    /// Advances `state` by one tick under `control`.
    fn integrate(&self, state: &mut KinematicState, control: Control);

    /// Maps the policy network's output in `[-1.0, 1.0]` to a control.
    fn control_from_output(&self, output: f32) -> Control;

    /// State at the start of a life: vertically centred and at rest.
    fn initial_state(&self) -> KinematicState {
        let (_, height) = self.hitbox_size();
        #[expect(clippy::cast_precision_loss)]
        let field_height = Field::HEIGHT as f32;
        KinematicState {
            y: (field_height - height) / 2.0,
            velocity: 0.0,
            phase: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GravityDynamics;

impl GravityDynamics {
    pub const GRAVITY: f32 = 1.5;
    pub const MAX_FALL_SPEED: f32 = 25.0;
    pub const FLAP_IMPULSE: f32 = 12.0;
    pub const MAX_RISE_SPEED: f32 = 12.0;
}

impl Dynamics for GravityDynamics {
    fn hitbox_size(&self) -> (f32, f32) {
        (70.0, 70.0)
    }

    fn edge_policy(&self) -> EdgePolicy {
        EdgePolicy::Kill
    }

    fn integrate(&self, state: &mut KinematicState, control: Control) {
        if control.is_flap() {
            state.velocity = (state.velocity - Self::FLAP_IMPULSE).max(-Self::MAX_RISE_SPEED);
        }
        state.velocity = (state.velocity + Self::GRAVITY).min(Self::MAX_FALL_SPEED);
        state.y += state.velocity;
    }

    fn control_from_output(&self, output: f32) -> Control {
        if output > 0.0 {
            Control::Flap
        } else {
            Control::None
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HelicopterDynamics;

impl HelicopterDynamics {
    pub const ACCELERATION: f32 = 0.8;
    pub const DRAG: f32 = 0.02;
    pub const MAX_SPEED: f32 = 10.0;
    pub const ROTOR_FRAMES: u8 = 4;
}

impl Dynamics for HelicopterDynamics {
    fn hitbox_size(&self) -> (f32, f32) {
        (100.0, 50.0)
    }

    fn edge_policy(&self) -> EdgePolicy {
        EdgePolicy::Clamp
    }

    fn integrate(&self, state: &mut KinematicState, control: Control) {
        let lift = if control.is_up() {
            -Self::ACCELERATION
        } else {
            Self::ACCELERATION
        };
        state.velocity =
            ((state.velocity + lift) * (1.0 - Self::DRAG)).clamp(-Self::MAX_SPEED, Self::MAX_SPEED);
        state.y += state.velocity;
        state.phase = (state.phase + 1) % Self::ROTOR_FRAMES;
    }

    fn control_from_output(&self, output: f32) -> Control {
        if output > 0.0 {
            Control::Up
        } else {
            Control::Down
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThrustDynamics;

impl ThrustDynamics {
    pub const THRUST: f32 = 1.6;
    pub const DRAG: f32 = 0.1;
}

impl Dynamics for ThrustDynamics {
    fn hitbox_size(&self) -> (f32, f32) {
        (110.0, 70.0)
    }

    fn edge_policy(&self) -> EdgePolicy {
        EdgePolicy::Clamp
    }

    fn integrate(&self, state: &mut KinematicState, control: Control) {
        state.velocity = state.velocity * (1.0 - Self::DRAG) - Self::THRUST * control.axis();
        state.y += state.velocity;
    }

    fn control_from_output(&self, output: f32) -> Control {
        Control::Axis(output)
    }
}

/// The closed set of mode implementations.
#[derive(Debug, Clone, Copy)]
pub enum ModeDynamics {
    Gravity(GravityDynamics),
    Helicopter(HelicopterDynamics),
    Thrust(ThrustDynamics),
}

impl ModeDynamics {
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Gravity => Self::Gravity(GravityDynamics),
            Mode::Helicopter => Self::Helicopter(HelicopterDynamics),
            Mode::Thrust => Self::Thrust(ThrustDynamics),
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        match self {
            Self::Gravity(_) => Mode::Gravity,
            Self::Helicopter(_) => Mode::Helicopter,
            Self::Thrust(_) => Mode::Thrust,
        }
    }

    fn as_dyn(&self) -> &dyn Dynamics {
        match self {
            Self::Gravity(d) => d,
            Self::Helicopter(d) => d,
            Self::Thrust(d) => d,
        }
    }
}

impl Dynamics for ModeDynamics {
    fn hitbox_size(&self) -> (f32, f32) {
        self.as_dyn().hitbox_size()
    }

    fn edge_policy(&self) -> EdgePolicy {
        self.as_dyn().edge_policy()
    }

    fn integrate(&self, state: &mut KinematicState, control: Control) {
        self.as_dyn().integrate(state, control);
    }

    fn control_from_output(&self, output: f32) -> Control {
        self.as_dyn().control_from_output(output)
    }

    fn initial_state(&self) -> KinematicState {
        self.as_dyn().initial_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_centred() {
        for mode in Mode::ALL {
            let dynamics = ModeDynamics::for_mode(mode);
            let (_, height) = dynamics.hitbox_size();
            let state = dynamics.initial_state();
            assert!((state.y * 2.0 + height - 720.0).abs() < f32::EPSILON);
            assert!(state.velocity.abs() < f32::EPSILON);
            assert_eq!(dynamics.mode(), mode);
        }
    }

    #[test]
    fn test_gravity_accelerates_down_to_cap() {
        let dynamics = GravityDynamics;
        let mut state = dynamics.initial_state();
        for _ in 0..100 {
            dynamics.integrate(&mut state, Control::None);
        }
        assert!((state.velocity - GravityDynamics::MAX_FALL_SPEED).abs() < f32::EPSILON);
    }

    #[test]
    fn test_repeated_flaps_are_capped() {
        let dynamics = GravityDynamics;
        let mut state = dynamics.initial_state();
        for _ in 0..50 {
            dynamics.integrate(&mut state, Control::Flap);
            assert!(state.velocity >= -GravityDynamics::MAX_RISE_SPEED + GravityDynamics::GRAVITY);
        }
    }

    #[test]
    fn test_gravity_ignores_other_controls() {
        let dynamics = GravityDynamics;
        let mut a = dynamics.initial_state();
        let mut b = dynamics.initial_state();
        dynamics.integrate(&mut a, Control::Up);
        dynamics.integrate(&mut b, Control::None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_helicopter_climbs_and_sinks() {
        let dynamics = HelicopterDynamics;
        let start = dynamics.initial_state();
        let mut up = start;
        let mut down = start;
        for _ in 0..5 {
            dynamics.integrate(&mut up, Control::Up);
            dynamics.integrate(&mut down, Control::None);
        }
        assert!(up.y < start.y);
        assert!(down.y > start.y);
        assert_eq!(up.phase, 5 % HelicopterDynamics::ROTOR_FRAMES);
    }

    #[test]
    fn test_helicopter_speed_is_bounded() {
        let dynamics = HelicopterDynamics;
        let mut state = dynamics.initial_state();
        for _ in 0..200 {
            dynamics.integrate(&mut state, Control::Up);
            assert!(state.velocity.abs() <= HelicopterDynamics::MAX_SPEED);
        }
    }

    #[test]
    fn test_thrust_follows_axis() {
        let dynamics = ThrustDynamics;
        let start = dynamics.initial_state();
        let mut state = start;
        dynamics.integrate(&mut state, Control::Axis(1.0));
        assert!(state.y < start.y);
        let mut state = start;
        dynamics.integrate(&mut state, Control::Axis(-0.5));
        assert!(state.y > start.y);
        let mut state = start;
        dynamics.integrate(&mut state, Control::None);
        assert!((state.y - start.y).abs() < f32::EPSILON);
    }

    #[test]
    fn test_control_mapping() {
        assert_eq!(GravityDynamics.control_from_output(0.3), Control::Flap);
        assert_eq!(GravityDynamics.control_from_output(-0.3), Control::None);
        assert_eq!(HelicopterDynamics.control_from_output(0.3), Control::Up);
        assert_eq!(HelicopterDynamics.control_from_output(0.0), Control::Down);
        assert_eq!(ThrustDynamics.control_from_output(0.3), Control::Axis(0.3));
    }

    #[test]
    fn test_edge_policies() {
        assert!(ModeDynamics::for_mode(Mode::Gravity).edge_policy().is_kill());
        assert!(ModeDynamics::for_mode(Mode::Helicopter).edge_policy().is_clamp());
        assert!(ModeDynamics::for_mode(Mode::Thrust).edge_policy().is_clamp());
    }
}
