use crate::{
    Control, ControlSource, Dynamics as _, EdgePolicy, Field, GapColumn, Genome, KinematicState,
    Mode, ModeDynamics, Rect, Sensors,
};

/// Result of advancing a body by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Screen position of the hitbox's top-left corner after the step.
    pub position: (f32, f32),
    pub collided: bool,
}

/// The physical part of an agent: its mode dynamics and kinematic state.
#[derive(Debug, Clone)]
pub struct Body {
    dynamics: ModeDynamics,
    state: KinematicState,
}

impl Body {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        let dynamics = ModeDynamics::for_mode(mode);
        Self {
            state: dynamics.initial_state(),
            dynamics,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.dynamics.mode()
    }

    #[must_use]
    pub fn dynamics(&self) -> &ModeDynamics {
        &self.dynamics
    }

    #[must_use]
    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    /// Puts the body back at its starting position, at rest.
    pub fn reset(&mut self) {
        self.state = self.dynamics.initial_state();
    }

    /// Hitbox in screen coordinates.
    #[must_use]
    pub fn screen_hitbox(&self) -> Rect {
        let (width, height) = self.dynamics.hitbox_size();
        Rect::new(Field::AGENT_X, self.state.y, width, height)
    }

    /// Hitbox in world coordinates for the given camera offset.
    #[must_use]
    pub fn world_hitbox(&self, camera: u32) -> Rect {
        self.screen_hitbox()
            .shifted_x(Field::agent_world_x(camera) - Field::AGENT_X)
    }

    /// Advances the body by one tick and checks it against the field and `window`.
    ///
    /// Overlap is strict: a hitbox that only touches a box edge or the
    /// field boundary does not collide.
    pub fn step(&mut self, window: &[GapColumn], camera: u32, control: Control) -> StepOutcome {
        self.dynamics.integrate(&mut self.state, control);

        let (_, height) = self.dynamics.hitbox_size();
        #[expect(clippy::cast_precision_loss)]
        let floor = Field::HEIGHT as f32 - height;
        let out_of_field = self.state.y < 0.0 || self.state.y > floor;
        let mut collided = false;
        if out_of_field {
            match self.dynamics.edge_policy() {
                EdgePolicy::Kill => collided = true,
                EdgePolicy::Clamp => {
                    self.state.y = self.state.y.clamp(0.0, floor);
                    self.state.velocity = 0.0;
                }
            }
        }

        let hitbox = self.world_hitbox(camera);
        collided |= window.iter().any(|column| column.collides_with(&hitbox));

        StepOutcome {
            position: (Field::AGENT_X, self.state.y),
            collided,
        }
    }
}

/// A single simulated agent.
///
/// An agent owns its genome and its body. While alive it is stepped once
/// per tick; the first collision (or an external kill) freezes its fitness
/// to the camera distance at that moment, and it is never stepped again
/// until [`Agent::reset_values`] starts a fresh life.
#[derive(Debug, Clone)]
pub struct Agent {
    genome: Genome,
    body: Body,
    source: ControlSource,
    alive: bool,
    fitness: Option<u32>,
}

impl Agent {
    /// Creates a policy-controlled agent.
    #[must_use]
    pub fn new(mode: Mode, genome: Genome) -> Self {
        Self {
            genome,
            body: Body::new(mode),
            source: ControlSource::Policy,
            alive: true,
            fitness: None,
        }
    }

    /// Creates an agent driven by external input.
    #[must_use]
    pub fn human(mode: Mode) -> Self {
        Self {
            source: ControlSource::Human,
            ..Self::new(mode, Genome::zeroed())
        }
    }

    /// Like [`Self::new`], with a fitness recorded by an earlier evaluation.
    #[must_use]
    pub fn with_fitness(mode: Mode, genome: Genome, fitness: u32) -> Self {
        Self {
            fitness: Some(fitness),
            ..Self::new(mode, genome)
        }
    }

    #[must_use]
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.body.mode()
    }

    #[must_use]
    pub fn control_source(&self) -> ControlSource {
        self.source
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Distance travelled before death, or the recorded fitness of a loaded agent.
    ///
    /// Agents that never died report 0.
    #[must_use]
    pub fn fitness(&self) -> u32 {
        self.fitness.unwrap_or(0)
    }

    /// Decides the control for this tick.
    ///
    /// Policy agents evaluate their genome and ignore `input`; human agents
    /// use `input` as is.
    #[must_use]
    pub fn decide(&self, window: &[GapColumn], camera: u32, input: Control) -> Control {
        match self.source {
            ControlSource::Human => input,
            ControlSource::Policy => {
                let hitbox = self.body.world_hitbox(camera);
                let sensors = Sensors::read(&hitbox, self.body.state().velocity, window);
                let output = self.genome.evaluate(&sensors);
                self.body.dynamics().control_from_output(output)
            }
        }
    }

    /// Advances a living agent by one tick.
    ///
    /// Dead agents are left untouched and report no collision.
    pub fn step(&mut self, window: &[GapColumn], camera: u32, input: Control) -> StepOutcome {
        if !self.alive {
            let (x, y) = (Field::AGENT_X, self.body.state().y);
            return StepOutcome {
                position: (x, y),
                collided: false,
            };
        }
        let control = self.decide(window, camera, input);
        self.body.step(window, camera, control)
    }

    /// Marks the agent dead and freezes its fitness at `distance`.
    ///
    /// Has no effect on an agent that is already dead.
    pub fn kill(&mut self, distance: u32) {
        if self.alive {
            self.alive = false;
            self.fitness = Some(distance);
        }
    }

    /// Starts a fresh life with the same genome.
    ///
    /// The previous fitness is kept until the agent dies again, so it stays
    /// visible to selection while the new life is being evaluated.
    pub fn reset_values(&mut self) {
        self.body.reset();
        self.alive = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GravityDynamics;

    fn run_until_death(agent: &mut Agent, camera_speed: u32, limit: u32) -> Option<u32> {
        let mut camera = 0;
        while camera < limit {
            camera += camera_speed;
            if agent.step(&[], camera, Control::None).collided {
                agent.kill(camera);
                return Some(agent.fitness());
            }
        }
        None
    }

    #[test]
    fn test_silent_gravity_agent_hits_floor_before_200() {
        let mut agent = Agent::new(Mode::Gravity, Genome::zeroed());
        let died_at = run_until_death(&mut agent, 8, 10_000).unwrap();
        assert!(died_at < 200, "died at {died_at}");
        assert!(!agent.is_alive());
    }

    #[test]
    fn test_clamped_modes_survive_empty_course() {
        for mode in [Mode::Helicopter, Mode::Thrust] {
            let mut agent = Agent::new(mode, Genome::zeroed());
            assert_eq!(run_until_death(&mut agent, 8, 5_000), None);
            let hitbox = agent.body().screen_hitbox();
            assert!(hitbox.y >= 0.0 && hitbox.bottom() <= 720.0);
        }
    }

    #[test]
    fn test_gravity_touching_floor_is_not_collision() {
        let mut body = Body::new(Mode::Gravity);
        body.state.y = 720.0 - 70.0 - GravityDynamics::GRAVITY;
        body.state.velocity = 0.0;
        let outcome = body.step(&[], 0, Control::None);
        assert!(!outcome.collided);
        let outcome = body.step(&[], 0, Control::None);
        assert!(outcome.collided);
    }

    #[test]
    fn test_collides_with_column_in_window() {
        let mut agent = Agent::new(Mode::Helicopter, Genome::zeroed());
        // agent spans world x [camera + 100, camera + 200); the gap is far above it
        let column = GapColumn::new(1180, 1, 2);
        let outcome = agent.step(&[column], 1000, Control::Up);
        assert!(outcome.collided);
    }

    #[test]
    fn test_touching_column_face_is_not_collision() {
        let mut agent = Agent::new(Mode::Helicopter, Genome::zeroed());
        // hitbox right edge at 1000 + 100 + 100 = 1200
        let column = GapColumn::new(1200, 1, 2);
        let outcome = agent.step(&[column], 1000, Control::Up);
        assert!(!outcome.collided);
    }

    #[test]
    fn test_kill_freezes_fitness_once() {
        let mut agent = Agent::new(Mode::Thrust, Genome::zeroed());
        agent.kill(480);
        agent.kill(960);
        assert_eq!(agent.fitness(), 480);
        let outcome = agent.step(&[], 1000, Control::Axis(1.0));
        assert!(!outcome.collided);
    }

    #[test]
    fn test_reset_values_keeps_genome() {
        let mut weights = vec![0.0; Genome::LEN];
        weights[0] = 0.5;
        let genome = Genome::from_weights(weights).unwrap();
        let mut agent = Agent::new(Mode::Gravity, genome.clone());
        run_until_death(&mut agent, 8, 10_000);
        agent.reset_values();
        assert!(agent.is_alive());
        assert_eq!(agent.genome(), &genome);
        assert_eq!(agent.body().state(), &Body::new(Mode::Gravity).state);
    }

    #[test]
    fn test_human_agent_uses_input() {
        let agent = Agent::human(Mode::Gravity);
        assert!(agent.control_source().is_human());
        assert_eq!(agent.decide(&[], 0, Control::Flap), Control::Flap);
        let policy = Agent::new(Mode::Gravity, Genome::zeroed());
        assert_eq!(policy.decide(&[], 0, Control::Flap), Control::None);
    }
}
