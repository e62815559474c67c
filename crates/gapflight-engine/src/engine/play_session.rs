use crate::{Agent, AgentSprite, Control, Course, CourseParams, Mode, Scene};

/// Event reported by [`PlaySession::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PlayEvent {
    Running,
    /// The agent collided; the course has already restarted.
    Crashed { score: u32 },
}

/// A single human-controlled run that restarts on every crash.
///
/// Human agents only see the two nearest columns. On a crash the high
/// score is updated, the camera returns to 0 and the obstacle stream is
/// reseeded, so every attempt faces the same course.
#[derive(Debug, Clone)]
pub struct PlaySession {
    mode: Mode,
    agent: Agent,
    course: Course,
    high_score: u32,
    attempts: u32,
}

impl PlaySession {
    /// Number of columns a human-controlled agent reacts to.
    pub const WINDOW: usize = 2;

    #[must_use]
    pub fn new(mode: Mode, params: CourseParams) -> Self {
        Self {
            mode,
            agent: Agent::human(mode),
            course: Course::new(params),
            high_score: 0,
            attempts: 1,
        }
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.course.camera()
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Advances the run by one tick with `control` as the player's input.
    pub fn tick(&mut self, control: Control) -> PlayEvent {
        self.course.advance();
        let camera = self.course.camera();
        let window = self.course.window(Self::WINDOW);
        let outcome = self.agent.step(&window, camera, control);
        if !outcome.collided {
            return PlayEvent::Running;
        }

        self.agent.kill(camera);
        self.high_score = self.high_score.max(camera);
        self.course.reset();
        self.agent = Agent::human(self.mode);
        self.attempts += 1;
        PlayEvent::Crashed { score: camera }
    }

    #[must_use]
    pub fn scene(&self) -> Scene {
        Scene {
            mode: self.mode,
            camera: self.course.camera(),
            agents: vec![AgentSprite::of(&self.agent, false)],
            obstacles: Scene::obstacles_on_screen(&self.course),
            generation: None,
            alive: 1,
            high_score: self.high_score,
            score: self.course.camera(),
        }
    }
}
