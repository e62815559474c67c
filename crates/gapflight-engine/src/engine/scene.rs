use crate::{Agent, Course, Mode, Rect};

/// Render-facing view of one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSprite {
    /// Hitbox in screen coordinates.
    pub hitbox: Rect,
    /// Animation phase (rotor frame for helicopters).
    pub phase: u8,
    /// `true` for agents replayed from the previous generation.
    pub carried_over: bool,
}

impl AgentSprite {
    #[must_use]
    pub fn of(agent: &Agent, carried_over: bool) -> Self {
        Self {
            hitbox: agent.body().screen_hitbox(),
            phase: agent.body().state().phase,
            carried_over,
        }
    }
}

/// Snapshot of everything a renderer needs for one tick.
///
/// Renderers only ever read a scene; nothing flows back into the
/// simulation except the decision to quit.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub mode: Mode,
    pub camera: u32,
    pub agents: Vec<AgentSprite>,
    /// Obstacle boxes in screen coordinates.
    pub obstacles: Vec<Rect>,
    /// Current generation number (absent in human play).
    pub generation: Option<u32>,
    pub alive: usize,
    pub high_score: u32,
    /// Distance travelled in the current run.
    pub score: u32,
}

impl Scene {
    /// Returns the boxes of every active column, moved into screen coordinates.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn obstacles_on_screen(course: &Course) -> Vec<Rect> {
        let camera = course.camera() as f32;
        course
            .columns()
            .flat_map(|column| column.boxes())
            .map(|b| b.shifted_x(-camera))
            .collect()
    }
}
