use arrayvec::ArrayVec;

use crate::{GapColumn, ObstacleStream};

/// Maximum number of columns an agent can observe at once.
pub const WINDOW_CAPACITY: usize = 4;

/// Window of visible columns handed to agents each tick.
pub type Window = ArrayVec<GapColumn, WINDOW_CAPACITY>;

/// Parameters describing how a course scrolls and spawns obstacles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseParams {
    /// Seed of the obstacle stream; reused at every reset.
    pub seed: u64,
    /// Pixels the camera advances per tick.
    pub camera_speed: u32,
    /// Height of each gap, in rows.
    pub gap_rows: usize,
    /// Ticks between two spawned columns.
    pub spawn_interval: u32,
}

impl Default for CourseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            camera_speed: 8,
            gap_rows: 4,
            spawn_interval: ObstacleStream::spawn_interval(9, 50, 8),
        }
    }
}

/// A scrolling course: the camera position plus the obstacle stream.
///
/// The course is the only mutable state shared by the agents of a
/// generation. Agents read the visible window returned by
/// [`Course::window`]; only the driver advances the course.
#[derive(Debug, Clone)]
pub struct Course {
    params: CourseParams,
    camera: u32,
    tick: u64,
    stream: ObstacleStream,
}

impl Course {
    #[must_use]
    pub fn new(params: CourseParams) -> Self {
        Self {
            params,
            camera: 0,
            tick: 0,
            stream: ObstacleStream::new(params.seed, params.gap_rows, params.spawn_interval),
        }
    }

    #[must_use]
    pub fn params(&self) -> &CourseParams {
        &self.params
    }

    /// Horizontal camera offset, which is also the distance travelled so far.
    #[must_use]
    pub fn camera(&self) -> u32 {
        self.camera
    }

    /// Logical ticks since the last reset.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Moves the camera forward and lets the obstacle stream spawn and evict.
    ///
    /// The camera stops at `u32::MAX` instead of wrapping.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.camera = self.camera.saturating_add(self.params.camera_speed);
        self.stream.advance(self.camera);
    }

    /// Rewinds to camera 0 with an empty, reseeded obstacle stream.
    pub fn reset(&mut self) {
        self.camera = 0;
        self.tick = 0;
        self.stream.reset();
    }

    /// Returns the oldest `len` active columns (at most [`WINDOW_CAPACITY`]).
    #[must_use]
    pub fn window(&self, len: usize) -> Window {
        self.stream
            .columns()
            .take(len.min(WINDOW_CAPACITY))
            .copied()
            .collect()
    }

    /// Iterates over every active column in spawn order.
    pub fn columns(&self) -> impl Iterator<Item = &GapColumn> + '_ {
        self.stream.columns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_camera() {
        let mut course = Course::new(CourseParams::default());
        course.advance();
        course.advance();
        assert_eq!(course.camera(), 16);
        assert_eq!(course.tick(), 2);
        assert_eq!(course.columns().count(), 1);
    }

    #[test]
    fn test_camera_saturates() {
        let params = CourseParams {
            camera_speed: u32::MAX / 2 + 1,
            spawn_interval: 1,
            ..CourseParams::default()
        };
        let mut course = Course::new(params);
        course.advance();
        course.advance();
        course.advance();
        assert_eq!(course.camera(), u32::MAX);
        assert_eq!(course.tick(), 3);
        assert!(course.columns().all(|column| column.x() == u32::MAX));
    }

    #[test]
    fn test_window_is_bounded() {
        let params = CourseParams {
            spawn_interval: 1,
            ..CourseParams::default()
        };
        let mut course = Course::new(params);
        for _ in 0..10 {
            course.advance();
        }
        assert_eq!(course.window(2).len(), 2);
        assert_eq!(course.window(100).len(), WINDOW_CAPACITY);
    }

    #[test]
    fn test_reset_replays_course() {
        let mut course = Course::new(CourseParams::default());
        for _ in 0..300 {
            course.advance();
        }
        let before: Vec<_> = course.columns().copied().collect();
        course.reset();
        assert_eq!(course.camera(), 0);
        assert_eq!(course.columns().count(), 0);
        for _ in 0..300 {
            course.advance();
        }
        let after: Vec<_> = course.columns().copied().collect();
        assert_eq!(before, after);
    }
}
