use std::{collections::VecDeque, ops::RangeInclusive};

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{Field, GapColumn};

/// Produces gap columns from a re-seedable random stream.
///
/// # Determinism
///
/// The stream owns its own [`Pcg32`] and draws exactly one value per
/// spawned column. Calling [`Self::reset`] rewinds the generator to the
/// original seed, so every generation of a run (and every agent inside a
/// generation) faces the same sequence of columns at the same ticks.
///
/// # Cadence
///
/// A column is spawned on the first tick after a reset and then every
/// `spawn_interval` ticks. Columns appear at the right edge of the field
/// and are evicted, oldest first, once they have scrolled a full box width
/// behind the camera.
///
/// # Example
///
/// ```
/// use gapflight_engine::ObstacleStream;
///
/// let mut a = ObstacleStream::new(0, 4, 57);
/// let mut b = ObstacleStream::new(0, 4, 57);
/// for tick in 1..=500 {
///     a.advance(tick * 8);
///     b.advance(tick * 8);
/// }
/// assert!(a.columns().eq(b.columns()));
/// ```
#[derive(Debug, Clone)]
pub struct ObstacleStream {
    seed: u64,
    rng: Pcg32,
    gap_rows: usize,
    spawn_interval: u32,
    ticks_since_spawn: u32,
    columns: VecDeque<GapColumn>,
}

impl ObstacleStream {
    /// Range the gap's first clear row is drawn from.
    pub const GAP_OFFSET_RANGE: RangeInclusive<usize> = 1..=5;

    /// Creates a stream positioned at the start of a generation.
    #[must_use]
    pub fn new(seed: u64, gap_rows: usize, spawn_interval: u32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            gap_rows,
            spawn_interval,
            ticks_since_spawn: spawn_interval,
            columns: VecDeque::new(),
        }
    }

    /// Number of ticks between two spawns for the given pacing parameters.
    ///
    /// `box_gap` is the distance between columns measured in camera steps
    /// per second; dividing by the camera speed and multiplying by the tick
    /// rate yields a tick count, rounded up. Out-of-range products saturate.
    #[must_use]
    pub fn spawn_interval(box_gap: u32, fps: u32, camera_speed: u32) -> u32 {
        box_gap.saturating_mul(fps).div_ceil(camera_speed).max(1)
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Clears all columns and rewinds the random stream to its seed.
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.ticks_since_spawn = self.spawn_interval;
        self.columns.clear();
    }

    /// Advances the stream by one tick with the camera at `camera`.
    ///
    /// Spawns a column if one is due, then evicts columns that are fully
    /// behind the camera. Returns the spawned column, if any.
    pub fn advance(&mut self, camera: u32) -> Option<GapColumn> {
        self.ticks_since_spawn = self.ticks_since_spawn.saturating_add(1);
        let spawned = (self.ticks_since_spawn >= self.spawn_interval).then(|| {
            self.ticks_since_spawn = 0;
            self.spawn(camera)
        });
        self.evict(camera);
        spawned
    }

    /// Appends a new column at the right edge of the field.
    pub fn spawn(&mut self, camera: u32) -> GapColumn {
        let gap_offset = self.rng.random_range(Self::GAP_OFFSET_RANGE);
        let x = Field::WIDTH.saturating_add(camera);
        let column = GapColumn::new(x, gap_offset, self.gap_rows);
        self.columns.push_back(column);
        column
    }

    /// Removes columns whose right edge is more than one box width behind the camera.
    pub fn evict(&mut self, camera: u32) {
        let margin = -i64::from(GapColumn::ROW_SIZE);
        while self
            .columns
            .front()
            .is_some_and(|column| column.screen_x(camera) < margin)
        {
            self.columns.pop_front();
        }
    }

    /// Iterates over active columns in spawn order.
    pub fn columns(&self) -> impl Iterator<Item = &GapColumn> + '_ {
        self.columns.iter()
    }

    /// Number of active columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(stream: &mut ObstacleStream, ticks: u32, camera_speed: u32) -> Vec<GapColumn> {
        (1..=ticks)
            .filter_map(|tick| stream.advance(tick * camera_speed))
            .collect()
    }

    #[test]
    fn test_spawn_interval_rounds_up() {
        assert_eq!(ObstacleStream::spawn_interval(9, 50, 8), 57);
        assert_eq!(ObstacleStream::spawn_interval(8, 50, 8), 50);
        assert_eq!(ObstacleStream::spawn_interval(0, 50, 8), 1);
        assert_eq!(ObstacleStream::spawn_interval(u32::MAX, 50, 1), u32::MAX);
    }

    #[test]
    fn test_first_column_spawns_on_first_tick() {
        let mut stream = ObstacleStream::new(0, 4, 57);
        let column = stream.advance(8).unwrap();
        assert_eq!(column.x(), Field::WIDTH + 8);
        assert_eq!(stream.advance(16), None);
    }

    #[test]
    fn test_spawn_cadence() {
        let mut stream = ObstacleStream::new(3, 4, 10);
        let spawned = drive(&mut stream, 31, 8);
        let xs: Vec<_> = spawned.iter().map(GapColumn::x).collect();
        assert_eq!(
            xs,
            vec![Field::WIDTH + 8, Field::WIDTH + 88, Field::WIDTH + 168, Field::WIDTH + 248]
        );
    }

    #[test]
    fn test_offsets_within_range() {
        let mut stream = ObstacleStream::new(42, 4, 1);
        for column in drive(&mut stream, 1000, 8) {
            assert!(ObstacleStream::GAP_OFFSET_RANGE.contains(&column.gap_offset()));
            assert_eq!(column.gap_rows(), 4);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = ObstacleStream::new(7, 4, 57);
        let mut b = ObstacleStream::new(7, 4, 57);
        assert_eq!(drive(&mut a, 3000, 8), drive(&mut b, 3000, 8));
    }

    #[test]
    fn test_reset_replays_sequence() {
        let mut stream = ObstacleStream::new(11, 4, 20);
        let first = drive(&mut stream, 2000, 8);
        stream.reset();
        assert!(stream.is_empty());
        let second = drive(&mut stream, 2000, 8);
        assert_eq!(first, second);
    }

    #[test]
    fn test_evicts_columns_behind_camera() {
        let mut stream = ObstacleStream::new(0, 4, 1000);
        stream.advance(0);
        assert_eq!(stream.len(), 1);
        // column spans [1280, 1340); evicted once x - camera < -60
        stream.evict(1340);
        assert_eq!(stream.len(), 1);
        stream.evict(1341);
        assert!(stream.is_empty());
    }

    #[test]
    fn test_active_set_stays_bounded() {
        let mut stream = ObstacleStream::new(5, 4, 57);
        for tick in 1..=10_000 {
            stream.advance(tick * 8);
            assert!(stream.len() <= 5);
        }
    }
}
