use crate::{Field, GapColumn, Rect};

/// Number of values a policy observes per tick.
pub const SENSOR_COUNT: usize = 6;

/// Number of upcoming columns the policy observes.
const OBSERVED_COLUMNS: usize = 2;

/// Normalized observation handed to a policy.
///
/// Layout:
///
/// | index | value                                                        |
/// |-------|--------------------------------------------------------------|
/// | 0     | vertical centre of the hitbox, mapped to `[-1, 1]`           |
/// | 1     | vertical velocity / 20                                       |
/// | 2, 4  | horizontal distance to the next columns / field width         |
/// | 3, 5  | gap middle minus hitbox centre / field height                 |
///
/// Columns whose right edge is already behind the agent are skipped. A
/// missing column reads as one field width away with a centred gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensors([f32; SENSOR_COUNT]);

impl Sensors {
    const VELOCITY_SCALE: f32 = 20.0;

    /// Reads the sensors of an agent whose hitbox is `hitbox` (world coordinates).
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn read(hitbox: &Rect, velocity: f32, window: &[GapColumn]) -> Self {
        let width = Field::WIDTH as f32;
        let height = Field::HEIGHT as f32;
        let centre_y = hitbox.y + hitbox.height / 2.0;

        let mut values = [0.0; SENSOR_COUNT];
        values[0] = centre_y / height * 2.0 - 1.0;
        values[1] = velocity / Self::VELOCITY_SCALE;

        let mut ahead = window
            .iter()
            .filter(|column| column.right() as f32 > hitbox.x);
        for slot in 0..OBSERVED_COLUMNS {
            let (dx, dy) = match ahead.next() {
                Some(column) => (
                    (column.x() as f32 - hitbox.x) / width,
                    (column.gap_middle() - centre_y) / height,
                ),
                None => (1.0, 0.0),
            };
            values[2 + slot * 2] = dx;
            values[3 + slot * 2] = dy;
        }
        Self(values)
    }

    #[must_use]
    pub fn values(&self) -> &[f32; SENSOR_COUNT] {
        &self.0
    }
}
