use crate::{Field, Rect};

/// A single obstacle: a full-height column of square boxes with one gap.
///
/// The column is divided into [`GapColumn::ROWS`] rows of
/// [`GapColumn::ROW_SIZE`] pixels. Rows in `gap_offset..gap_offset + gap_rows`
/// are clear; every other row holds a box. The column never moves in world
/// coordinates; the camera scrolls past it.
///
/// # Example
///
/// ```
/// use gapflight_engine::GapColumn;
///
/// let column = GapColumn::new(1280, 3, 4);
/// let blocked: Vec<_> = (0..GapColumn::ROWS).filter(|&r| column.is_row_blocked(r)).collect();
/// assert_eq!(blocked, vec![0, 1, 2, 7, 8, 9, 10, 11]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapColumn {
    x: u32,
    gap_offset: usize,
    gap_rows: usize,
}

impl GapColumn {
    /// Edge length of one box, in pixels.
    pub const ROW_SIZE: u32 = 60;
    /// Number of rows in a column.
    pub const ROWS: usize = (Field::HEIGHT / Self::ROW_SIZE) as usize;

    /// Creates a column whose left edge sits at world coordinate `x`.
    #[must_use]
    pub const fn new(x: u32, gap_offset: usize, gap_rows: usize) -> Self {
        Self {
            x,
            gap_offset,
            gap_rows,
        }
    }

    /// Left edge in world coordinates.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Right edge in world coordinates.
    #[must_use]
    pub const fn right(&self) -> u32 {
        self.x + Self::ROW_SIZE
    }

    /// First clear row.
    #[must_use]
    pub const fn gap_offset(&self) -> usize {
        self.gap_offset
    }

    /// Number of clear rows.
    #[must_use]
    pub const fn gap_rows(&self) -> usize {
        self.gap_rows
    }

    /// Vertical pixel coordinate of the middle of the gap.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn gap_middle(&self) -> f32 {
        (self.gap_offset as f32 + self.gap_rows as f32 / 2.0) * Self::ROW_SIZE as f32
    }

    /// Returns `true` if `row` holds a box.
    #[must_use]
    pub const fn is_row_blocked(&self, row: usize) -> bool {
        row < self.gap_offset || row >= self.gap_offset + self.gap_rows
    }

    /// Horizontal screen coordinate of the left edge for the given camera offset.
    #[must_use]
    pub fn screen_x(&self, camera: u32) -> i64 {
        i64::from(self.x) - i64::from(camera)
    }

    /// Iterates over the boxes of this column in world coordinates.
    #[expect(clippy::cast_precision_loss)]
    pub fn boxes(&self) -> impl Iterator<Item = Rect> + '_ {
        let size = Self::ROW_SIZE as f32;
        (0..Self::ROWS)
            .filter(|&row| self.is_row_blocked(row))
            .map(move |row| Rect::new(self.x as f32, row as f32 * size, size, size))
    }

    /// Returns `true` if `hitbox` (world coordinates) overlaps any box.
    #[must_use]
    pub fn collides_with(&self, hitbox: &Rect) -> bool {
        self.boxes().any(|b| b.overlaps(hitbox))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_rows_are_clear() {
        let column = GapColumn::new(0, 3, 4);
        let clear: Vec<_> = (0..GapColumn::ROWS)
            .filter(|&r| !column.is_row_blocked(r))
            .collect();
        assert_eq!(clear, vec![3, 4, 5, 6]);
        assert_eq!(column.boxes().count(), GapColumn::ROWS - 4);
    }

    #[test]
    fn test_gap_middle() {
        let column = GapColumn::new(0, 3, 4);
        assert!((column.gap_middle() - 300.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_hitbox_inside_gap_does_not_collide() {
        let column = GapColumn::new(1000, 3, 4);
        // gap spans y in [180, 420)
        let hitbox = Rect::new(990.0, 200.0, 70.0, 70.0);
        assert!(!column.collides_with(&hitbox));
    }

    #[test]
    fn test_hitbox_touching_gap_edge_does_not_collide() {
        let column = GapColumn::new(1000, 3, 4);
        let top = Rect::new(990.0, 180.0, 70.0, 70.0);
        let bottom = Rect::new(990.0, 350.0, 70.0, 70.0);
        assert!(!column.collides_with(&top));
        assert!(!column.collides_with(&bottom));
    }

    #[test]
    fn test_hitbox_touching_column_face_does_not_collide() {
        let column = GapColumn::new(1000, 3, 4);
        let hitbox = Rect::new(930.0, 0.0, 70.0, 70.0);
        assert!(!column.collides_with(&hitbox));
        assert!(column.collides_with(&hitbox.shifted_x(0.5)));
    }

    #[test]
    fn test_hitbox_overlapping_box_collides() {
        let column = GapColumn::new(1000, 3, 4);
        let hitbox = Rect::new(990.0, 170.0, 70.0, 70.0);
        assert!(column.collides_with(&hitbox));
    }

    #[test]
    fn test_screen_x_can_be_negative() {
        let column = GapColumn::new(100, 1, 4);
        assert_eq!(column.screen_x(160), -60);
    }
}
