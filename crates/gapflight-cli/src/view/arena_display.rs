use std::ops::Range;

use gapflight_engine::{Field, Mode, Scene};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::style;

/// Draws the play field, scaled down to the available cells.
#[derive(Debug)]
pub struct ArenaDisplay<'a> {
    scene: &'a Scene,
    block: Option<BlockWidget<'a>>,
}

impl<'a> ArenaDisplay<'a> {
    const ROTOR: [char; 4] = ['-', '\\', '|', '/'];

    pub fn new(scene: &'a Scene) -> Self {
        Self { scene, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }
}

impl Widget for ArenaDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        if area.is_empty() {
            return;
        }

        buf.set_style(area, style::SKY);
        for obstacle in &self.scene.obstacles {
            fill(buf, area, obstacle, ' ', style::WALL);
        }
        for sprite in &self.scene.agents {
            let glyph = match self.scene.mode {
                Mode::Helicopter => Self::ROTOR[usize::from(sprite.phase) % Self::ROTOR.len()],
                Mode::Gravity | Mode::Thrust => ' ',
            };
            let style = if sprite.carried_over {
                style::CARRIED_OVER
            } else {
                style::AGENT
            };
            fill(buf, area, &sprite.hitbox, glyph, style);
        }
    }
}

/// Paints the cells covered by `rect`, given in field coordinates.
fn fill(
    buf: &mut Buffer,
    area: Rect,
    rect: &gapflight_engine::Rect,
    glyph: char,
    style: ratatui::style::Style,
) {
    #[expect(clippy::cast_precision_loss)]
    let (width, height) = (Field::WIDTH as f32, Field::HEIGHT as f32);
    let cols = cell_span(rect.x, rect.right(), width, area.width);
    let rows = cell_span(rect.y, rect.bottom(), height, area.height);
    for row in rows {
        for col in cols.clone() {
            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_char(glyph).set_style(style);
            }
        }
    }
}

/// Maps `[start, end)` in a field of length `extent` onto `cells` cells.
///
/// Any non-empty visible span covers at least one cell.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cell_span(start: f32, end: f32, extent: f32, cells: u16) -> Range<u16> {
    let start = start.max(0.0);
    let end = end.min(extent);
    if end <= start {
        return 0..0;
    }
    let scale = f32::from(cells) / extent;
    let first = (start * scale).floor() as u16;
    let last = ((end * scale).ceil() as u16).clamp(first + 1, cells);
    first.min(cells)..last
}

#[cfg(test)]
mod tests {
    use gapflight_engine::AgentSprite;

    use super::*;

    #[test]
    fn test_cell_span() {
        assert_eq!(cell_span(0.0, 1280.0, 1280.0, 64), 0..64);
        assert_eq!(cell_span(100.0, 200.0, 1280.0, 64), 5..10);
        // off screen
        assert_eq!(cell_span(-120.0, -60.0, 1280.0, 64), 0..0);
        assert_eq!(cell_span(1300.0, 1360.0, 1280.0, 64), 0..0);
        // partially visible
        assert_eq!(cell_span(-30.0, 30.0, 1280.0, 64), 0..2);
        // tiny spans still show
        assert_eq!(cell_span(10.0, 11.0, 1280.0, 64), 0..1);
    }

    #[test]
    fn test_render_paints_agents_over_walls() {
        let scene = Scene {
            mode: Mode::Helicopter,
            agents: vec![AgentSprite {
                hitbox: gapflight_engine::Rect::new(0.0, 0.0, 160.0, 90.0),
                phase: 2,
                carried_over: false,
            }],
            obstacles: vec![gapflight_engine::Rect::new(0.0, 0.0, 320.0, 180.0)],
            ..Scene::default()
        };
        let area = Rect::new(0, 0, 16, 8);
        let mut buf = Buffer::empty(area);
        ArenaDisplay::new(&scene).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "|");
        assert_eq!(buf[(0, 0)].style().bg, style::AGENT.bg);
        assert_eq!(buf[(3, 1)].style().bg, style::WALL.bg);
        assert_eq!(buf[(15, 7)].style().bg, style::SKY.bg);
    }
}
