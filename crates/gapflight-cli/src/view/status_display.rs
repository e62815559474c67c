use gapflight_engine::Scene;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt as _, Paragraph, Widget},
};

use crate::view::style;

/// Side panel with the run's counters.
pub struct StatusDisplay<'a> {
    scene: &'a Scene,
    tick_rate: Option<f64>,
    attempts: Option<u32>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatusDisplay<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            tick_rate: None,
            attempts: None,
            block: None,
        }
    }

    /// Shows the measured ticks per second.
    pub fn tick_rate(self, tick_rate: Option<f64>) -> Self {
        Self { tick_rate, ..self }
    }

    pub fn attempts(self, attempts: u32) -> Self {
        Self {
            attempts: Some(attempts),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.lines().len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut rows = vec![("MODE:", self.scene.mode.to_string())];
        if let Some(generation) = self.scene.generation {
            rows.push(("GENERATION:", generation.to_string()));
            rows.push(("ALIVE:", self.scene.alive.to_string()));
        }
        if let Some(attempts) = self.attempts {
            rows.push(("ATTEMPT:", attempts.to_string()));
        }
        rows.push(("SCORE:", self.scene.score.to_string()));
        rows.push(("HIGH SCORE:", self.scene.high_score.to_string()));
        if let Some(rate) = self.tick_rate {
            rows.push(("TICKS/S:", format!("{rate:.1}")));
        }

        rows.into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label:<12}"), style::LABEL),
                    Span::styled(value, style::VALUE),
                ])
            })
            .collect()
    }
}

impl Widget for StatusDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        Paragraph::new(self.lines()).render(area, buf);
    }
}
