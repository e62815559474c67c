use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{arena_display::*, status_display::*};

mod arena_display;
mod status_display;

mod color {
    use ratatui::style::Color;

    pub const SKY: Color = Color::Rgb(20, 24, 48);
    pub const WALL: Color = Color::Rgb(60, 160, 80);
    pub const AGENT: Color = Color::Rgb(255, 200, 0);
    pub const CARRIED_OVER: Color = Color::Rgb(0, 200, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::view::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const SKY: Style = bg_only(color::SKY);
    pub const WALL: Style = bg_only(color::WALL);
    pub const AGENT: Style = fg_bg(color::SKY, color::AGENT);
    pub const CARRIED_OVER: Style = fg_bg(color::SKY, color::CARRIED_OVER);
    pub const LABEL: Style = Style::new().fg(color::GRAY);
    pub const VALUE: Style = Style::new().fg(color::WHITE);
    pub const HELP: Style = Style::new().fg(color::GRAY);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner = block.map_or(dummy_rect, |b| b.inner(dummy_rect));
    dummy_rect.height - inner.height
}
