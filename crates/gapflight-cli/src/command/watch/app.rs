use crossterm::event::{Event, KeyCode};
use gapflight_training::Trainer;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Text,
    widgets::Block as BlockWidget,
};

use crate::{
    tui::{App, GameSpeed, Pacing},
    view::{ArenaDisplay, StatusDisplay, style},
};

#[derive(Debug)]
pub struct WatchApp {
    trainer: Trainer,
    show_single: bool,
    show_tick_rate: bool,
    error: Option<anyhow::Error>,
    is_exiting: bool,
}

impl WatchApp {
    pub fn new(trainer: Trainer) -> Self {
        Self {
            trainer,
            show_single: false,
            show_tick_rate: false,
            error: None,
            is_exiting: false,
        }
    }

    /// Returns the error that stopped training, if any.
    pub fn finish(self) -> anyhow::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => {
                eprintln!(
                    "Stopped at generation {} (high score {})",
                    self.trainer.generation(),
                    self.trainer.high_score()
                );
                Ok(())
            }
        }
    }
}

impl App for WatchApp {
    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, pacing: &mut Pacing, event: Event) {
        let Some(event) = event.as_key_press_event() else {
            return;
        };
        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
            KeyCode::Char('d') => pacing.toggle_speed(),
            KeyCode::Char('s') => self.show_single = !self.show_single,
            KeyCode::Char('f') => self.show_tick_rate = !self.show_tick_rate,
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame, pacing: &Pacing) {
        let scene = self.trainer.scene(self.show_single);
        let status = StatusDisplay::new(&scene)
            .tick_rate(pacing.tick_rate().filter(|_| self.show_tick_rate))
            .block(BlockWidget::bordered().title("STATUS"));
        let speed = match pacing.speed() {
            GameSpeed::Normal => "d (2x Speed)",
            GameSpeed::Double => "d (1x Speed)",
        };
        let help = Text::from(format!(
            "q/Esc (Quit) | {speed} | s (Single Agent) | f (Tick Rate)"
        ))
            .style(style::HELP)
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
        let [arena_area, status_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(26)]).areas(main_area);
        let [status_area, _] =
            Layout::vertical([Constraint::Length(status.height()), Constraint::Min(0)])
                .areas(status_area);

        frame.render_widget(
            ArenaDisplay::new(&scene).block(BlockWidget::bordered().title("GAPFLIGHT")),
            arena_area,
        );
        frame.render_widget(status, status_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self) {
        if let Err(err) = self.trainer.tick() {
            self.error = Some(err.into());
            self.is_exiting = true;
        }
    }
}
