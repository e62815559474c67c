use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Pacing;

/// A terminal front end driven by [`Tui::run`](crate::tui::Tui::run).
pub trait App {
    fn should_exit(&self) -> bool;

    /// Handles key input, resize and other terminal events.
    ///
    /// `pacing` may be changed here, e.g. to switch the game speed.
    fn handle_event(&mut self, pacing: &mut Pacing, event: Event);

    fn draw(&self, frame: &mut Frame, pacing: &Pacing);

    /// Advances the simulation by one tick.
    fn update(&mut self);
}
