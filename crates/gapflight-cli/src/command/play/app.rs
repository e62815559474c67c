use crossterm::event::{Event, KeyCode, KeyEventKind};
use gapflight_engine::{CourseParams, Mode, PlayEvent, PlaySession};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Text,
    widgets::Block as BlockWidget,
};
use tracing::info;

use crate::{
    command::play::input::{Direction, KeyboardInput},
    tui::{App, Pacing},
    view::{ArenaDisplay, StatusDisplay, style},
};

#[derive(Debug)]
pub struct PlayApp {
    session: PlaySession,
    input: KeyboardInput,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(mode: Mode, params: CourseParams) -> Self {
        Self {
            session: PlaySession::new(mode, params),
            input: KeyboardInput::new(mode),
            is_exiting: false,
        }
    }

    pub fn high_score(&self) -> u32 {
        self.session.high_score()
    }

    pub fn attempts(&self) -> u32 {
        self.session.attempts()
    }
}

impl App for PlayApp {
    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _pacing: &mut Pacing, event: Event) {
        let Some(event) = event.as_key_event() else {
            return;
        };
        let direction = match event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.is_exiting = true;
                return;
            }
            KeyCode::Up | KeyCode::Char(' ' | 'w' | 'k') => Direction::Up,
            KeyCode::Down | KeyCode::Char('s' | 'j') => Direction::Down,
            _ => return,
        };
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.input.press(direction),
            KeyEventKind::Release => self.input.release(direction),
        }
    }

    fn draw(&self, frame: &mut Frame, _pacing: &Pacing) {
        let scene = self.session.scene();
        let status = StatusDisplay::new(&scene)
            .attempts(self.session.attempts())
            .block(BlockWidget::bordered().title("STATUS"));
        let help = Text::from("↑/Space (Up) | ↓ (Down) | q/Esc (Quit)")
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
        let control = self.input.next_control();
        if let PlayEvent::Crashed { score } = self.session.tick(control) {
            info!(
                score,
                high_score = self.session.high_score(),
                attempt = self.session.attempts(),
                "crashed"
            );
            self.input.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        let mut event = KeyEvent::new(code, KeyModifiers::NONE);
        event.kind = kind;
        Event::Key(event)
    }

    #[test]
    fn test_keys_leave_the_clock_alone() {
        let mut app = PlayApp::new(Mode::Helicopter, CourseParams::default());
        let mut pacing = Pacing::new(50.0);
        app.handle_event(&mut pacing, key(KeyCode::Char('d'), KeyEventKind::Press));
        app.handle_event(&mut pacing, key(KeyCode::Up, KeyEventKind::Press));
        assert_eq!(pacing.tick_interval(), Pacing::new(50.0).tick_interval());
        assert!(!app.should_exit());

        app.handle_event(&mut pacing, key(KeyCode::Esc, KeyEventKind::Press));
        assert!(app.should_exit());
    }

    #[test]
    fn test_update_advances_the_session() {
        let mut app = PlayApp::new(Mode::Helicopter, CourseParams::default());
        app.update();
        app.update();
        assert_eq!(app.session.scene().camera, 16);
    }
}
