use crate::tui::{
    App, Pacing, RenderMode,
    event::TuiEvent,
    event_loop::EventLoop,
};

/// Runs an [`App`] on the terminal.
#[derive(Debug)]
pub struct Tui {
    events: EventLoop,
}

impl Tui {
    /// Creates a runtime ticking `tick_rate` times per second at normal speed.
    pub fn new(tick_rate: f64, render_mode: RenderMode) -> Self {
        Self {
            events: EventLoop::new(Pacing::new(tick_rate), render_mode),
        }
    }

    /// Runs `app` until [`App::should_exit`] returns `true`.
    ///
    /// The terminal is restored on return, including on error.
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => app.update(),
                    TuiEvent::Render => {
                        let pacing = self.events.pacing();
                        terminal.draw(|f| app.draw(f, pacing))?;
                    }
                    TuiEvent::Terminal(event) => app.handle_event(self.events.pacing_mut(), event),
                }
            }
            Ok(())
        })
    }
}
