use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// The simulation clock is due.
    Tick,
    /// The screen is due for a redraw.
    Render,
    Terminal(CrosstermEvent),
}
