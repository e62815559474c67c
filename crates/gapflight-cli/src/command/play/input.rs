use gapflight_engine::{Control, Mode};

/// Vertical direction requested by a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Turns key presses into one [`Control`] per tick.
///
/// Terminals report presses and auto-repeats but usually not releases, so
/// a held key is emulated: each press keeps its direction active for
/// [`Self::HOLD_TICKS`] ticks, long enough to bridge the gap between key
/// repeats. A reported release ends the hold immediately.
#[derive(Debug)]
pub struct KeyboardInput {
    mode: Mode,
    flap_pending: bool,
    held: Option<Direction>,
    hold_left: u32,
}

impl KeyboardInput {
    pub const HOLD_TICKS: u32 = 12;

    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            flap_pending: false,
            held: None,
            hold_left: 0,
        }
    }

    pub fn press(&mut self, direction: Direction) {
        if self.mode == Mode::Gravity {
            self.flap_pending |= direction == Direction::Up;
            return;
        }
        self.held = Some(direction);
        self.hold_left = Self::HOLD_TICKS;
    }

    pub fn release(&mut self, direction: Direction) {
        if self.held == Some(direction) {
            self.held = None;
            self.hold_left = 0;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new(self.mode);
    }

    /// Control for the next tick.
    pub fn next_control(&mut self) -> Control {
        let control = match (self.mode, self.held) {
            (Mode::Gravity, _) if self.flap_pending => Control::Flap,
            (Mode::Helicopter, Some(Direction::Up)) => Control::Up,
            (Mode::Helicopter, Some(Direction::Down)) => Control::Down,
            (Mode::Thrust, Some(Direction::Up)) => Control::Axis(1.0),
            (Mode::Thrust, Some(Direction::Down)) => Control::Axis(-1.0),
            _ => Control::None,
        };
        self.flap_pending = false;
        self.hold_left = self.hold_left.saturating_sub(1);
        if self.hold_left == 0 {
            self.held = None;
        }
        control
    }
}
