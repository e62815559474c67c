use std::time::{Duration, Instant};

/// Multiplier applied to the base tick rate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GameSpeed {
    #[default]
    Normal,
    Double,
}

impl GameSpeed {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Double,
            Self::Double => Self::Normal,
        }
    }

    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            Self::Normal => 1.0,
            Self::Double => 2.0,
        }
    }
}

/// Simulation clock settings plus the measured tick rate.
///
/// The logical cadence of the simulation is fixed in ticks; the game speed
/// only changes how much wall time a tick takes.
#[derive(Debug)]
pub struct Pacing {
    base_rate: f64,
    speed: GameSpeed,
    meter: TickMeter,
}

impl Pacing {
    /// Creates a clock ticking `base_rate` times per second at normal speed.
    pub fn new(base_rate: f64) -> Self {
        Self {
            base_rate,
            speed: GameSpeed::Normal,
            meter: TickMeter::default(),
        }
    }

    pub fn speed(&self) -> GameSpeed {
        self.speed
    }

    /// Switches between normal and double speed.
    ///
    /// The measured rate restarts so it never mixes the two speeds.
    pub fn toggle_speed(&mut self) {
        self.speed = self.speed.toggled();
        self.meter = TickMeter::default();
    }

    /// Wall time between two ticks at the current speed.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / (self.base_rate * self.speed.factor()))
    }

    /// Ticks per second achieved over the last full measurement window.
    pub fn tick_rate(&self) -> Option<f64> {
        self.meter.rate
    }

    pub(super) fn record_tick(&mut self, now: Instant) {
        self.meter.record(now);
    }
}

/// Counts ticks over one-second windows.
#[derive(Debug, Default)]
struct TickMeter {
    window_start: Option<Instant>,
    ticks: u32,
    rate: Option<f64>,
}

impl TickMeter {
    const WINDOW: Duration = Duration::from_secs(1);

    fn record(&mut self, now: Instant) {
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            return;
        };
        self.ticks += 1;
        let elapsed = now.duration_since(start);
        if elapsed >= Self::WINDOW {
            self.rate = Some(f64::from(self.ticks) / elapsed.as_secs_f64());
            self.ticks = 0;
            self.window_start = Some(now);
        }
    }
}
