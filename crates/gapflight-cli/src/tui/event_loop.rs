use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::{Pacing, event::TuiEvent};

/// When the screen is redrawn.
#[derive(Debug, Clone, Copy)]
pub enum RenderMode {
    /// After every tick or terminal event.
    AfterChange,
    /// At a fixed frame rate, independent of the game speed.
    Fixed(Duration),
}

impl RenderMode {
    pub fn fixed_rate(fps: f64) -> Self {
        Self::Fixed(Duration::from_secs_f64(1.0 / fps))
    }
}

/// Schedules simulation ticks, redraws and terminal input.
///
/// Ticks are scheduled against absolute deadlines so the achieved rate
/// matches the requested one. A loop that falls more than one tick behind
/// drops the backlog instead of bursting.
#[derive(Debug)]
pub(super) struct EventLoop {
    pacing: Pacing,
    render_mode: RenderMode,
    next_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl EventLoop {
    pub(super) fn new(pacing: Pacing, render_mode: RenderMode) -> Self {
        let now = Instant::now();
        Self {
            pacing,
            render_mode,
            next_tick: now,
            last_render: now,
            dirty: true, // first frame
        }
    }

    pub(super) fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    pub(super) fn pacing_mut(&mut self) -> &mut Pacing {
        &mut self.pacing
    }

    /// Blocks until the next tick, redraw or terminal event is due.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if now >= self.next_tick {
                self.pacing.record_tick(now);
                self.next_tick = next_deadline(self.next_tick, self.pacing.tick_interval(), now);
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            if self.render_due(now) {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            let deadline = match self.render_mode {
                RenderMode::Fixed(interval) => self.next_tick.min(self.last_render + interval),
                RenderMode::AfterChange => self.next_tick,
            };
            if event::poll(deadline.saturating_duration_since(now))? {
                self.dirty = true;
                return Ok(event::read()?.into());
            }
        }
    }

    fn render_due(&self, now: Instant) -> bool {
        match self.render_mode {
            RenderMode::AfterChange => self.dirty,
            RenderMode::Fixed(interval) => now.duration_since(self.last_render) >= interval,
        }
    }
}

/// Deadline of the tick after one due at `due`, observed at `now`.
fn next_deadline(due: Instant, interval: Duration, now: Instant) -> Instant {
    let next = due + interval;
    if next + interval < now {
        now + interval
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_time_ticks_keep_their_cadence() {
        let start = Instant::now();
        let interval = Duration::from_millis(20);
        // a tick handled 5ms late does not push the following ones back
        let next = next_deadline(start, interval, start + Duration::from_millis(5));
        assert_eq!(next, start + interval);
    }

    #[test]
    fn test_backlog_is_dropped() {
        let start = Instant::now();
        let interval = Duration::from_millis(20);
        let now = start + Duration::from_millis(200);
        assert_eq!(next_deadline(start, interval, now), now + interval);
    }
}
