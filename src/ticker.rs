use std::time::{Duration, Instant};

/// How long the event loop waits for input before redrawing
pub const UI_POLL_MS: u64 = 250;

/// Countdown resolution
pub const TIMER_TICK: Duration = Duration::from_secs(1);

pub fn ui_poll_duration() -> Duration {
    Duration::from_millis(UI_POLL_MS)
}

/// The one-second tick source for the focus timer.
///
/// Holds at most one pending deadline. Arming an armed ticker keeps the
/// existing deadline, and disarming drops it at once.
#[derive(Debug, Default)]
pub struct Ticker {
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm or disarm to match whether the timer wants ticks
    pub fn sync(&mut self, should_run: bool, now: Instant) {
        match (should_run, self.next_due) {
            (true, None) => self.next_due = Some(now + TIMER_TICK),
            (false, Some(_)) => self.next_due = None,
            _ => {}
        }
    }

    /// Number of whole ticks elapsed by `now`; consumes them
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        let mut ticks = 0;
        while due <= now {
            ticks += 1;
            due += TIMER_TICK;
        }
        self.next_due = Some(due);
        ticks
    }

    /// How long the loop may block before the next tick or redraw
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let ui = ui_poll_duration();
        match self.next_due {
            Some(due) => ui.min(due.saturating_duration_since(now)),
            None => ui,
        }
    }
}
