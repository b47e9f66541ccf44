use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default session length (25:00)
pub const DEFAULT_SESSION_SECS: u32 = 25 * 60;

/// Largest value the minutes field accepts
pub const MAX_MINUTES: u32 = 99;

/// Largest value the seconds field accepts
pub const MAX_SECONDS: u32 = 59;

/// Which half of the MM:SS display is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditField {
    Minutes,
    Seconds,
}

/// Observable state of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Paused,
    Running,
    Editing(EditField),
}

/// Emitted by `tick` when a running session reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Completed,
}

/// Result of a start/pause request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunToggle {
    Started,
    Paused,
    /// Nothing left on the clock; reset or edit first
    Ignored,
}

/// Countdown state for one focus session.
///
/// Invariants: `time_left <= session_total`, and the timer never runs while a
/// field is being edited. The completion flag makes expiry edge-triggered: it
/// fires once when a running session hits zero and rearms only once
/// `time_left` is above zero again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSession {
    session_total: u32,
    time_left: u32,
    is_active: bool,
    editing: Option<EditField>,
    edit_buffer: String,
    completion_fired: bool,
}

impl Default for TimerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerSession {
    pub fn new() -> Self {
        Self {
            session_total: DEFAULT_SESSION_SECS,
            time_left: DEFAULT_SESSION_SECS,
            is_active: false,
            editing: None,
            edit_buffer: String::new(),
            completion_fired: false,
        }
    }

    pub fn session_total(&self) -> u32 {
        self.session_total
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn editing(&self) -> Option<EditField> {
        self.editing
    }

    pub fn edit_buffer(&self) -> &str {
        &self.edit_buffer
    }

    pub fn phase(&self) -> TimerPhase {
        match (self.editing, self.is_active) {
            (Some(field), _) => TimerPhase::Editing(field),
            (None, true) => TimerPhase::Running,
            (None, false) => TimerPhase::Paused,
        }
    }

    /// Minutes part of the remaining time
    pub fn minutes(&self) -> u32 {
        self.time_left / 60
    }

    /// Seconds part of the remaining time
    pub fn seconds(&self) -> u32 {
        self.time_left % 60
    }

    /// Remaining time as "MM:SS"
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.minutes(), self.seconds())
    }

    /// Seconds counted down since the last edit or reset
    pub fn elapsed(&self) -> u32 {
        self.session_total - self.time_left
    }

    /// Fraction of the session already spent, clamped to [0, 1]
    pub fn progress(&self) -> f64 {
        if self.session_total == 0 {
            return 0.0;
        }
        (self.elapsed() as f64 / self.session_total as f64).clamp(0.0, 1.0)
    }

    /// Whether the tick source should be armed
    pub fn wants_ticks(&self) -> bool {
        self.is_active && self.time_left > 0
    }

    /// Count down one second. Only has an effect while running with time left.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.wants_ticks() {
            return None;
        }

        self.time_left -= 1;
        if self.time_left > 0 {
            return None;
        }

        self.is_active = false;
        if self.completion_fired {
            return None;
        }
        self.completion_fired = true;
        info!(session_total = self.session_total, "focus session complete");
        Some(TimerEvent::Completed)
    }

    /// Start or pause. Starting while editing drops the unsaved edit first.
    pub fn toggle_run(&mut self) -> RunToggle {
        if self.time_left == 0 {
            return RunToggle::Ignored;
        }

        if self.is_active {
            self.is_active = false;
            RunToggle::Paused
        } else {
            self.cancel_edit();
            self.is_active = true;
            RunToggle::Started
        }
    }

    /// Enter edit mode for one field; pauses a running session
    pub fn start_edit(&mut self, field: EditField) {
        self.is_active = false;
        self.editing = Some(field);
        self.edit_buffer.clear();
    }

    /// Append a typed character to the edit buffer
    pub fn push_edit_char(&mut self, c: char) {
        if self.editing.is_some() && !c.is_control() {
            self.edit_buffer.push(c);
        }
    }

    pub fn pop_edit_char(&mut self) {
        if self.editing.is_some() {
            self.edit_buffer.pop();
        }
    }

    /// Commit the typed buffer to the field being edited
    pub fn commit_buffer(&mut self) -> bool {
        let raw = std::mem::take(&mut self.edit_buffer);
        self.commit_edit(&raw)
    }

    /// Set the edited field to `raw` and restart the session from the new length.
    ///
    /// The other field keeps its currently displayed value. Unparseable input
    /// counts as 0; minutes clamp to 0..=99 and seconds to 0..=59.
    pub fn commit_edit(&mut self, raw: &str) -> bool {
        let Some(field) = self.editing else {
            return false;
        };

        let value = parse_edit_value(raw).min(MAX_MINUTES);
        let (mut minutes, mut seconds) = (self.minutes(), self.seconds());
        match field {
            EditField::Minutes => minutes = value,
            EditField::Seconds => seconds = value.min(MAX_SECONDS),
        }

        let total = minutes * 60 + seconds;
        debug!(?field, raw, total, "timer edit committed");
        self.set_session(total);
        self.editing = None;
        self.edit_buffer.clear();
        true
    }

    /// Leave edit mode without changing the session
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.edit_buffer.clear();
    }

    /// Back to a paused 25:00 session
    pub fn reset(&mut self) {
        self.is_active = false;
        self.cancel_edit();
        self.set_session(DEFAULT_SESSION_SECS);
    }

    fn set_session(&mut self, total: u32) {
        self.session_total = total;
        self.time_left = total;
        if total > 0 {
            self.completion_fired = false;
        }
    }
}

/// Parse the leading run of ASCII digits; anything else reads as 0.
/// Saturates instead of overflowing so huge inputs still clamp.
pub fn parse_edit_value(raw: &str) -> u32 {
    raw.trim()
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_of(minutes: u32, seconds: u32) -> TimerSession {
        let mut timer = TimerSession::new();
        timer.start_edit(EditField::Minutes);
        timer.commit_edit(&minutes.to_string());
        timer.start_edit(EditField::Seconds);
        timer.commit_edit(&seconds.to_string());
        timer
    }

    #[test]
    fn test_new_session_is_paused_default() {
        let timer = TimerSession::new();
        assert_eq!(timer.session_total(), 1500);
        assert_eq!(timer.time_left(), 1500);
        assert_eq!(timer.phase(), TimerPhase::Paused);
        assert_eq!(timer.display(), "25:00");
    }

    #[test]
    fn test_tick_requires_running() {
        let mut timer = TimerSession::new();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.time_left(), 1500);
    }

    #[test]
    fn test_ticks_count_down_monotonically() {
        let mut timer = TimerSession::new();
        timer.toggle_run();

        let mut previous = timer.time_left();
        for n in 1..=90 {
            timer.tick();
            assert!(timer.time_left() < previous);
            assert_eq!(timer.elapsed(), n);
            previous = timer.time_left();
        }
        assert_eq!(timer.display(), "23:30");
    }

    #[test]
    fn test_completion_fires_exactly_once() {
        let mut timer = session_of(0, 3);
        assert_eq!(timer.toggle_run(), RunToggle::Started);

        assert_eq!(timer.tick(), None);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.tick(), Some(TimerEvent::Completed));
        assert_eq!(timer.time_left(), 0);
        assert!(!timer.is_active());

        // Sitting at zero never fires again or goes negative
        for _ in 0..5 {
            assert_eq!(timer.tick(), None);
        }
        assert_eq!(timer.time_left(), 0);
        assert_eq!(timer.toggle_run(), RunToggle::Ignored);
        assert!(!timer.is_active());
    }

    #[test]
    fn test_completion_rearms_after_reset() {
        let mut timer = session_of(0, 1);
        timer.toggle_run();
        assert_eq!(timer.tick(), Some(TimerEvent::Completed));

        timer.reset();
        assert_eq!(timer.time_left(), DEFAULT_SESSION_SECS);
        timer.toggle_run();
        for _ in 0..DEFAULT_SESSION_SECS - 1 {
            assert_eq!(timer.tick(), None);
        }
        assert_eq!(timer.tick(), Some(TimerEvent::Completed));
    }

    #[test]
    fn test_completion_rearms_after_edit() {
        let mut timer = session_of(0, 1);
        timer.toggle_run();
        assert_eq!(timer.tick(), Some(TimerEvent::Completed));

        timer.start_edit(EditField::Seconds);
        timer.commit_edit("2");
        timer.toggle_run();
        timer.tick();
        assert_eq!(timer.tick(), Some(TimerEvent::Completed));
    }

    #[test]
    fn test_editing_to_zero_does_not_fire() {
        let mut timer = TimerSession::new();
        timer.start_edit(EditField::Minutes);
        timer.commit_edit("0");
        assert_eq!(timer.time_left(), 0);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.toggle_run(), RunToggle::Ignored);
    }

    #[test]
    fn test_start_edit_pauses() {
        let mut timer = TimerSession::new();
        timer.toggle_run();
        timer.start_edit(EditField::Minutes);

        assert!(!timer.is_active());
        assert_eq!(timer.phase(), TimerPhase::Editing(EditField::Minutes));
        assert_eq!(timer.edit_buffer(), "");
        assert_eq!(timer.tick(), None);
    }

    #[test]
    fn test_commit_clamps_minutes() {
        let mut timer = TimerSession::new();
        timer.start_edit(EditField::Minutes);
        timer.commit_edit("150");
        assert_eq!(timer.minutes(), 99);
        assert_eq!(timer.session_total(), 99 * 60);
    }

    #[test]
    fn test_commit_clamps_seconds() {
        let mut timer = TimerSession::new();
        timer.start_edit(EditField::Seconds);
        timer.commit_edit("75");
        assert_eq!(timer.seconds(), 59);
        assert_eq!(timer.session_total(), 25 * 60 + 59);
    }

    #[test]
    fn test_commit_empty_or_malformed_is_zero() {
        let mut timer = TimerSession::new();
        timer.start_edit(EditField::Seconds);
        timer.commit_edit("30");
        timer.start_edit(EditField::Minutes);
        timer.commit_edit("");
        assert_eq!(timer.time_left(), 30);

        timer.start_edit(EditField::Seconds);
        timer.commit_edit("abc");
        assert_eq!(timer.time_left(), 0);
    }

    #[test]
    fn test_commit_seconds_keeps_minutes() {
        let mut timer = session_of(10, 0);
        timer.start_edit(EditField::Seconds);
        timer.push_edit_char('5');
        assert!(timer.commit_buffer());

        assert_eq!(timer.session_total(), 605);
        assert_eq!(timer.time_left(), 605);
        assert_eq!(timer.editing(), None);
    }

    #[test]
    fn test_commit_uses_displayed_time_not_total() {
        let mut timer = session_of(10, 0);
        timer.toggle_run();
        for _ in 0..15 {
            timer.tick();
        }
        // 09:45 on the clock; edit minutes only
        timer.start_edit(EditField::Minutes);
        timer.commit_edit("20");
        assert_eq!(timer.time_left(), 20 * 60 + 45);
    }

    #[test]
    fn test_commit_without_edit_mode_is_noop() {
        let mut timer = TimerSession::new();
        assert!(!timer.commit_edit("5"));
        assert_eq!(timer.time_left(), DEFAULT_SESSION_SECS);
    }

    #[test]
    fn test_toggle_run_while_editing_discards_buffer() {
        let mut timer = TimerSession::new();
        timer.start_edit(EditField::Minutes);
        timer.push_edit_char('9');

        assert_eq!(timer.toggle_run(), RunToggle::Started);
        assert_eq!(timer.editing(), None);
        assert_eq!(timer.session_total(), DEFAULT_SESSION_SECS);
        assert_eq!(timer.phase(), TimerPhase::Running);
    }

    #[test]
    fn test_progress() {
        let mut timer = session_of(0, 4);
        assert_eq!(timer.progress(), 0.0);
        timer.toggle_run();
        timer.tick();
        assert_eq!(timer.progress(), 0.25);

        let mut zero = TimerSession::new();
        zero.start_edit(EditField::Minutes);
        zero.commit_edit("0");
        assert_eq!(zero.progress(), 0.0);
    }

    #[test]
    fn test_parse_edit_value() {
        assert_eq!(parse_edit_value(" 12 "), 12);
        assert_eq!(parse_edit_value("12abc"), 12);
        assert_eq!(parse_edit_value("-5"), 0);
        assert_eq!(parse_edit_value(""), 0);
        assert_eq!(parse_edit_value("99999999999999"), u32::MAX);
    }
}
