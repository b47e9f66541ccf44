use super::timer::{EditField, RunToggle, TimerEvent, TimerSession};
use crate::domain::Task;
use serde::Serialize;
use tracing::info;

/// Title shown in the flow HUD when no open task exists
pub const UNFOCUSED_TITLE: &str = "Deep work";

/// Immersive single-task view state.
///
/// `focal_task` is a copy taken when the flow starts, not a lookup into the
/// live snapshot, so reloads during the session cannot change it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowState {
    flow_mode: bool,
    focal_task: Option<Task>,
}

impl FlowState {
    pub fn is_active(&self) -> bool {
        self.flow_mode
    }

    pub fn focal_task(&self) -> Option<&Task> {
        self.focal_task.as_ref()
    }

    /// Enter flow bound to the head of the active list
    pub fn enter(&mut self, active: &[&Task]) {
        self.focal_task = active.first().map(|t| (*t).clone());
        self.flow_mode = true;
        info!(
            focal = ?self.focal_task.as_ref().map(|t| t.id),
            "entered flow mode"
        );
    }

    pub fn exit(&mut self) {
        if self.flow_mode {
            info!("left flow mode");
        }
        self.flow_mode = false;
        self.focal_task = None;
    }
}

/// Advisory "up next" entry, read live from the current active list
pub fn next_task<'a>(active: &[&'a Task]) -> Option<&'a Task> {
    active.get(1).copied()
}

/// Focus timer plus the flow session bound to it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowSession {
    timer: TimerSession,
    flow: FlowState,
}

impl FlowSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timer(&self) -> &TimerSession {
        &self.timer
    }

    pub fn flow(&self) -> &FlowState {
        &self.flow
    }

    /// Start or pause. Starting from paused enters flow on the head of `active`.
    pub fn toggle_run(&mut self, active: &[&Task]) -> RunToggle {
        let outcome = self.timer.toggle_run();
        if outcome == RunToggle::Started {
            self.flow.enter(active);
        }
        outcome
    }

    pub fn tick(&mut self) -> Option<TimerEvent> {
        self.timer.tick()
    }

    pub fn start_edit(&mut self, field: EditField) {
        self.timer.start_edit(field);
    }

    pub fn push_edit_char(&mut self, c: char) {
        self.timer.push_edit_char(c);
    }

    pub fn pop_edit_char(&mut self) {
        self.timer.pop_edit_char();
    }

    pub fn commit_edit(&mut self) -> bool {
        self.timer.commit_buffer()
    }

    pub fn cancel_edit(&mut self) {
        self.timer.cancel_edit();
    }

    /// Reset the timer to 25:00 and leave flow
    pub fn reset(&mut self) {
        self.timer.reset();
        self.flow.exit();
    }

    pub fn exit_flow(&mut self) {
        self.flow.exit();
    }

    pub fn progress(&self) -> f64 {
        self.timer.progress()
    }

    /// Name shown in the flow HUD
    pub fn focal_title(&self) -> &str {
        self.flow
            .focal_task()
            .map(|t| t.name.as_str())
            .unwrap_or(UNFOCUSED_TITLE)
    }
}
