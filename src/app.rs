use crate::api::{ApiEvent, ApiJob, Mutation, MutationError};
use crate::assistant::{Conversation, VoiceError, VoiceInput, VoiceSession};
use crate::domain::{active_ordered, iso_date, project, NewTask, Tab, Task, TaskStore, UiMode};
use crate::focus::{EditField, FlowSession, RunToggle, TimerEvent};
use crate::timetable::{resolve_day, slot_grid, solidify_mutation, GhostFeed};
use chrono::{Duration, NaiveDate};
use std::time::{Duration as StdDuration, Instant};
use tracing::{debug, info, warn};

/// How long a notice stays in the status line
pub const NOTICE_TTL: StdDuration = StdDuration::from_secs(5);

/// Shown under the command bar when the server gives no reason
pub const COMMAND_FALLBACK_ERROR: &str = "Could not parse that";

/// Side effects the event loop performs on behalf of the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    NotifySessionComplete,
    Speak(String),
    /// Run the recognizer for this session
    Listen(VoiceSession),
    /// Kill the running recognizer
    StopListening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Non-blocking status message
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub shown_at: Instant,
}

/// Natural-language command input (Ctrl+K)
#[derive(Debug, Clone, Default)]
pub struct CommandBar {
    pub text: String,
    /// Server explanation of the last rejected command
    pub error: Option<String>,
    /// Reload sequence of the command in flight
    pending: Option<u64>,
}

impl CommandBar {
    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }
}

/// Settings the state needs from the config
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    pub notifications: bool,
    pub speak_responses: bool,
    pub voice_available: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            notifications: true,
            speak_responses: true,
            voice_available: false,
        }
    }
}

/// Main application state.
///
/// Every change goes through the methods below. Network work and other side
/// effects are queued as jobs and effects for the event loop to drain, so
/// nothing here blocks or touches the terminal.
pub struct AppState {
    pub store: TaskStore,
    pub tab: Tab,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub today: NaiveDate,
    pub selected_date: NaiveDate,

    pub focus: FlowSession,

    pub timetable_expanded: bool,
    pub slot_cursor: usize,
    pub ghosts: GhostFeed,

    pub command_bar: CommandBar,
    pub quick_add: String,
    quick_add_pending: Option<u64>,
    pub conversation: Conversation,
    pub voice: VoiceInput,

    pub notice: Option<Notice>,
    /// Requests sent to the worker that have not answered yet
    pub in_flight: usize,
    options: AppOptions,
    jobs: Vec<ApiJob>,
    effects: Vec<Effect>,
}

impl AppState {
    pub fn new(options: AppOptions, today: NaiveDate) -> Self {
        Self {
            store: TaskStore::new(),
            tab: Tab::Inbox,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            today,
            selected_date: today,
            focus: FlowSession::new(),
            timetable_expanded: false,
            slot_cursor: 0,
            ghosts: GhostFeed::new(),
            command_bar: CommandBar::default(),
            quick_add: String::new(),
            quick_add_pending: None,
            conversation: Conversation::new(options.speak_responses),
            voice: VoiceInput::new(options.voice_available),
            notice: None,
            in_flight: 0,
            options,
            jobs: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Jobs queued since the last call
    pub fn take_jobs(&mut self) -> Vec<ApiJob> {
        self.in_flight += self.jobs.len();
        std::mem::take(&mut self.jobs)
    }

    /// Effects queued since the last call
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    fn submit(&mut self, job: ApiJob) {
        self.jobs.push(job);
    }

    /// Fetch the task list from scratch
    pub fn request_reload(&mut self) {
        let seq = self.store.begin_reload();
        self.submit(ApiJob::Reload { seq });
    }

    /// Queue a mutation; the worker reloads after it
    fn submit_mutation(&mut self, mutation: Mutation) -> u64 {
        let seq = self.store.begin_reload();
        debug!(seq, op = mutation.label(), "queueing mutation");
        self.submit(ApiJob::Mutate { seq, mutation });
        seq
    }

    // ---- notices ----

    pub fn set_notice(&mut self, message: impl Into<String>, level: NoticeLevel) {
        self.notice = Some(Notice {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        });
    }

    pub fn expire_notice(&mut self, now: Instant) {
        let expired = self
            .notice
            .as_ref()
            .is_some_and(|n| now.duration_since(n.shown_at) >= NOTICE_TTL);
        if expired {
            self.notice = None;
        }
    }

    // ---- task list ----

    pub fn today_iso(&self) -> String {
        iso_date(self.today)
    }

    pub fn selected_date_iso(&self) -> String {
        iso_date(self.selected_date)
    }

    /// Tasks in the current tab, snapshot order
    pub fn visible_tasks(&self) -> Vec<&Task> {
        project(self.store.tasks(), self.tab, &self.today_iso())
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.selected_index).copied()
    }

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let len = self.visible_tasks().len();
        if self.selected_index + 1 < len {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    pub fn set_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.selected_index = 0;
        }
    }

    pub fn next_tab(&mut self) {
        self.set_tab(self.tab.next());
    }

    /// Mark the selected task done; done tasks are left alone
    pub fn complete_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if !task.is_open() {
            return;
        }
        let id = task.id;
        self.submit_mutation(Mutation::Complete(id));
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id) {
            self.submit_mutation(Mutation::Delete(id));
        }
    }

    // ---- quick add ----

    /// Whether a quick-add request is in flight
    pub fn quick_add_submitting(&self) -> bool {
        self.quick_add_pending.is_some()
    }

    pub fn start_quick_add(&mut self) {
        self.quick_add.clear();
        self.ui_mode = UiMode::QuickAdd;
    }

    pub fn quick_add_push(&mut self, c: char) {
        self.quick_add.push(c);
    }

    pub fn quick_add_pop(&mut self) {
        self.quick_add.pop();
    }

    /// Create a task due on the selected date. Blank titles do nothing.
    /// The title stays in the form until the server accepts it.
    pub fn submit_quick_add(&mut self) {
        let title = self.quick_add.trim().to_string();
        if title.is_empty() || self.quick_add_submitting() {
            return;
        }
        let seq = self.submit_mutation(Mutation::Create(NewTask::quick(&title, self.selected_date)));
        self.quick_add_pending = Some(seq);
    }

    // ---- command bar ----

    pub fn open_command_bar(&mut self) {
        self.focus.cancel_edit();
        self.command_bar.error = None;
        self.ui_mode = UiMode::CommandBar;
    }

    pub fn command_push(&mut self, c: char) {
        self.command_bar.text.push(c);
    }

    pub fn command_pop(&mut self) {
        self.command_bar.text.pop();
    }

    pub fn submit_command(&mut self) {
        let text = self.command_bar.text.trim().to_string();
        if text.is_empty() || self.command_bar.is_submitting() {
            return;
        }
        self.command_bar.error = None;
        let seq = self.submit_mutation(Mutation::Command(text));
        self.command_bar.pending = Some(seq);
    }

    // ---- dates and timetable ----

    pub fn previous_day(&mut self) {
        self.set_selected_date(self.selected_date - Duration::days(1));
    }

    pub fn next_day(&mut self) {
        self.set_selected_date(self.selected_date + Duration::days(1));
    }

    pub fn jump_to_today(&mut self) {
        self.set_selected_date(self.today);
    }

    fn set_selected_date(&mut self, date: NaiveDate) {
        if self.selected_date == date {
            return;
        }
        self.selected_date = date;
        self.refresh_ghosts();
    }

    /// Follow the wall clock across midnight
    pub fn sync_today(&mut self, today: NaiveDate) {
        if self.today != today {
            info!(from = %self.today, to = %today, "day changed");
            self.today = today;
            self.clamp_selection();
        }
    }

    pub fn toggle_timetable(&mut self) {
        self.timetable_expanded = !self.timetable_expanded;
        if self.timetable_expanded {
            self.refresh_ghosts();
        } else {
            self.ghosts.clear();
        }
    }

    /// Refetch ghosts for the selected date; collapsed timetables never fetch
    fn refresh_ghosts(&mut self) {
        if !self.timetable_expanded {
            return;
        }
        let ticket = self.ghosts.begin_fetch(self.selected_date);
        self.submit(ApiJob::FetchGhosts { ticket });
    }

    pub fn move_slot_cursor_up(&mut self) {
        self.slot_cursor = self.slot_cursor.saturating_sub(1);
    }

    pub fn move_slot_cursor_down(&mut self) {
        if self.slot_cursor + 1 < slot_grid().len() {
            self.slot_cursor += 1;
        }
    }

    /// Book the ghost under the slot cursor, if that slot shows one
    pub fn solidify_at_cursor(&mut self) {
        if !self.timetable_expanded {
            return;
        }

        let date_iso = self.selected_date_iso();
        let ghost = {
            let ghosts = self.ghosts.suggestions_for(self.selected_date);
            let slots = resolve_day(self.store.tasks(), ghosts, &date_iso);
            slots
                .get(self.slot_cursor)
                .and_then(|slot| slot.ghost())
                .cloned()
        };

        if let Some(ghost) = ghost {
            info!(task_id = ghost.task_id, time = %ghost.suggested_time, "booking ghost slot");
            self.submit_mutation(solidify_mutation(&ghost, self.selected_date));
        }
    }

    // ---- focus timer ----

    pub fn toggle_timer(&mut self) {
        let active = active_ordered(self.store.tasks());
        let outcome = self.focus.toggle_run(&active);
        if self.ui_mode == UiMode::EditingTimer {
            self.ui_mode = UiMode::Normal;
        }
        if outcome == RunToggle::Ignored {
            self.set_notice(
                "Nothing left on the clock. Reset or edit the timer.",
                NoticeLevel::Info,
            );
        }
    }

    pub fn reset_timer(&mut self) {
        self.focus.reset();
        if self.ui_mode == UiMode::EditingTimer {
            self.ui_mode = UiMode::Normal;
        }
    }

    pub fn start_timer_edit(&mut self, field: EditField) {
        self.focus.start_edit(field);
        self.ui_mode = UiMode::EditingTimer;
    }

    pub fn timer_edit_push(&mut self, c: char) {
        self.focus.push_edit_char(c);
    }

    pub fn timer_edit_pop(&mut self) {
        self.focus.pop_edit_char();
    }

    pub fn commit_timer_edit(&mut self) {
        self.focus.commit_edit();
        self.ui_mode = UiMode::Normal;
    }

    pub fn exit_flow(&mut self) {
        self.focus.exit_flow();
    }

    /// Whether the one-second tick source should be armed
    pub fn wants_ticks(&self) -> bool {
        self.focus.timer().wants_ticks()
    }

    /// One second of countdown
    pub fn on_timer_tick(&mut self) {
        if self.focus.tick() == Some(TimerEvent::Completed) {
            self.set_notice("Session complete", NoticeLevel::Info);
            if self.options.notifications {
                self.effects.push(Effect::NotifySessionComplete);
            }
        }
    }

    // ---- assistant ----

    pub fn open_assistant(&mut self) {
        self.ui_mode = UiMode::Assistant;
    }

    pub fn assistant_push(&mut self, c: char) {
        self.conversation.push_char(c);
    }

    pub fn assistant_pop(&mut self) {
        self.conversation.pop_char();
    }

    pub fn send_chat(&mut self) {
        if let Some(message) = self.conversation.begin_send() {
            self.submit(ApiJob::Chat { message });
        }
    }

    pub fn toggle_speech(&mut self) {
        let on = self.conversation.toggle_speech();
        self.set_notice(
            if on { "Voice replies on" } else { "Voice replies muted" },
            NoticeLevel::Info,
        );
    }

    /// Start listening, or stop the live session
    pub fn toggle_voice(&mut self) {
        if self.voice.is_listening() {
            self.stop_voice();
            return;
        }
        match self.voice.start() {
            Ok(session) => self.effects.push(Effect::Listen(session)),
            Err(VoiceError::Busy) => {}
            Err(e @ VoiceError::Unsupported) => {
                self.set_notice(e.to_string(), NoticeLevel::Info)
            }
        }
    }

    fn stop_voice(&mut self) {
        if self.voice.is_listening() {
            self.voice.stop();
            self.effects.push(Effect::StopListening);
        }
    }

    pub fn on_voice_result(&mut self, session: VoiceSession, result: Result<String, String>) {
        if let Some(transcript) = self.voice.finish(session, result) {
            self.conversation.set_input(&transcript);
        }
    }

    // ---- global cancel ----

    /// Esc: close whatever is open, drop pending text, leave flow
    pub fn cancel(&mut self) {
        self.command_bar.text.clear();
        self.command_bar.error = None;
        self.command_bar.pending = None;
        self.quick_add.clear();
        self.quick_add_pending = None;
        self.focus.cancel_edit();
        self.focus.exit_flow();
        self.stop_voice();
        self.ui_mode = UiMode::Normal;
    }

    // ---- worker events ----

    pub fn apply_event(&mut self, event: ApiEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match event {
            ApiEvent::Reloaded { seq, result } => match result {
                Ok(tasks) => self.apply_snapshot(seq, tasks),
                Err(e) => {
                    warn!(error = %e, "task reload failed");
                    self.set_notice(format!("Could not load tasks: {}", e), NoticeLevel::Error);
                }
            },
            ApiEvent::Mutated {
                seq,
                mutation,
                result,
            } => self.apply_mutation_result(seq, &mutation, result),
            ApiEvent::GhostsFetched { ticket, result } => match result {
                Ok(suggestions) => {
                    self.ghosts.complete(ticket, suggestions);
                }
                Err(e) => {
                    debug!(error = %e, "ghost fetch failed");
                    self.ghosts.fail(ticket);
                }
            },
            ApiEvent::ChatReplied { result } => {
                let outcome = self.conversation.receive(result);
                if outcome.reload {
                    self.request_reload();
                }
                if let Some(text) = outcome.speak {
                    self.effects.push(Effect::Speak(text));
                }
            }
        }
    }

    fn apply_snapshot(&mut self, seq: u64, tasks: Vec<Task>) {
        if self.store.apply(seq, tasks) {
            self.clamp_selection();
            self.refresh_ghosts();
        }
    }

    fn apply_mutation_result(
        &mut self,
        seq: u64,
        mutation: &Mutation,
        result: Result<Vec<Task>, MutationError>,
    ) {
        let is_command = matches!(mutation, Mutation::Command(_))
            && self.command_bar.pending == Some(seq);
        if is_command {
            self.command_bar.pending = None;
        }
        let is_quick_add =
            matches!(mutation, Mutation::Create(_)) && self.quick_add_pending == Some(seq);
        if is_quick_add {
            self.quick_add_pending = None;
            // Saved, even if the reload that followed failed
            if !matches!(result, Err(MutationError::Mutate(_))) {
                self.quick_add.clear();
                if self.ui_mode == UiMode::QuickAdd {
                    self.ui_mode = UiMode::Normal;
                }
            }
        }

        match result {
            Ok(tasks) => {
                if is_command {
                    self.command_bar.text.clear();
                    if self.ui_mode == UiMode::CommandBar {
                        self.ui_mode = UiMode::Normal;
                    }
                }
                self.apply_snapshot(seq, tasks);
            }
            Err(MutationError::Mutate(e)) if is_command => {
                self.command_bar.error = Some(e.user_message(COMMAND_FALLBACK_ERROR));
            }
            Err(MutationError::Mutate(e)) => {
                warn!(op = mutation.label(), error = %e, "mutation failed");
                self.set_notice(
                    format!("Could not {}: {}", mutation.label(), e),
                    NoticeLevel::Error,
                );
            }
            Err(err @ MutationError::Reload(_)) => {
                warn!(op = mutation.label(), error = %err, "reload after mutation failed");
                if is_command {
                    self.command_bar.text.clear();
                    if self.ui_mode == UiMode::CommandBar {
                        self.ui_mode = UiMode::Normal;
                    }
                }
                self.set_notice(err.to_string(), NoticeLevel::Error);
            }
        }
    }
}
