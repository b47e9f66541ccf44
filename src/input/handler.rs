use crate::app::AppState;
use crate::domain::{Tab, UiMode};
use crate::focus::EditField;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global gestures, whatever mode is active
    match key.code {
        KeyCode::Char('c') if ctrl => return Ok(true),
        KeyCode::Char('k') if ctrl => {
            app.open_command_bar();
            return Ok(false);
        }
        KeyCode::Esc => {
            app.cancel();
            return Ok(false);
        }
        _ => {}
    }

    match app.ui_mode {
        UiMode::Normal if app.focus.flow().is_active() => handle_flow_mode(app, key),
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::QuickAdd => handle_quick_add_mode(app, key),
        UiMode::CommandBar => handle_command_bar_mode(app, key),
        UiMode::EditingTimer => handle_timer_edit_mode(app, key),
        UiMode::Assistant => handle_assistant_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => return Ok(true),

        // Task list
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
        KeyCode::Tab => app.next_tab(),
        KeyCode::Char('1') => app.set_tab(Tab::Inbox),
        KeyCode::Char('2') => app.set_tab(Tab::Upcoming),
        KeyCode::Char('3') => app.set_tab(Tab::Completed),
        KeyCode::Char('c') => app.complete_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('a') => app.start_quick_add(),
        KeyCode::Char(':') => app.open_command_bar(),
        KeyCode::Char('R') => app.request_reload(),

        // Date
        KeyCode::Left | KeyCode::Char('h') => app.previous_day(),
        KeyCode::Right | KeyCode::Char('l') => app.next_day(),
        KeyCode::Char('.') => app.jump_to_today(),

        // Timetable
        KeyCode::Char('t') => app.toggle_timetable(),
        KeyCode::Char('K') => app.move_slot_cursor_up(),
        KeyCode::Char('J') => app.move_slot_cursor_down(),
        KeyCode::Enter | KeyCode::Char('s') => app.solidify_at_cursor(),

        // Focus timer
        KeyCode::Char(' ') => app.toggle_timer(),
        KeyCode::Char('r') => app.reset_timer(),
        KeyCode::Char('m') => app.start_timer_edit(EditField::Minutes),
        KeyCode::Char('M') => app.start_timer_edit(EditField::Seconds),

        KeyCode::Char('i') => app.open_assistant(),
        _ => {}
    }
    Ok(false)
}

/// Flow HUD is up: only timer controls
fn handle_flow_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_timer(),
        KeyCode::Char('r') => app.reset_timer(),
        KeyCode::Char('x') => app.exit_flow(),
        _ => {}
    }
    Ok(false)
}

fn handle_quick_add_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_quick_add(),
        KeyCode::Backspace => app.quick_add_pop(),
        KeyCode::Char(c) => app.quick_add_push(c),
        _ => {}
    }
    Ok(false)
}

fn handle_command_bar_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_command(),
        KeyCode::Backspace => app.command_pop(),
        KeyCode::Char(c) => app.command_push(c),
        _ => {}
    }
    Ok(false)
}

fn handle_timer_edit_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.commit_timer_edit(),
        KeyCode::Backspace => app.timer_edit_pop(),
        // Starting from edit mode drops the unsaved value
        KeyCode::Char(' ') => app.toggle_timer(),
        KeyCode::Char(c) => app.timer_edit_push(c),
        _ => {}
    }
    Ok(false)
}

fn handle_assistant_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('v') if ctrl => app.toggle_voice(),
        KeyCode::Char('s') if ctrl => app.toggle_speech(),
        KeyCode::Enter => app.send_chat(),
        KeyCode::Backspace => app.assistant_pop(),
        KeyCode::Char(c) => app.assistant_push(c),
        _ => {}
    }
    Ok(false)
}
