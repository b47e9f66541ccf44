pub mod assistant_pane;
pub mod flow_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod sidebar_pane;
pub mod styles;
pub mod timetable_pane;

use crate::app::AppState;
use crate::domain::UiMode;
use assistant_pane::render_assistant_pane;
use flow_pane::render_flow_pane;
use input_form::render_quick_add;
use keybindings::{render_keybindings, render_status_line};
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_command_bar;
use ratatui::Frame;
use sidebar_pane::render_sidebar_pane;
use timetable_pane::render_timetable_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size, app.timetable_expanded);

    render_keybindings(f, app, layout.keybindings_area);

    // Render panes
    render_sidebar_pane(f, app, layout.sidebar_area);
    render_list_pane(f, app, layout.list_area);
    if let Some(timetable_area) = layout.timetable_area {
        render_timetable_pane(f, app, timetable_area);
    }

    // Flow HUD covers the panes but not the hint or status bars
    if app.focus.flow().is_active() {
        let mut hud_area = size;
        hud_area.y = layout.sidebar_area.y;
        hud_area.height = layout.sidebar_area.height;
        render_flow_pane(f, app, hud_area);
    }

    match app.ui_mode {
        UiMode::CommandBar => render_command_bar(f, app, size),
        UiMode::QuickAdd => render_quick_add(f, app, size),
        UiMode::Assistant => render_assistant_pane(f, app, size),
        UiMode::Normal | UiMode::EditingTimer => {}
    }

    render_status_line(f, app, layout.status_area);
}
