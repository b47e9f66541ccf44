use crate::app::{AppState, NoticeLevel};
use crate::domain::UiMode;
use crate::ui::styles::{error_style, hint_style, info_style};
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Hint text for the current mode
fn hints_for(app: &AppState) -> &'static str {
    match app.ui_mode {
        UiMode::Normal if app.focus.flow().is_active() => {
            " Space start/pause   r reset   x/Esc leave flow   q quit"
        }
        UiMode::Normal => {
            " ↑/↓ select   Tab/1-3 view   a add   c done   d delete   ←/→ day   . today   \
             t timetable   J/K slot   s book ghost   Space timer   r reset   m/M edit mm/ss   \
             Ctrl+K command   i assistant   q quit"
        }
        UiMode::QuickAdd => " Enter add   Esc cancel",
        UiMode::CommandBar => " Enter run   Esc close",
        UiMode::EditingTimer => " digits set value   Enter save   Space start   Esc cancel",
        UiMode::Assistant => " Enter send   Ctrl+V voice   Ctrl+S mute   Esc close",
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let paragraph = Paragraph::new(Line::raw(hints_for(app))).style(hint_style());
    f.render_widget(paragraph, area);
}

/// Bottom line: the current notice, or sync activity
pub fn render_status_line(f: &mut Frame, app: &AppState, area: Rect) {
    let line = match &app.notice {
        Some(notice) => {
            let style = match notice.level {
                NoticeLevel::Info => info_style(),
                NoticeLevel::Error => error_style(),
            };
            Line::from(Span::styled(format!(" {}", notice.message), style))
        }
        None if app.in_flight > 0 => Line::from(Span::styled(" syncing…", hint_style())),
        None if !app.store.is_loaded() => Line::from(Span::styled(" connecting…", hint_style())),
        None => Line::raw(""),
    };
    f.render_widget(Paragraph::new(line), area);
}
