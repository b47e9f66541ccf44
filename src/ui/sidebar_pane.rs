use crate::app::AppState;
use crate::domain::{tab_counts, UiMode};
use crate::focus::{EditField, TimerPhase};
use crate::ui::styles::{
    border_style, default_style, gauge_style, hint_style, modal_title_style, paused_style,
    running_style, selected_style, title_style,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Render the sidebar: selected date, views with counts, and the focus timer
pub fn render_sidebar_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(7)])
        .split(area);

    render_navigation(f, app, chunks[0]);
    render_timer(f, app, chunks[1]);
}

fn render_navigation(f: &mut Frame, app: &AppState, area: Rect) {
    let mut lines = Vec::new();

    let date_label = app.selected_date.format("%a %d %b %Y").to_string();
    let today_marker = if app.selected_date == app.today {
        " (today)"
    } else {
        ""
    };
    lines.push(Line::from(vec![
        Span::styled(" ◂ ", hint_style()),
        Span::styled(date_label, title_style()),
        Span::styled(" ▸", hint_style()),
    ]));
    lines.push(Line::styled(format!("   {}", today_marker.trim()), hint_style()));
    lines.push(Line::raw(""));

    for (tab, count) in tab_counts(app.store.tasks(), &app.today_iso()) {
        let style = if tab == app.tab {
            selected_style()
        } else {
            default_style()
        };
        lines.push(Line::styled(format!(" {:<14}{:>4} ", tab.label(), count), style));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Flowdesk ", title_style())),
    );
    f.render_widget(paragraph, area);
}

fn render_timer(f: &mut Frame, app: &AppState, area: Rect) {
    let timer = app.focus.timer();
    let editing = app.ui_mode == UiMode::EditingTimer;

    let (state_label, state_style) = match timer.phase() {
        TimerPhase::Running => ("RUNNING", running_style()),
        TimerPhase::Paused if timer.time_left() == 0 => ("DONE", modal_title_style()),
        TimerPhase::Paused => ("PAUSED", paused_style()),
        TimerPhase::Editing(_) => ("EDITING", modal_title_style()),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Focus ", title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(Paragraph::new(clock_line(app, editing)), rows[0]);
    f.render_widget(
        Paragraph::new(Line::styled(format!(" {}", state_label), state_style)),
        rows[1],
    );
    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .ratio(app.focus.progress())
        .label("");
    f.render_widget(gauge, rows[2]);
}

/// " 25:00" with the field under edit replaced by the typed buffer
fn clock_line(app: &AppState, editing: bool) -> Line<'static> {
    let timer = app.focus.timer();
    let minutes = format!("{:02}", timer.minutes());
    let seconds = format!("{:02}", timer.seconds());

    let field = |text: String, this: EditField| -> Span<'static> {
        if editing && timer.editing() == Some(this) {
            Span::styled(format!("{}_", timer.edit_buffer()), selected_style())
        } else {
            Span::styled(text, title_style())
        }
    };

    Line::from(vec![
        Span::raw(" "),
        field(minutes, EditField::Minutes),
        Span::styled(":", title_style()),
        field(seconds, EditField::Seconds),
    ])
}
