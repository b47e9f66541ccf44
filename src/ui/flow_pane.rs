use crate::app::AppState;
use crate::domain::active_ordered;
use crate::focus::{next_task, TimerPhase};
use crate::ui::styles::{
    gauge_style, hint_style, modal_bg_style, paused_style, running_style, subtitle_style,
    title_style,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

const CONTROLS: &str = "Space start/pause   r reset   x leave flow";

/// Full-screen focus HUD shown while flow mode is on
pub fn render_flow_pane(f: &mut Frame, app: &AppState, area: Rect) {
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .style(modal_bg_style())
        .title(Span::styled(" FOCUS BLOCK ", title_style()))
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(2), // Focal task
            Constraint::Length(2), // Clock
            Constraint::Length(1), // Progress
            Constraint::Length(2),
            Constraint::Length(1), // Next up
            Constraint::Min(0),
            Constraint::Length(1), // Controls
        ])
        .split(inner);

    let timer = app.focus.timer();
    let clock_style = match timer.phase() {
        TimerPhase::Running => running_style(),
        _ => paused_style(),
    };

    let centered = |line: Line<'static>| Paragraph::new(line).alignment(Alignment::Center);

    f.render_widget(
        centered(Line::styled(app.focus.focal_title().to_string(), title_style())),
        rows[1],
    );
    f.render_widget(centered(Line::styled(timer.display(), clock_style)), rows[2]);

    let gauge_area = centered_rect(rows[3], 60);
    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .ratio(app.focus.progress())
        .label(format!("{:.0}%", app.focus.progress() * 100.0));
    f.render_widget(gauge, gauge_area);

    if let Some(line) = next_line(app) {
        f.render_widget(centered(line), rows[5]);
    }

    f.render_widget(centered(Line::styled(CONTROLS, hint_style())), rows[7]);
}

/// "NEXT: <name>" when something follows the focal task
fn next_line(app: &AppState) -> Option<Line<'static>> {
    let active = active_ordered(app.store.tasks());
    let next = next_task(&active)?;
    Some(Line::from(vec![
        Span::styled("NEXT: ", hint_style()),
        Span::styled(next.name.clone(), subtitle_style()),
    ]))
}

/// Horizontally centered slice of `area`, `percent` wide
fn centered_rect(area: Rect, percent: u16) -> Rect {
    let side = (100 - percent.min(100)) / 2;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(side),
            Constraint::Percentage(percent),
            Constraint::Min(0),
        ])
        .split(area)[1]
}
