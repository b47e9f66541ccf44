use crate::app::AppState;
use crate::domain::priority_badge;
use crate::domain::task::{DEFAULT_DURATION_MINUTES, DEFAULT_PRIORITY};
use crate::ui::{
    layout::create_modal_area,
    styles::{hint_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the quick-add form; new tasks land on the selected date
pub fn render_quick_add(f: &mut Frame, app: &AppState, area: Rect) {
    let modal_area = create_modal_area(area, 7);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let mut lines = Vec::new();
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw(" > "),
        Span::styled(app.quick_add.clone(), modal_title_style()),
        Span::styled("█", modal_title_style()), // Cursor
    ]));
    lines.push(Line::raw(""));
    let keys = if app.quick_add_submitting() {
        "Adding..."
    } else {
        "Enter add • Esc cancel"
    };
    lines.push(Line::styled(
        format!(
            " Due {} • {} • {}m   {}",
            app.selected_date.format("%a %d %b"),
            priority_badge(DEFAULT_PRIORITY),
            DEFAULT_DURATION_MINUTES,
            keys
        ),
        hint_style(),
    ));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Add Task ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
