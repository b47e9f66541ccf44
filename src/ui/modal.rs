use crate::app::AppState;
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, hint_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const PLACEHOLDER: &str = "Try: \"Gym friday 6pm 90m P1\"";
const FOOTER: &str = "Enter creates instantly • Esc closes • Ctrl+K opens";

/// Render the natural-language command bar
pub fn render_command_bar(f: &mut Frame, app: &AppState, area: Rect) {
    let modal_area = create_modal_area(area, 8);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let bar = &app.command_bar;
    let mut lines = Vec::new();

    lines.push(Line::raw(""));
    let input = if bar.text.is_empty() {
        Span::styled(PLACEHOLDER, hint_style())
    } else {
        Span::raw(bar.text.clone())
    };
    lines.push(Line::from(vec![Span::styled(" ⌘ ", modal_title_style()), input]));
    lines.push(Line::raw(""));

    if bar.is_submitting() {
        lines.push(Line::styled(" Creating…", hint_style()));
    } else if let Some(error) = &bar.error {
        lines.push(Line::styled(format!(" {}", error), error_style()));
    } else {
        lines.push(Line::raw(""));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(format!(" {}", FOOTER), hint_style()));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Command ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);

    if !bar.is_submitting() {
        let x = modal_area.x + 4 + bar.text.chars().count() as u16;
        f.set_cursor(x.min(modal_area.right().saturating_sub(2)), modal_area.y + 2);
    }
}
