use crate::app::AppState;
use crate::assistant::{ChatMessage, Role};
use crate::ui::{
    layout::create_panel_area,
    styles::{active_border_style, hint_style, modal_bg_style, modal_title_style, subtitle_style},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the assistant chat panel over the right side of the screen
pub fn render_assistant_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let panel = create_panel_area(area);
    f.render_widget(Clear, panel);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(active_border_style())
        .style(modal_bg_style())
        .title(Span::styled(" Assistant ", modal_title_style()))
        .title(Span::styled(status_label(app), hint_style()));
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let mut lines: Vec<Line> = Vec::new();
    for message in app.conversation.messages() {
        lines.extend(message_lines(message));
    }
    if app.conversation.is_loading() {
        lines.push(Line::styled("Assistant: thinking…", hint_style()));
    }

    // Stick to the bottom of the history; wrapped rows are estimated
    let width = chunks[0].width.max(1) as usize;
    let rows: usize = lines
        .iter()
        .map(|l| (l.width().max(1) + width - 1) / width)
        .sum();
    let scroll = rows.saturating_sub(chunks[0].height as usize) as u16;

    let history = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(history, chunks[0]);

    let prompt = if app.voice.is_listening() { "● " } else { "> " };
    let input = Paragraph::new(Line::from(vec![
        Span::styled(prompt, modal_title_style()),
        Span::raw(app.conversation.input().to_string()),
    ]));
    f.render_widget(input, chunks[2]);

    let cursor_x = chunks[2].x + (prompt.chars().count() + app.conversation.input().chars().count()) as u16;
    f.set_cursor(cursor_x.min(chunks[2].right().saturating_sub(1)), chunks[2].y);
}

/// Right-hand title: voice and speech state
fn status_label(app: &AppState) -> String {
    let voice = if app.voice.is_listening() {
        "listening"
    } else if app.voice.is_available() {
        "voice ready"
    } else {
        "no voice"
    };
    let speech = if app.conversation.is_speaking() {
        "speaking"
    } else {
        "muted"
    };
    format!(" {} · {} ", voice, speech)
}

fn message_lines(message: &ChatMessage) -> Vec<Line<'static>> {
    let (who, style) = match message.role {
        Role::User => ("You", modal_title_style()),
        Role::Assistant => ("Assistant", subtitle_style()),
    };
    vec![
        Line::from(vec![
            Span::styled(format!("{}: ", who), style),
            Span::raw(message.content.clone()),
        ]),
        Line::raw(""),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppOptions;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn create_test_app(options: AppOptions) -> AppState {
        AppState::new(options, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    #[test]
    fn test_status_label_defaults() {
        let app = create_test_app(AppOptions::default());
        assert_eq!(status_label(&app), " no voice · speaking ");
    }

    #[test]
    fn test_status_label_muted_with_voice() {
        let mut app = create_test_app(AppOptions {
            voice_available: true,
            ..AppOptions::default()
        });
        app.toggle_speech();
        assert_eq!(status_label(&app), " voice ready · muted ");
    }

    #[test]
    fn test_message_lines_prefix_role() {
        let app = create_test_app(AppOptions::default());
        let lines = message_lines(&app.conversation.messages()[0]);
        let text: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with("Assistant: Hey!"));
    }
}
