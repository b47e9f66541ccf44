use crate::app::AppState;
use crate::domain::priority_badge;
use crate::timetable::{resolve_day, ResolvedSlot, SlotContent};
use crate::ui::styles::{
    booking_style, border_style, ghost_style, hint_style, selected_style,
    title_style,
};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Width of the "HH:MM │ " gutter
const GUTTER_WIDTH: usize = 8;

/// Render the daily timetable: bookings, ghost suggestions, and free slots
pub fn render_timetable_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let date_iso = app.selected_date_iso();
    let slots = resolve_day(
        app.store.tasks(),
        app.ghosts.suggestions_for(app.selected_date),
        &date_iso,
    );

    let content_width = (area.width.saturating_sub(2) as usize).saturating_sub(GUTTER_WIDTH);

    let mut all_lines = Vec::new();
    let mut cursor_line = 0;
    for (idx, slot) in slots.iter().enumerate() {
        let is_cursor = idx == app.slot_cursor;
        if is_cursor {
            cursor_line = all_lines.len();
        }
        all_lines.extend(slot_lines(slot, is_cursor, content_width));
    }

    if app.ghosts.is_pending() {
        all_lines.push(Line::raw(""));
        all_lines.push(Line::styled(" loading suggestions…", hint_style()));
    }

    // Keep the cursor slot on screen
    let available_height = area.height.saturating_sub(2) as usize;
    let scroll_offset = scroll_offset_for(cursor_line, available_height, all_lines.len());
    let visible_lines: Vec<Line> = all_lines
        .into_iter()
        .skip(scroll_offset)
        .take(available_height)
        .collect();

    let title = Line::from(vec![
        Span::styled(" Daily Flow ", title_style()),
        Span::styled(format!("{} ", app.selected_date.format("%a %d %b")), hint_style()),
    ]);
    let paragraph = Paragraph::new(visible_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(title),
    );

    f.render_widget(paragraph, area);
}

/// Lines for one slot. Empty slots take one row, filled ones two.
fn slot_lines(slot: &ResolvedSlot, is_cursor: bool, width: usize) -> Vec<Line<'static>> {
    let label_style = if is_cursor {
        selected_style()
    } else {
        hint_style()
    };
    let label = Span::styled(slot.label.clone(), label_style);

    match slot.content {
        SlotContent::Empty => vec![Line::from(vec![label, Span::raw(" │")])],
        SlotContent::Booking(task) => {
            let style = if is_cursor {
                booking_style().add_modifier(Modifier::REVERSED)
            } else {
                booking_style()
            };
            vec![
                Line::from(vec![
                    label,
                    Span::raw(" │ "),
                    Span::styled(truncate_string(&task.name, width), style),
                ]),
                Line::from(vec![
                    Span::raw("      │ "),
                    Span::styled(
                        format!("{} • {}m", priority_badge(task.priority), task.duration),
                        hint_style(),
                    ),
                ]),
            ]
        }
        SlotContent::Ghost(ghost) => {
            let style = if is_cursor {
                ghost_style().add_modifier(Modifier::REVERSED)
            } else {
                ghost_style()
            };
            vec![
                Line::from(vec![
                    label,
                    Span::raw(" ┆ "),
                    Span::styled("Ghost slot ", hint_style()),
                    Span::styled(
                        truncate_string(&ghost.name, width.saturating_sub(11)),
                        style,
                    ),
                ]),
                Line::from(vec![
                    Span::raw("      ┆ "),
                    Span::styled(
                        format!("{} • {}m", priority_badge(ghost.priority), ghost.duration),
                        hint_style(),
                    ),
                ]),
            ]
        }
    }
}

/// First visible line so that `cursor_line` stays in view
fn scroll_offset_for(cursor_line: usize, height: usize, total: usize) -> usize {
    if height == 0 || total <= height {
        return 0;
    }
    // Leave room for the second line of a filled slot
    let wanted = (cursor_line + 2).saturating_sub(height);
    wanted.min(total - height)
}

/// Truncate to `max_len` characters, with an ellipsis when there is room
fn truncate_string(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::sample_task;
    use crate::domain::GhostSuggestion;
    use pretty_assertions::assert_eq;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a long task name", 8), "a lon...");
        assert_eq!(truncate_string("abcdef", 2), "ab");
        assert_eq!(truncate_string("café au lait", 7), "café...");
    }

    #[test]
    fn test_booking_lines_show_priority_and_duration() {
        let mut task = sample_task(1, "Gym");
        task.priority = 1;
        task.duration = 90;
        let slot = ResolvedSlot {
            label: "18:00".to_string(),
            content: SlotContent::Booking(&task),
        };

        let lines = slot_lines(&slot, false, 30);
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[0]), "18:00 │ Gym");
        assert_eq!(line_text(&lines[1]), "      │ P1 • 90m");
    }

    #[test]
    fn test_ghost_lines_are_marked() {
        let ghost = GhostSuggestion {
            task_id: 4,
            suggested_time: "09:30".to_string(),
            name: "Read".to_string(),
            priority: 3,
            duration: 30,
        };
        let slot = ResolvedSlot {
            label: "09:30".to_string(),
            content: SlotContent::Ghost(&ghost),
        };

        let lines = slot_lines(&slot, true, 30);
        assert_eq!(line_text(&lines[0]), "09:30 ┆ Ghost slot Read");
        assert_eq!(line_text(&lines[1]), "      ┆ P3 • 30m");
    }

    #[test]
    fn test_empty_slot_is_one_line() {
        let slot = ResolvedSlot {
            label: "08:00".to_string(),
            content: SlotContent::Empty,
        };
        assert_eq!(slot_lines(&slot, false, 30).len(), 1);
    }

    #[test]
    fn test_scroll_follows_cursor() {
        assert_eq!(scroll_offset_for(3, 10, 40), 0);
        assert_eq!(scroll_offset_for(20, 10, 40), 12);
        assert_eq!(scroll_offset_for(39, 10, 40), 30);
        assert_eq!(scroll_offset_for(5, 10, 8), 0);
    }
}
