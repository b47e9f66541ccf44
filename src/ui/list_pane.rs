use crate::app::AppState;
use crate::domain::{priority_badge, Task};
use crate::ui::styles::{
    border_style, default_style, done_style, hint_style, priority_style, selected_style,
    subtitle_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the task list for the current tab
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let tasks = app.visible_tasks();

    let items: Vec<ListItem> = if tasks.is_empty() {
        let message = if app.store.is_loaded() {
            "  Nothing here. Press a to capture a task."
        } else {
            "  Loading tasks…"
        };
        vec![ListItem::new(Line::styled(message, hint_style()))]
    } else {
        tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| {
                let style = if idx == app.selected_index {
                    selected_style()
                } else {
                    default_style()
                };
                ListItem::new(task_lines(task)).style(style)
            })
            .collect()
    };

    let title = format!(" {} · {} ({}) ", app.tab.page_title(), app.tab.label(), tasks.len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style())),
    );

    f.render_widget(list, area);
}

/// Two lines per task: badge + name, then the subtitle
/// Format:  ○ P2 Write proposal
///          work • P2 • 2024-03-01 • 09:00
fn task_lines(task: &Task) -> Vec<Line<'static>> {
    let marker = if task.is_open() { "○" } else { "✓" };
    let name_style = if task.is_open() {
        default_style()
    } else {
        done_style()
    };

    vec![
        Line::from(vec![
            Span::raw(format!(" {} ", marker)),
            Span::styled(priority_badge(task.priority), priority_style(task.priority)),
            Span::raw(" "),
            Span::styled(task.name.clone(), name_style),
        ]),
        Line::from(Span::styled(format!("     {}", task.subtitle()), subtitle_style())),
    ]
}
