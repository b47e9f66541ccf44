use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the navigation sidebar
const SIDEBAR_WIDTH: u16 = 28;

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub sidebar_area: Rect,
    pub list_area: Rect,
    pub timetable_area: Option<Rect>,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Main area: Sidebar | Task list [| Timetable when expanded]
/// - Bottom bar: notices (1 row)
pub fn create_layout(area: Rect, timetable_expanded: bool) -> MainLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let columns = if timetable_expanded {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(SIDEBAR_WIDTH),
                Constraint::Percentage(55),
                Constraint::Percentage(45),
            ])
            .split(rows[1])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(rows[1])
    };

    MainLayout {
        keybindings_area: rows[0],
        sidebar_area: columns[0],
        list_area: columns[1],
        timetable_area: timetable_expanded.then(|| columns[2]),
        status_area: rows[2],
    }
}

/// Centered modal of a fixed height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

/// Right-hand slide-over panel (assistant)
pub fn create_panel_area(area: Rect) -> Rect {
    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(horizontal_chunks[1]);

    vertical_chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = create_layout(area, false);

        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.sidebar_area.width, SIDEBAR_WIDTH);
        assert!(layout.list_area.width > 0);
        assert!(layout.timetable_area.is_none());

        let expanded = create_layout(area, true);
        let timetable = expanded.timetable_area.unwrap();
        assert!(timetable.width > 0);
        assert_eq!(timetable.height, expanded.list_area.height);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area, 7);

        assert!(modal.width < area.width);
        assert_eq!(modal.height, 7);
    }

    #[test]
    fn test_create_panel_area() {
        let area = Rect::new(0, 0, 100, 40);
        let panel = create_panel_area(area);
        assert!(panel.x >= 50);
        assert_eq!(panel.height, 38);
    }
}
