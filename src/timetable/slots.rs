use crate::domain::{GhostSuggestion, Task};

/// First slot of the day (08:00), in minutes since midnight
pub const DAY_START_MINUTES: u32 = 8 * 60;

/// Last slot of the day (20:00), inclusive
pub const DAY_END_MINUTES: u32 = 20 * 60;

/// Slot length in minutes
pub const SLOT_MINUTES: u32 = 30;

/// Format minutes since midnight as "HH:MM"
pub fn minutes_to_label(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// The fixed half-hour grid, 08:00 through 20:00 (25 labels)
pub fn slot_grid() -> Vec<String> {
    (DAY_START_MINUTES..=DAY_END_MINUTES)
        .step_by(SLOT_MINUTES as usize)
        .map(minutes_to_label)
        .collect()
}

/// Open tasks pinned to a time on `date`
pub fn bookings_for<'a>(tasks: &'a [Task], date: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.is_open() && t.deadline == date && t.is_scheduled())
        .collect()
}

/// What a slot shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotContent<'a> {
    /// A committed task
    Booking(&'a Task),
    /// A suggestion the user can lock in
    Ghost(&'a GhostSuggestion),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSlot<'a> {
    pub label: String,
    pub content: SlotContent<'a>,
}

impl<'a> ResolvedSlot<'a> {
    pub fn ghost(&self) -> Option<&'a GhostSuggestion> {
        match self.content {
            SlotContent::Ghost(ghost) => Some(ghost),
            _ => None,
        }
    }
}

/// Resolve every grid label to exactly one of booking, ghost, or empty.
/// A booking always wins over a ghost aimed at the same slot; when several
/// candidates share a slot the first one in input order is shown.
pub fn resolve_slots<'a>(
    bookings: &[&'a Task],
    ghosts: &'a [GhostSuggestion],
    grid: &[String],
) -> Vec<ResolvedSlot<'a>> {
    grid.iter()
        .map(|label| {
            let content = if let Some(task) = bookings
                .iter()
                .copied()
                .find(|t| t.start_time.trim() == label.as_str())
            {
                SlotContent::Booking(task)
            } else if let Some(ghost) =
                ghosts.iter().find(|g| g.suggested_time.trim() == label.as_str())
            {
                SlotContent::Ghost(ghost)
            } else {
                SlotContent::Empty
            };

            ResolvedSlot {
                label: label.clone(),
                content,
            }
        })
        .collect()
}

/// Resolve the standard grid for one date
pub fn resolve_day<'a>(
    tasks: &'a [Task],
    ghosts: &'a [GhostSuggestion],
    date: &str,
) -> Vec<ResolvedSlot<'a>> {
    let bookings = bookings_for(tasks, date);
    resolve_slots(&bookings, ghosts, &slot_grid())
}
