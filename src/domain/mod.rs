pub mod enums;
pub mod ghost;
pub mod task;
pub mod views;

pub use enums::{Tab, TaskStatus, UiMode};
pub use ghost::{GhostSchedule, GhostSuggestion};
pub use task::{iso_date, NewTask, Task, TaskPatch, TaskStore};
pub use views::{active_ordered, priority_badge, project, tab_counts};
