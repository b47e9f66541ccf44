use serde::{Deserialize, Serialize};

/// A server-suggested, uncommitted placement for an open task.
/// Ghosts are never stored; each fetch replaces the previous set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostSuggestion {
    pub task_id: i64,
    /// HH:MM on the slot grid
    pub suggested_time: String,
    pub name: String,
    #[serde(default)]
    pub priority: u8,
    /// Minutes
    #[serde(default)]
    pub duration: u32,
}

/// Body of `GET /ghost-schedule`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GhostSchedule {
    #[serde(default)]
    pub suggestions: Vec<GhostSuggestion>,
}
