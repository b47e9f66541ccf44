use crate::api::{mutate_then_reload, Mutation, MutationError, TaskApi};
use crate::domain::{iso_date, GhostSuggestion, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Body of `POST /solidify-ghost/{task_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidifyRequest {
    /// HH:MM the task gets pinned to
    pub time_slot: String,
    /// YYYY-MM-DD
    pub deadline: String,
}

/// Turn a ghost into the mutation that books it on `date`.
///
/// No check that the slot is still free: the server decides, and the reload
/// that follows shows the outcome.
pub fn solidify_mutation(ghost: &GhostSuggestion, date: NaiveDate) -> Mutation {
    Mutation::Solidify {
        task_id: ghost.task_id,
        request: SolidifyRequest {
            time_slot: ghost.suggested_time.trim().to_string(),
            deadline: iso_date(date),
        },
    }
}

/// Book `ghost` on `date` and return the reloaded snapshot
pub fn solidify<A: TaskApi + ?Sized>(
    api: &A,
    ghost: &GhostSuggestion,
    date: NaiveDate,
) -> Result<Vec<Task>, MutationError> {
    info!(
        task_id = ghost.task_id,
        time = %ghost.suggested_time,
        %date,
        "solidifying ghost slot"
    );
    mutate_then_reload(api, &solidify_mutation(ghost, date))
}
