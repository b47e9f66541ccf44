use super::enums::Tab;
use super::task::Task;

/// Open tasks in snapshot order
pub fn inbox(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| t.is_open()).collect()
}

/// Open tasks whose deadline is today or later.
/// Deadlines are fixed-width YYYY-MM-DD, so string order is date order.
pub fn upcoming<'a>(tasks: &'a [Task], today: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.is_open() && !t.deadline.is_empty() && t.deadline.as_str() >= today)
        .collect()
}

/// Done tasks in snapshot order
pub fn completed(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| !t.is_open()).collect()
}

/// Open tasks in snapshot order; the first one is what a focus session binds to.
/// Deliberately not priority-sorted: the top of the list is whatever the server sent first.
pub fn active_ordered(tasks: &[Task]) -> Vec<&Task> {
    inbox(tasks)
}

/// Projection shown for a tab
pub fn project<'a>(tasks: &'a [Task], tab: Tab, today: &str) -> Vec<&'a Task> {
    match tab {
        Tab::Inbox => inbox(tasks),
        Tab::Upcoming => upcoming(tasks, today),
        Tab::Completed => completed(tasks),
    }
}

/// Counts per tab, for the sidebar
pub fn tab_counts(tasks: &[Task], today: &str) -> [(Tab, usize); 3] {
    [
        (Tab::Inbox, inbox(tasks).len()),
        (Tab::Upcoming, upcoming(tasks, today).len()),
        (Tab::Completed, completed(tasks).len()),
    ]
}

/// Priority badge like "P1"
pub fn priority_badge(priority: u8) -> String {
    format!("P{}", priority)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enums::TaskStatus;
    use crate::domain::task::sample_task;
    use pretty_assertions::assert_eq;

    fn task(id: i64, deadline: &str, status: TaskStatus) -> Task {
        let mut t = sample_task(id, &format!("task {}", id));
        t.deadline = deadline.to_string();
        t.status = status;
        t
    }

    fn ids(tasks: &[&Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id).collect()
    }

    fn fixture() -> Vec<Task> {
        vec![
            task(1, "2024-02-28", TaskStatus::Open),
            task(2, "", TaskStatus::Open),
            task(3, "2024-03-01", TaskStatus::Done),
            task(4, "2024-03-01", TaskStatus::Open),
            task(5, "2024-03-09", TaskStatus::Open),
            task(6, "2024-02-01", TaskStatus::Done),
        ]
    }

    #[test]
    fn test_inbox_keeps_snapshot_order() {
        let tasks = fixture();
        assert_eq!(ids(&inbox(&tasks)), vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_upcoming_excludes_past_and_undated() {
        let tasks = fixture();
        assert_eq!(ids(&upcoming(&tasks, "2024-03-01")), vec![4, 5]);
    }

    #[test]
    fn test_completed() {
        let tasks = fixture();
        assert_eq!(ids(&completed(&tasks)), vec![3, 6]);
    }

    #[test]
    fn test_inbox_and_completed_partition_snapshot() {
        let tasks = fixture();
        let open = inbox(&tasks);
        let done = completed(&tasks);

        assert_eq!(open.len() + done.len(), tasks.len());
        assert!(open.iter().all(|t| !done.iter().any(|d| d.id == t.id)));

        // Upcoming plus the open tasks it excludes rebuilds the inbox
        let horizon = upcoming(&tasks, "2024-03-01");
        let excluded: Vec<&Task> = open
            .iter()
            .copied()
            .filter(|t| !horizon.iter().any(|h| h.id == t.id))
            .collect();
        assert_eq!(horizon.len() + excluded.len(), open.len());
        assert!(excluded
            .iter()
            .all(|t| t.deadline.is_empty() || t.deadline.as_str() < "2024-03-01"));
    }

    #[test]
    fn test_active_ordered_is_not_priority_sorted() {
        let mut tasks = fixture();
        tasks[0].priority = 5;
        tasks[1].priority = 1;
        assert_eq!(ids(&active_ordered(&tasks))[..2], [1, 2]);
    }

    #[test]
    fn test_project_by_tab() {
        let tasks = fixture();
        assert_eq!(ids(&project(&tasks, Tab::Completed, "2024-03-01")), vec![3, 6]);
        assert_eq!(
            tab_counts(&tasks, "2024-03-01"),
            [(Tab::Inbox, 4), (Tab::Upcoming, 2), (Tab::Completed, 2)]
        );
    }
}
