use super::enums::TaskStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// Category assigned to tasks captured without one
pub const DEFAULT_CATEGORY: &str = "general";

/// Priority assigned to quick-added tasks (1 = highest, 5 = lowest)
pub const DEFAULT_PRIORITY: u8 = 3;

/// Duration in minutes assigned to quick-added tasks
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Format a date the way the server stores deadlines (YYYY-MM-DD)
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Treat a JSON null as an empty string
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

/// A task as returned by `GET /tasks`.
///
/// The server owns tasks; the client only ever holds the copy from the last
/// fetch and never edits one in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_priority")]
    pub priority: u8,
    /// ISO date (YYYY-MM-DD), empty when the task has no deadline
    #[serde(default, deserialize_with = "null_as_empty")]
    pub deadline: String,
    /// 24h start time (HH:MM), empty when unscheduled
    #[serde(default, deserialize_with = "null_as_empty")]
    pub start_time: String,
    /// Minutes
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Whether the task is pinned to a time of day
    pub fn is_scheduled(&self) -> bool {
        !self.start_time.trim().is_empty()
    }

    /// Secondary line for list rows: "category • P3 • 2024-03-01 • 09:00"
    pub fn subtitle(&self) -> String {
        let deadline = if self.deadline.is_empty() {
            "No date"
        } else {
            self.deadline.as_str()
        };

        let mut line = format!("{} • P{} • {}", self.category, self.priority, deadline);
        if self.is_scheduled() {
            line.push_str(&format!(" • {}", self.start_time.trim()));
        }
        line
    }
}

/// Body of `POST /tasks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub name: String,
    pub category: String,
    pub priority: u8,
    pub deadline: String,
    pub start_time: String,
    pub duration: u32,
    pub status: TaskStatus,
}

impl NewTask {
    /// Build the task the quick-add field creates: defaults everywhere except
    /// the title and the currently selected date.
    pub fn quick(name: &str, deadline: NaiveDate) -> Self {
        Self {
            name: name.trim().to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            priority: DEFAULT_PRIORITY,
            deadline: iso_date(deadline),
            start_time: String::new(),
            duration: DEFAULT_DURATION_MINUTES,
            status: TaskStatus::Open,
        }
    }
}

/// Body of `PATCH /tasks/{id}`; only the fields that are set get sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Patch that marks a task done
    pub fn complete() -> Self {
        Self {
            status: Some(TaskStatus::Done),
            ..Self::default()
        }
    }
}

/// Last-fetched snapshot of tasks.
///
/// Every mutation is followed by a full reload; a reload replaces the
/// snapshot wholesale. Reloads are numbered when issued so a slow response
/// can never overwrite a newer snapshot.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    issued: u64,
    applied: u64,
    loaded: bool,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot in server order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Whether at least one reload has landed
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn find(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Reserve a sequence number for a reload about to be requested
    pub fn begin_reload(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Replace the snapshot with the result of reload `seq`.
    /// Returns false when a newer snapshot has already been applied.
    pub fn apply(&mut self, seq: u64, tasks: Vec<Task>) -> bool {
        if seq <= self.applied {
            debug!(seq, applied = self.applied, "dropping stale task snapshot");
            return false;
        }
        self.applied = seq;
        self.tasks = tasks;
        self.loaded = true;
        true
    }
}

#[cfg(test)]
pub(crate) fn sample_task(id: i64, name: &str) -> Task {
    Task {
        id,
        name: name.to_string(),
        category: DEFAULT_CATEGORY.to_string(),
        priority: DEFAULT_PRIORITY,
        deadline: String::new(),
        start_time: String::new(),
        duration: DEFAULT_DURATION_MINUTES,
        status: TaskStatus::Open,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_task_deserialize_server_row() {
        let json = r#"{"id":4,"name":"Gym","category":"health","priority":1,
            "deadline":"2024-03-01","start_time":"18:00","duration":90,"status":0}"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.id, 4);
        assert_eq!(task.priority, 1);
        assert_eq!(task.start_time, "18:00");
        assert!(task.is_open());
        assert!(task.is_scheduled());
    }

    #[test]
    fn test_task_deserialize_fills_defaults() {
        let json = r#"{"id":1,"name":"Read","deadline":null,"status":1}"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.category, "general");
        assert_eq!(task.deadline, "");
        assert_eq!(task.duration, 30);
        assert_eq!(task.status, TaskStatus::Done);
        assert!(!task.is_scheduled());
    }

    #[test]
    fn test_subtitle() {
        let mut task = sample_task(1, "Write");
        assert_eq!(task.subtitle(), "general • P3 • No date");

        task.deadline = "2024-03-01".to_string();
        task.start_time = "09:30".to_string();
        assert_eq!(task.subtitle(), "general • P3 • 2024-03-01 • 09:30");
    }

    #[test]
    fn test_quick_new_task() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let task = NewTask::quick("  Call mom ", date);

        assert_eq!(
            serde_json::to_value(&task).unwrap(),
            serde_json::json!({
                "name": "Call mom",
                "category": "general",
                "priority": 3,
                "deadline": "2024-03-01",
                "start_time": "",
                "duration": 30,
                "status": 0
            })
        );
    }

    #[test]
    fn test_complete_patch_only_sends_status() {
        let body = serde_json::to_value(TaskPatch::complete()).unwrap();
        assert_eq!(body, serde_json::json!({ "status": 1 }));
    }

    #[test]
    fn test_store_drops_stale_snapshot() {
        let mut store = TaskStore::new();
        let first = store.begin_reload();
        let second = store.begin_reload();

        assert!(store.apply(second, vec![sample_task(2, "newer")]));
        assert!(!store.apply(first, vec![sample_task(1, "older")]));

        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].name, "newer");
        assert!(store.is_loaded());
    }

    #[test]
    fn test_store_find() {
        let mut store = TaskStore::new();
        let seq = store.begin_reload();
        store.apply(seq, vec![sample_task(1, "a"), sample_task(7, "b")]);

        assert_eq!(store.find(7).map(|t| t.name.as_str()), Some("b"));
        assert!(store.find(3).is_none());
    }
}
