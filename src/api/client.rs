use super::error::{detail_from_body, ApiError, MutationError};
use crate::assistant::ChatReply;
use crate::domain::{iso_date, GhostSchedule, GhostSuggestion, NewTask, Task, TaskPatch};
use crate::timetable::SolidifyRequest;
use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Everything the client needs from the task service.
///
/// Mutating calls only report success; callers reload the snapshot
/// afterwards instead of trusting response bodies.
pub trait TaskApi {
    fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError>;
    fn create_task(&self, task: &NewTask) -> Result<(), ApiError>;
    fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), ApiError>;
    fn delete_task(&self, id: i64) -> Result<(), ApiError>;
    /// Natural-language command; the server parses it and creates a task
    fn run_command(&self, text: &str) -> Result<(), ApiError>;
    fn fetch_ghosts(&self, date: NaiveDate) -> Result<Vec<GhostSuggestion>, ApiError>;
    fn solidify_ghost(&self, task_id: i64, request: &SolidifyRequest) -> Result<(), ApiError>;
    fn chat(&self, message: &str) -> Result<ChatReply, ApiError>;
}

/// A change to server state. Always followed by a full reload.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create(NewTask),
    Complete(i64),
    Delete(i64),
    Command(String),
    Solidify {
        task_id: i64,
        request: SolidifyRequest,
    },
}

impl Mutation {
    /// Send the change without reloading
    pub fn apply<A: TaskApi + ?Sized>(&self, api: &A) -> Result<(), ApiError> {
        match self {
            Mutation::Create(task) => api.create_task(task),
            Mutation::Complete(id) => api.update_task(*id, &TaskPatch::complete()),
            Mutation::Delete(id) => api.delete_task(*id),
            Mutation::Command(text) => api.run_command(text),
            Mutation::Solidify { task_id, request } => api.solidify_ghost(*task_id, request),
        }
    }

    /// Short name for logs and notices
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::Create(_) => "add task",
            Mutation::Complete(_) => "complete task",
            Mutation::Delete(_) => "delete task",
            Mutation::Command(_) => "run command",
            Mutation::Solidify { .. } => "schedule ghost",
        }
    }
}

/// Apply a mutation, then fetch the full task list.
/// A failed mutation returns before reloading so the previous snapshot stays.
pub fn mutate_then_reload<A: TaskApi + ?Sized>(
    api: &A,
    mutation: &Mutation,
) -> Result<Vec<Task>, MutationError> {
    mutation.apply(api).map_err(MutationError::Mutate)?;
    api.fetch_tasks().map_err(MutationError::Reload)
}

/// `TaskApi` over HTTP/JSON
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed building HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send and turn non-2xx responses into `Rejected`
    fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().map_err(|e| {
            warn!(error = %e, "task service request failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let detail = detail_from_body(&body);
        debug!(status = status.as_u16(), ?detail, "task service rejected request");
        Err(ApiError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request)?;
        response.json::<T>().map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl TaskApi for HttpTaskApi {
    #[instrument(skip(self))]
    fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let tasks: Vec<Task> = self.send_json(self.client.get(self.url("/tasks")))?;
        debug!(count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    #[instrument(skip(self, task), fields(name = %task.name))]
    fn create_task(&self, task: &NewTask) -> Result<(), ApiError> {
        self.send(self.client.post(self.url("/tasks")).json(task))?;
        Ok(())
    }

    #[instrument(skip(self, patch))]
    fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), ApiError> {
        self.send(
            self.client
                .patch(self.url(&format!("/tasks/{}", id)))
                .json(patch),
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        self.send(self.client.delete(self.url(&format!("/tasks/{}", id))))?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn run_command(&self, text: &str) -> Result<(), ApiError> {
        self.send(
            self.client
                .post(self.url("/command"))
                .json(&json!({ "text": text })),
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn fetch_ghosts(&self, date: NaiveDate) -> Result<Vec<GhostSuggestion>, ApiError> {
        let schedule: GhostSchedule = self.send_json(
            self.client
                .get(self.url("/ghost-schedule"))
                .query(&[("date", iso_date(date))]),
        )?;
        debug!(count = schedule.suggestions.len(), "fetched ghost suggestions");
        Ok(schedule.suggestions)
    }

    #[instrument(skip(self, request))]
    fn solidify_ghost(&self, task_id: i64, request: &SolidifyRequest) -> Result<(), ApiError> {
        self.send(
            self.client
                .post(self.url(&format!("/solidify-ghost/{}", task_id)))
                .json(request),
        )?;
        Ok(())
    }

    #[instrument(skip(self, message))]
    fn chat(&self, message: &str) -> Result<ChatReply, ApiError> {
        self.send_json(
            self.client
                .post(self.url("/chat"))
                .json(&json!({ "message": message })),
        )
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;

    /// One recorded call against `RecordingApi`
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        FetchTasks,
        Create(NewTask),
        Update(i64, TaskPatch),
        Delete(i64),
        Command(String),
        FetchGhosts(NaiveDate),
        Solidify(i64, SolidifyRequest),
        Chat(String),
    }

    /// In-memory `TaskApi` that records calls and replays canned results
    #[derive(Debug, Default)]
    pub struct RecordingApi {
        pub calls: RefCell<Vec<Call>>,
        pub tasks: Vec<Task>,
        pub ghosts: Vec<GhostSuggestion>,
        pub reply: Option<ChatReply>,
        /// Error returned by every mutating call
        pub mutation_error: Option<ApiError>,
        /// Error returned by fetches
        pub fetch_error: Option<ApiError>,
    }

    impl RecordingApi {
        pub fn with_tasks(tasks: Vec<Task>) -> Self {
            Self {
                tasks,
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn record(&self, call: Call) {
            self.calls.borrow_mut().push(call);
        }

        fn mutation_result(&self) -> Result<(), ApiError> {
            match &self.mutation_error {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    impl TaskApi for RecordingApi {
        fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
            self.record(Call::FetchTasks);
            match &self.fetch_error {
                Some(e) => Err(e.clone()),
                None => Ok(self.tasks.clone()),
            }
        }

        fn create_task(&self, task: &NewTask) -> Result<(), ApiError> {
            self.record(Call::Create(task.clone()));
            self.mutation_result()
        }

        fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), ApiError> {
            self.record(Call::Update(id, patch.clone()));
            self.mutation_result()
        }

        fn delete_task(&self, id: i64) -> Result<(), ApiError> {
            self.record(Call::Delete(id));
            self.mutation_result()
        }

        fn run_command(&self, text: &str) -> Result<(), ApiError> {
            self.record(Call::Command(text.to_string()));
            self.mutation_result()
        }

        fn fetch_ghosts(&self, date: NaiveDate) -> Result<Vec<GhostSuggestion>, ApiError> {
            self.record(Call::FetchGhosts(date));
            match &self.fetch_error {
                Some(e) => Err(e.clone()),
                None => Ok(self.ghosts.clone()),
            }
        }

        fn solidify_ghost(&self, task_id: i64, request: &SolidifyRequest) -> Result<(), ApiError> {
            self.record(Call::Solidify(task_id, request.clone()));
            self.mutation_result()
        }

        fn chat(&self, message: &str) -> Result<ChatReply, ApiError> {
            self.record(Call::Chat(message.to_string()));
            match (&self.mutation_error, &self.reply) {
                (Some(e), _) => Err(e.clone()),
                (None, Some(reply)) => Ok(reply.clone()),
                (None, None) => Ok(ChatReply::default()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{Call, RecordingApi};
    use super::*;
    use crate::domain::task::sample_task;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_complete_patches_status_then_reloads() {
        let api = RecordingApi::with_tasks(vec![sample_task(3, "done now")]);

        let tasks = mutate_then_reload(&api, &Mutation::Complete(3)).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(
            api.calls(),
            vec![Call::Update(3, TaskPatch::complete()), Call::FetchTasks]
        );
    }

    #[test]
    fn test_failed_mutation_skips_reload() {
        let api = RecordingApi {
            mutation_error: Some(ApiError::Transport("connection refused".to_string())),
            ..RecordingApi::default()
        };

        let err = mutate_then_reload(&api, &Mutation::Delete(5)).unwrap_err();
        assert!(matches!(err, MutationError::Mutate(ApiError::Transport(_))));
        assert_eq!(api.calls(), vec![Call::Delete(5)]);
    }

    #[test]
    fn test_reload_failure_is_reported_separately() {
        let api = RecordingApi {
            fetch_error: Some(ApiError::Transport("timed out".to_string())),
            ..RecordingApi::default()
        };

        let err = mutate_then_reload(&api, &Mutation::Command("gym 6pm".to_string())).unwrap_err();
        assert!(matches!(err, MutationError::Reload(_)));
        assert_eq!(
            api.calls(),
            vec![Call::Command("gym 6pm".to_string()), Call::FetchTasks]
        );
    }

    #[test]
    fn test_http_api_trims_base_url() {
        let api = HttpTaskApi::new("http://127.0.0.1:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://127.0.0.1:8000");
        assert_eq!(api.url("/tasks"), "http://127.0.0.1:8000/tasks");
    }
}
