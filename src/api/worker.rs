use super::client::{mutate_then_reload, Mutation, TaskApi};
use super::error::{ApiError, MutationError};
use crate::assistant::ChatReply;
use crate::domain::{GhostSuggestion, Task};
use crate::timetable::GhostTicket;
use anyhow::{Context, Result};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Request handed to the background worker
#[derive(Debug, Clone, PartialEq)]
pub enum ApiJob {
    Reload { seq: u64 },
    /// Mutation followed by a reload numbered `seq`
    Mutate { seq: u64, mutation: Mutation },
    FetchGhosts { ticket: GhostTicket },
    Chat { message: String },
}

impl ApiJob {
    fn name(&self) -> &'static str {
        match self {
            ApiJob::Reload { .. } => "reload",
            ApiJob::Mutate { mutation, .. } => mutation.label(),
            ApiJob::FetchGhosts { .. } => "fetch ghosts",
            ApiJob::Chat { .. } => "chat",
        }
    }
}

/// Answer sent back to the UI thread
#[derive(Debug, Clone, PartialEq)]
pub enum ApiEvent {
    Reloaded {
        seq: u64,
        result: Result<Vec<Task>, ApiError>,
    },
    Mutated {
        seq: u64,
        mutation: Mutation,
        result: Result<Vec<Task>, MutationError>,
    },
    GhostsFetched {
        ticket: GhostTicket,
        result: Result<Vec<GhostSuggestion>, ApiError>,
    },
    ChatReplied {
        result: Result<ChatReply, ApiError>,
    },
}

/// Execute one job synchronously
pub fn run_job<A: TaskApi + ?Sized>(api: &A, job: ApiJob) -> ApiEvent {
    match job {
        ApiJob::Reload { seq } => ApiEvent::Reloaded {
            seq,
            result: api.fetch_tasks(),
        },
        ApiJob::Mutate { seq, mutation } => {
            let result = mutate_then_reload(api, &mutation);
            ApiEvent::Mutated {
                seq,
                mutation,
                result,
            }
        }
        ApiJob::FetchGhosts { ticket } => ApiEvent::GhostsFetched {
            ticket,
            result: api.fetch_ghosts(ticket.date),
        },
        ApiJob::Chat { message } => ApiEvent::ChatReplied {
            result: api.chat(&message),
        },
    }
}

/// One background thread that owns the API client.
///
/// Jobs run in submission order, one at a time. The UI thread polls
/// `try_next` each frame and applies the events itself.
pub struct ApiWorker {
    jobs: Option<Sender<ApiJob>>,
    events: Receiver<ApiEvent>,
    handle: Option<JoinHandle<()>>,
}

impl ApiWorker {
    pub fn spawn<A>(api: A) -> Result<Self>
    where
        A: TaskApi + Send + 'static,
    {
        let (job_tx, job_rx) = mpsc::channel::<ApiJob>();
        let (event_tx, event_rx) = mpsc::channel::<ApiEvent>();

        let handle = thread::Builder::new()
            .name("flowdesk-api".to_string())
            .spawn(move || {
                for job in job_rx {
                    debug!(job = job.name(), "running api job");
                    let event = run_job(&api, job);
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
                info!("api worker stopped");
            })
            .context("Failed to spawn api worker thread")?;

        Ok(Self {
            jobs: Some(job_tx),
            events: event_rx,
            handle: Some(handle),
        })
    }

    pub fn submit(&self, job: ApiJob) {
        let Some(jobs) = &self.jobs else {
            return;
        };
        if jobs.send(job).is_err() {
            warn!("api worker is gone, dropping job");
        }
    }

    /// Next finished event, if any, without blocking
    pub fn try_next(&self) -> Option<ApiEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for ApiWorker {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop once the current job returns
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }
}
