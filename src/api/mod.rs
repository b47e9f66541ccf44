pub mod client;
pub mod error;
pub mod worker;

pub use client::{mutate_then_reload, HttpTaskApi, Mutation, TaskApi};
pub use error::{ApiError, MutationError};
pub use worker::{ApiEvent, ApiJob, ApiWorker};
