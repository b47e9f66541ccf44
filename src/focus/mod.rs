pub mod flow;
pub mod timer;

pub use flow::{next_task, FlowSession, FlowState};
pub use timer::{EditField, RunToggle, TimerEvent, TimerPhase, TimerSession};
