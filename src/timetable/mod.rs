pub mod ghosts;
pub mod slots;
pub mod solidify;

pub use ghosts::{GhostFeed, GhostTicket};
pub use slots::{resolve_day, slot_grid, ResolvedSlot, SlotContent};
pub use solidify::{solidify, solidify_mutation, SolidifyRequest};
