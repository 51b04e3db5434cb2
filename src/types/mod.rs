pub mod constants;
pub mod event;
pub mod queue;

pub use event::{Event, EventKind};
pub use queue::{QueueId, QueueStatus};
