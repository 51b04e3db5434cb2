use serde::{Deserialize, Serialize};
use std::fmt;

/// A unique identifier for a queue, assigned monotonically starting at 1
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueueId(pub u32);

impl QueueId {
    /// Position of the queue inside the owning network's node list, `None` for the
    /// unassigned id 0
    pub fn index(&self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }

    pub fn from_index(index: usize) -> Self {
        QueueId(index as u32 + 1)
    }
}

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// Status of a queue's single server
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum QueueStatus {
    /// No packet is in service
    #[default]
    Idle,
    /// A packet is in service and a departure is scheduled
    Busy,
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueStatus::Idle => write!(f, "Idle"),
            QueueStatus::Busy => write!(f, "Busy"),
        }
    }
}
