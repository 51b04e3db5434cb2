use std::collections::VecDeque;
use crate::types::{constants, QueueId, QueueStatus};
use super::OverflowError;

/// What an arrival did to the queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrivalOutcome {
    /// The server was idle and is now busy with the arriving packet
    StartService,
    /// The server was busy; the packet waits behind `buffered - 1` others
    Buffered { buffered: usize },
}

/// What a service completion did to the queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Departure {
    /// Duration of the service that just finished
    pub served_for: f64,
    /// What the server does next
    pub next: DepartureOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DepartureOutcome {
    /// Nothing was waiting; the server is idle
    Idle,
    /// The oldest waiting packet entered service; it had been waiting since `arrived_at`
    StartNext { arrived_at: f64 },
}

/// One stage of the pipeline: a single server in front of a finite FIFO buffer
#[derive(Debug, Clone)]
pub struct QueueNode {
    /// Queue id, unique inside its network
    id: QueueId,
    /// Display name (`Q<id>`)
    name: String,
    /// Arrival times of the packets waiting in the buffer, oldest first
    pending_pkts: VecDeque<f64>,
    /// Number of waiting packets, always `pending_pkts.len()`
    n_pkts: usize,
    /// Whether the server is busy
    status: QueueStatus,
    /// Sampled duration of the service in progress
    current_service: f64,
    /// Mean of the service-time distribution
    mean_service_time: f64,
    /// Maximum number of waiting packets
    capacity: usize,
    /// Index of the downstream queue in the owning network, if any
    next: Option<usize>,
}

impl QueueNode {
    /// Create an idle, empty queue
    pub fn new(id: QueueId, mean_service_time: f64, capacity: usize) -> Self {
        Self {
            id,
            name: constants::queue_name(id),
            pending_pkts: VecDeque::new(),
            n_pkts: 0,
            status: QueueStatus::Idle,
            current_service: 0.0,
            mean_service_time,
            capacity,
            next: None,
        }
    }

    /// Handles a packet arriving at time `now`.
    ///
    /// An idle server takes the packet straight into service. A busy server buffers it, unless
    /// the buffer is already full, in which case the queue is left untouched and an
    /// [`OverflowError`] is returned.
    pub fn arrive(&mut self, now: f64) -> Result<ArrivalOutcome, OverflowError> {
        match self.status {
            QueueStatus::Idle => {
                self.status = QueueStatus::Busy;
                Ok(ArrivalOutcome::StartService)
            }
            QueueStatus::Busy => {
                if self.n_pkts >= self.capacity {
                    return Err(OverflowError {
                        queue_id: self.id,
                        name: self.name.clone(),
                        time: now,
                        capacity: self.capacity,
                    });
                }
                self.pending_pkts.push_back(now);
                self.n_pkts += 1;
                Ok(ArrivalOutcome::Buffered { buffered: self.n_pkts })
            }
        }
    }

    /// Records the sampled duration of the service that just started
    pub fn begin_service(&mut self, service_time: f64) {
        self.current_service = service_time;
    }

    /// Handles the server finishing its current packet.
    ///
    /// Pulls the oldest waiting packet into service, or goes idle if nothing waits.
    pub fn complete_service(&mut self) -> Departure {
        let served_for = std::mem::take(&mut self.current_service);
        let next = match self.pending_pkts.pop_front() {
            Some(arrived_at) => {
                self.n_pkts -= 1;
                DepartureOutcome::StartNext { arrived_at }
            }
            None => {
                self.status = QueueStatus::Idle;
                DepartureOutcome::Idle
            }
        };
        Departure { served_for, next }
    }

    pub fn id(&self) -> QueueId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> QueueStatus {
        self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status == QueueStatus::Busy
    }

    /// Number of packets waiting (not counting the one in service)
    pub fn buffered(&self) -> usize {
        self.n_pkts
    }

    /// Arrival times of waiting packets, oldest first
    pub fn pending_arrivals(&self) -> impl Iterator<Item = f64> + '_ {
        self.pending_pkts.iter().copied()
    }

    pub fn mean_service_time(&self) -> f64 {
        self.mean_service_time
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index of the downstream queue in the owning network
    pub fn downstream(&self) -> Option<usize> {
        self.next
    }

    /// True for the last queue of the chain
    pub fn is_tail(&self) -> bool {
        self.next.is_none()
    }

    pub(crate) fn set_downstream(&mut self, index: usize) {
        self.next = Some(index);
    }
}
