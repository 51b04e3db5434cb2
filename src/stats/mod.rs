//! Delay and service accounting for a simulation run.
//! Totals only change on departure events; the per-queue breakdown also counts arrivals.

use serde::Serialize;
use crate::network::TandemNetwork;
use crate::types::QueueId;
use crate::utils::logging;


// ------------------------------------------------------------------------------------------------
// Per-queue Statistics
// ------------------------------------------------------------------------------------------------

/// Counters for one stage of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueStats {
    pub queue_id: QueueId,
    pub name: String,
    /// Packets that arrived at the queue
    pub arrivals: u64,
    /// Services that finished at the queue
    pub departures: u64,
    /// Time packets spent waiting in this queue's buffer
    pub total_queue_delay: f64,
    /// Time spent in service at this queue
    pub total_service: f64,
    /// Largest buffer occupancy observed
    pub max_buffered: usize,
}

impl QueueStats {
    fn new(queue_id: QueueId, name: &str) -> Self {
        Self {
            queue_id,
            name: name.to_string(),
            arrivals: 0,
            departures: 0,
            total_queue_delay: 0.0,
            total_service: 0.0,
            max_buffered: 0,
        }
    }

    /// Mean waiting time per packet that left the buffer of this queue
    pub fn mean_queue_delay(&self) -> f64 {
        if self.departures == 0 {
            0.0
        } else {
            self.total_queue_delay / self.departures as f64
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Run Totals
// ------------------------------------------------------------------------------------------------

/// Accumulators for the mean system delay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatAccumulators {
    /// Sum over every packet leaving a buffer of the time it waited there
    total_queue_delay: f64,
    /// Sum of every finished service duration
    total_service: f64,
    /// Packets accepted into service at the last queue of the chain
    processed_pkts: u64,
    /// Breakdown by queue, in chain order
    queues: Vec<QueueStats>,
}

impl StatAccumulators {
    /// Creates zeroed accumulators with one entry per queue of `network`
    pub fn new(network: &TandemNetwork) -> Self {
        Self {
            total_queue_delay: 0.0,
            total_service: 0.0,
            processed_pkts: 0,
            queues: network
                .nodes()
                .iter()
                .map(|node| QueueStats::new(node.id(), node.name()))
                .collect(),
        }
    }

    /// Zeroes every counter, keeping the queue list
    pub fn reset(&mut self) {
        self.total_queue_delay = 0.0;
        self.total_service = 0.0;
        self.processed_pkts = 0;
        for queue in &mut self.queues {
            *queue = QueueStats::new(queue.queue_id, &queue.name);
        }
    }

    pub fn record_arrival(&mut self, queue_id: QueueId, buffered: usize) {
        if let Some(queue) = queue_id.index().and_then(|index| self.queues.get_mut(index)) {
            queue.arrivals += 1;
            queue.max_buffered = queue.max_buffered.max(buffered);
        }
    }

    /// Records a finished service of `served_for` time units at `queue_id`
    pub fn record_departure(&mut self, queue_id: QueueId, served_for: f64) {
        self.total_service += served_for;
        if let Some(queue) = queue_id.index().and_then(|index| self.queues.get_mut(index)) {
            queue.departures += 1;
            queue.total_service += served_for;
        }
    }

    /// Records a packet leaving the buffer of `queue_id` after waiting `delay` time units
    pub fn record_queue_delay(&mut self, queue_id: QueueId, delay: f64) {
        self.total_queue_delay += delay;
        if let Some(queue) = queue_id.index().and_then(|index| self.queues.get_mut(index)) {
            queue.total_queue_delay += delay;
        }
    }

    /// Records a packet entering its final service
    pub fn record_processed(&mut self) {
        self.processed_pkts += 1;
    }

    pub fn total_queue_delay(&self) -> f64 {
        self.total_queue_delay
    }

    pub fn total_service(&self) -> f64 {
        self.total_service
    }

    pub fn processed_pkts(&self) -> u64 {
        self.processed_pkts
    }

    pub fn queues(&self) -> &[QueueStats] {
        &self.queues
    }

    pub fn queue(&self, queue_id: QueueId) -> Option<&QueueStats> {
        self.queues.get(queue_id.index()?)
    }

    /// `(total_queue_delay + total_service) / processed_pkts`, or `None` before any packet
    /// has been processed.
    ///
    /// A packet counts as processed when it enters service at the tail, while its service
    /// time is only added when it departs. Packets still in service when the run stops are
    /// therefore missing from `total_service`, which biases the estimate low by at most
    /// one service time per stage divided by `processed_pkts`.
    pub fn mean_delay(&self) -> Option<f64> {
        if self.processed_pkts == 0 {
            return None;
        }
        Some((self.total_queue_delay + self.total_service) / self.processed_pkts as f64)
    }

    /// Freezes the accumulators into a report
    pub fn report(&self, final_time: f64, events_processed: u64) -> SimulationReport {
        SimulationReport {
            mean_delay: self.mean_delay().unwrap_or(0.0),
            processed_pkts: self.processed_pkts,
            total_queue_delay: self.total_queue_delay,
            total_service: self.total_service,
            final_time,
            events_processed,
            queues: self.queues.clone(),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Report
// ------------------------------------------------------------------------------------------------

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Mean time a packet spends in the whole pipeline
    pub mean_delay: f64,
    pub processed_pkts: u64,
    pub total_queue_delay: f64,
    pub total_service: f64,
    /// Simulated time of the last processed event
    pub final_time: f64,
    pub events_processed: u64,
    pub queues: Vec<QueueStats>,
}

impl SimulationReport {
    /// Logs the final statistics
    pub fn log_final_stats(&self) {
        logging::log("STATS", "=== Final Statistics ===");
        logging::log("STATS", &format!("Processed Packets: {}", self.processed_pkts));
        logging::log("STATS", &format!("Simulated Time: {:.4}", self.final_time));
        logging::log("STATS", &format!("Events Processed: {}", self.events_processed));
        for queue in &self.queues {
            logging::log("STATS", &format!(
                "{}: arrivals {}, departures {}, mean queue delay {:.4}, max buffered {}",
                queue.name, queue.arrivals, queue.departures, queue.mean_queue_delay(), queue.max_buffered
            ));
        }
        logging::log("STATS", &format!("Avg System Delay: {:.6} time units", self.mean_delay));
    }
}
