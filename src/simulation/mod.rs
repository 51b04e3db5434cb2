use thiserror::Error;
use crate::network::NetworkError;
use crate::queue::OverflowError;
use crate::scheduler::SchedulerError;

pub mod engine;
pub mod parameters;

pub use engine::{simulate, Simulation};
pub use parameters::{SimulationParameters, Truncation};

#[cfg(test)]
mod tests;

/// A parameter is missing, out of range or inconsistent
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("mean_interarrival_time must be a positive finite number, got {0}")]
    InvalidInterarrivalTime(f64),
    #[error("At least one queue is required")]
    NoQueues,
    #[error("mean service time of stage {stage} must be a positive finite number, got {value}")]
    InvalidServiceTime { stage: usize, value: f64 },
    #[error("Truncation bounds must satisfy 0 <= a < b, got a = {lower}, b = {upper}")]
    InvalidTruncation { lower: f64, upper: f64 },
    #[error("num_pkts must be positive")]
    ZeroPackets,
}

/// Fatal outcome of a run. None of these are retried: the run stops and reports.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Invalid network: {0}")]
    Network(#[from] NetworkError),
    #[error("{source} (mean service time: {mean_service_time}, mean inter-arrival time: {mean_interarrival_time})")]
    Overflow {
        source: OverflowError,
        mean_service_time: f64,
        mean_interarrival_time: f64,
    },
    #[error("Event list empty at (simulated) time {time} before the run completed")]
    SchedulerExhausted { time: f64 },
    #[error("Scheduling fault: {0}")]
    Scheduler(SchedulerError),
}

impl From<SchedulerError> for SimulationError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::Exhausted { time } => SimulationError::SchedulerExhausted { time },
            other => SimulationError::Scheduler(other),
        }
    }
}
