use serde::{Deserialize, Serialize};
use crate::variates::TimeDistribution;
use super::ConfigurationError;

/// Bounds `[lower, upper]` of the doubly truncated exponential
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Truncation {
    pub lower: f64,
    pub upper: f64,
}

/// Everything a run needs to know, checked once before the run starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Mean time between external arrivals at the head queue
    pub mean_interarrival_time: f64,
    /// Mean service time of each stage, in chain order
    pub mean_service_times: Vec<f64>,
    /// When set, every sampled time is drawn from the truncated exponential
    pub truncation: Option<Truncation>,
    /// Packets to push into final service before the run stops
    pub num_pkts: u64,
    /// Seed of the uniform stream
    pub seed: u64,
    /// Buffer capacity of every queue
    pub q_limit: usize,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            mean_interarrival_time: 1.0,
            mean_service_times: vec![0.5],
            truncation: None,
            num_pkts: 1000,
            seed: 1,
            q_limit: 100,
        }
    }
}

impl SimulationParameters {
    pub fn new(mean_interarrival_time: f64, mean_service_times: Vec<f64>, num_pkts: u64) -> Self {
        Self {
            mean_interarrival_time,
            mean_service_times,
            num_pkts,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_q_limit(mut self, q_limit: usize) -> Self {
        self.q_limit = q_limit;
        self
    }

    pub fn with_truncation(mut self, lower: f64, upper: f64) -> Self {
        self.truncation = Some(Truncation { lower, upper });
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !is_positive(self.mean_interarrival_time) {
            return Err(ConfigurationError::InvalidInterarrivalTime(self.mean_interarrival_time));
        }
        if self.mean_service_times.is_empty() {
            return Err(ConfigurationError::NoQueues);
        }
        for (i, value) in self.mean_service_times.iter().enumerate() {
            if !is_positive(*value) {
                return Err(ConfigurationError::InvalidServiceTime { stage: i + 1, value: *value });
            }
        }
        if let Some(Truncation { lower, upper }) = self.truncation {
            if !(lower >= 0.0 && lower < upper && upper.is_finite()) {
                return Err(ConfigurationError::InvalidTruncation { lower, upper });
            }
        }
        if self.num_pkts == 0 {
            return Err(ConfigurationError::ZeroPackets);
        }
        Ok(())
    }

    /// Distribution of every interarrival and service time
    pub fn distribution(&self) -> TimeDistribution {
        match self.truncation {
            Some(Truncation { lower, upper }) => TimeDistribution::TruncatedExponential { lower, upper },
            None => TimeDistribution::Exponential,
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
