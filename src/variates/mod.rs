//! Random variates that drive interarrival and service times.
//!
//! Every sample is drawn by inverse-transform sampling from exactly one uniform value, so a
//! seeded [`UniformSource`] fully determines the sequence of sampled times.

use rand::distributions::Open01;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};


// ------------------------------------------------------------------------------------------------
// Uniform Sources
// ------------------------------------------------------------------------------------------------

/// A stream of uniform(0,1) values
pub trait UniformSource {
    /// Returns the next value of the stream, in the open interval (0, 1)
    fn next_uniform(&mut self) -> f64;
}

/// Seeded ChaCha stream. Two sources built from the same seed yield the same values.
pub struct SeededUniform {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededUniform {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Returns the seed the stream was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl UniformSource for SeededUniform {
    fn next_uniform(&mut self) -> f64 {
        self.rng.sample(Open01)
    }
}

/// Replays a fixed list of uniform values, cycling when exhausted.
/// Counts how many values were handed out.
#[cfg(any(test, feature = "test"))]
pub struct ScriptedUniform {
    values: Vec<f64>,
    position: usize,
    draws: usize,
}

#[cfg(any(test, feature = "test"))]
impl ScriptedUniform {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "ScriptedUniform needs at least one value");
        Self { values, position: 0, draws: 0 }
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> usize {
        self.draws
    }
}

#[cfg(any(test, feature = "test"))]
impl UniformSource for ScriptedUniform {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.position];
        self.position = (self.position + 1) % self.values.len();
        self.draws += 1;
        value
    }
}

// ------------------------------------------------------------------------------------------------
// Distributions
// ------------------------------------------------------------------------------------------------

/// Family used for every sampled time of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimeDistribution {
    /// Plain exponential with the requested mean
    Exponential,
    /// Exponential conditioned on `[lower, upper]`
    TruncatedExponential { lower: f64, upper: f64 },
}

/// Inverse CDF of the exponential distribution. `u = 0` maps to exactly 0.
pub fn exponential_from_uniform(mean: f64, u: f64) -> f64 {
    -mean * (1.0 - u).ln()
}

/// Inverse CDF of the exponential distribution truncated to `[lower, upper]`.
/// `u = 0` maps to `lower` and `u -> 1` approaches `upper`.
pub fn truncated_exponential_from_uniform(mean: f64, lower: f64, upper: f64, u: f64) -> f64 {
    let at_lower = (-lower / mean).exp();
    let at_upper = (-upper / mean).exp();
    let value = -mean * (at_lower - u * (at_lower - at_upper)).ln();
    // rounding in exp/ln can land a hair outside the interval
    value.clamp(lower, upper)
}

// ------------------------------------------------------------------------------------------------
// Variate Generator
// ------------------------------------------------------------------------------------------------

/// Draws sampled times from a uniform stream.
///
/// Parameters are validated once before a run starts; the sampling functions do not
/// re-check `mean > 0` or `lower < upper`.
pub struct VariateGenerator<U: UniformSource> {
    source: U,
    draws: u64,
}

impl<U: UniformSource> VariateGenerator<U> {
    pub fn new(source: U) -> Self {
        Self { source, draws: 0 }
    }

    /// Samples `Exp(mean)`; consumes one uniform value
    pub fn exponential(&mut self, mean: f64) -> f64 {
        let u = self.next_uniform();
        exponential_from_uniform(mean, u)
    }

    /// Samples `Exp(mean)` conditioned on `[lower, upper]`; consumes one uniform value
    pub fn truncated_exponential(&mut self, mean: f64, lower: f64, upper: f64) -> f64 {
        let u = self.next_uniform();
        truncated_exponential_from_uniform(mean, lower, upper, u)
    }

    /// Samples a time with the given mean from `distribution`
    pub fn sample(&mut self, mean: f64, distribution: TimeDistribution) -> f64 {
        match distribution {
            TimeDistribution::Exponential => self.exponential(mean),
            TimeDistribution::TruncatedExponential { lower, upper } => {
                self.truncated_exponential(mean, lower, upper)
            }
        }
    }

    /// Number of uniform values consumed so far
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn source(&self) -> &U {
        &self.source
    }

    fn next_uniform(&mut self) -> f64 {
        self.draws += 1;
        self.source.next_uniform()
    }
}
