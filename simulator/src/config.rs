//! Configuration loader for the tandem simulator.
//! Reads either a TOML file or the `name=value` text format and turns it into
//! validated simulation parameters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tandem::simulation::ConfigurationError;
use tandem::SimulationParameters;
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// Main Configuration Structs
// ------------------------------------------------------------------------------------------------

/// Main configuration struct for simulation parameters.
///
/// Groups the external traffic, the queue chain and the run settings. Both file
/// formats load into this struct.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// External arrival stream and optional truncation bounds
    pub traffic_config: TrafficConfig,
    /// Stages of the chain and their buffer limit
    pub network_config: NetworkConfig,
    /// Termination, seeding and replication settings
    pub run_config: RunConfig,
}

/// Configuration of the external arrival stream
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TrafficConfig {
    /// Mean time between arrivals at the head queue
    pub mean_interarrival_time: f64,
    /// Lower bound `a` of the truncated exponential
    #[serde(default)]
    pub truncation_lower: Option<f64>,
    /// Upper bound `b` of the truncated exponential
    #[serde(default)]
    pub truncation_upper: Option<f64>,
}

/// Configuration of the queue chain
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    /// Mean service time of each stage (order corresponds to Q1, Q2, etc.)
    pub mean_service_times: Vec<f64>,
    /// Buffer capacity of every queue
    pub q_limit: usize,
}

/// Configuration of a run
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Packets that must enter service at the last stage before the run stops
    pub num_pkts: u64,
    /// Seed of the first run; replication `i` uses `seed + i`
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Number of replications
    #[serde(default = "default_num_runs")]
    pub num_runs: u32,
}

fn default_seed() -> u64 {
    1
}

fn default_num_runs() -> u32 {
    1
}

// ------------------------------------------------------------------------------------------------
// Error Types
// ------------------------------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Unrecognized key '{key}' on line {line}")]
    UnrecognizedKey { line: usize, key: String },
    #[error("Invalid value '{value}' for key '{key}' on line {line}")]
    InvalidValue { line: usize, key: String, value: String },
    #[error("Missing required key '{0}'")]
    MissingKey(String),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
    #[error("Invalid simulation parameters: {0}")]
    InvalidParameters(#[from] ConfigurationError),
}

// ------------------------------------------------------------------------------------------------
// Loading
// ------------------------------------------------------------------------------------------------

impl Config {
    /// Loads and validates a configuration file.
    ///
    /// Files ending in `.toml` are parsed as TOML, anything else as `name=value` lines.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = if path.extension().map_or(false, |ext| ext == "toml") {
            Self::from_toml(&contents)?
        } else {
            Self::from_text(&contents)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Parses the `name=value` format: one pair per line, `#` starts a comment line,
    /// lines without `=` are skipped.
    pub fn from_text(contents: &str) -> Result<Self, ConfigError> {
        let mut mean_interarrival_time = None;
        let mut stages: BTreeMap<usize, f64> = BTreeMap::new();
        let mut truncation_lower = None;
        let mut truncation_upper = None;
        let mut num_pkts = None;
        let mut seed = None;
        let mut q_limit = None;
        let mut num_runs = None;

        for (i, raw) in contents.lines().enumerate() {
            let line = i + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "mean_interarrival_time" => mean_interarrival_time = Some(parse_value(line, key, value)?),
                "mean_service_time" => {
                    stages.insert(1, parse_value(line, key, value)?);
                }
                "a" => truncation_lower = Some(parse_value(line, key, value)?),
                "b" => truncation_upper = Some(parse_value(line, key, value)?),
                "num_pkts" => num_pkts = Some(parse_value(line, key, value)?),
                "seed" => seed = Some(parse_value(line, key, value)?),
                "q_limit" => q_limit = Some(parse_value(line, key, value)?),
                "num_runs" => num_runs = Some(parse_value(line, key, value)?),
                _ => match stage_index(key) {
                    Some(stage) => {
                        stages.insert(stage, parse_value(line, key, value)?);
                    }
                    None => {
                        return Err(ConfigError::UnrecognizedKey { line, key: key.to_string() });
                    }
                },
            }
        }

        // Stage indices must run 1, 2, .., N without gaps
        for (expected, stage) in stages.keys().enumerate() {
            if *stage != expected + 1 {
                return Err(ConfigError::MissingKey(format!("mean_service_time_{}", expected + 1)));
            }
        }
        if stages.is_empty() {
            return Err(ConfigError::MissingKey("mean_service_time_1".to_string()));
        }

        Ok(Config {
            traffic_config: TrafficConfig {
                mean_interarrival_time: required(mean_interarrival_time, "mean_interarrival_time")?,
                truncation_lower,
                truncation_upper,
            },
            network_config: NetworkConfig {
                mean_service_times: stages.into_values().collect(),
                q_limit: required(q_limit, "q_limit")?,
            },
            run_config: RunConfig {
                num_pkts: required(num_pkts, "num_pkts")?,
                seed: seed.unwrap_or_else(default_seed),
                num_runs: num_runs.unwrap_or_else(default_num_runs),
            },
        })
    }

    /// Checks the settings the core does not see, then the simulation parameters themselves
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.traffic_config.truncation_lower.is_some() != self.traffic_config.truncation_upper.is_some() {
            return Err(ConfigError::ValidationError(
                "Truncation bounds must be given together or not at all".into(),
            ));
        }
        if self.run_config.num_runs == 0 {
            return Err(ConfigError::ValidationError("Number of runs must be positive".into()));
        }
        self.to_parameters()?;
        Ok(())
    }

    /// Builds the parameters of the first run
    pub fn to_parameters(&self) -> Result<SimulationParameters, ConfigError> {
        self.parameters_for_run(0)
    }

    /// Builds the parameters of replication `run`, seeded with `seed + run`
    pub fn parameters_for_run(&self, run: u32) -> Result<SimulationParameters, ConfigError> {
        let mut params = SimulationParameters::new(
            self.traffic_config.mean_interarrival_time,
            self.network_config.mean_service_times.clone(),
            self.run_config.num_pkts,
        )
        .with_seed(self.run_config.seed.wrapping_add(run as u64))
        .with_q_limit(self.network_config.q_limit);

        if let (Some(lower), Some(upper)) = (self.traffic_config.truncation_lower, self.traffic_config.truncation_upper) {
            params = params.with_truncation(lower, upper);
        }
        params.validate()?;
        Ok(params)
    }

    pub fn num_runs(&self) -> u32 {
        self.run_config.num_runs
    }
}

// ------------------------------------------------------------------------------------------------
// Helpers
// ------------------------------------------------------------------------------------------------

fn parse_value<T: std::str::FromStr>(line: usize, key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        line,
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn required<T>(value: Option<T>, key: &str) -> Result<T, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingKey(key.to_string()))
}

/// `mean_service_time_<k>` with `k >= 1`
fn stage_index(key: &str) -> Option<usize> {
    key.strip_prefix("mean_service_time_")?
        .parse()
        .ok()
        .filter(|stage| *stage >= 1)
}
