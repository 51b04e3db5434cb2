pub mod config;
pub mod run_simulation;
pub mod simulation_results;

pub use config::{Config, ConfigError};
pub use run_simulation::{run_simulation, ReplicationSummary, RunError};
pub use simulation_results::SimulationResults;
