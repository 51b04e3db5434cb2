pub mod types;
pub mod variates;
pub mod scheduler;
pub mod queue;
pub mod network;
pub mod stats;
pub mod simulation;
pub mod utils;

pub use network::TandemNetwork;
pub use simulation::{simulate, Simulation, SimulationError, SimulationParameters};
pub use stats::SimulationReport;
